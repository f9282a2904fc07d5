//! Map projections between the sphere and the plane: a tetrahedral
//! family, mesh-interpolated maps, distortion metrics, and a parameter
//! optimizer over projection families.

pub mod coordinate;
pub mod distortion;
pub mod error;
pub mod mesh;
pub mod oblique;
pub mod optimize;
pub mod projection;
pub mod registry;
mod tetrahedral;

pub use coordinate::{PlanarCoord, SphericalCoord};
pub use distortion::{distortion_at, sample_globe, DistortionField};
pub use error::{ProjResult, ProjectionError};
pub use mesh::{MeshInterpolation, MeshInverse, MeshProjection};
pub use oblique::ObliqueAspect;
pub use optimize::{
    optimize_family, FamilyOptimum, ParamBounds, ProgressSink, SilentSink, WEIGHTS,
};
pub use projection::{MapProjection, ProjectionSpec};
pub use registry::{EntryKind, ParamSpec, RegistryEntry};
