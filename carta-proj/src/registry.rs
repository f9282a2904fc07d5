//! Catalog of every projection the crate can name.
//!
//! The catalog is the single home for projection metadata: display
//! name, blurb, plane frame, parameter ranges, and how to realise the
//! entry. Closed-form entries build directly through
//! [`MapProjection::from_name`]; mesh entries name the CSV resource
//! they need.

use std::path::Path;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{ProjResult, ProjectionError};
use crate::mesh::{MeshInterpolation, MeshProjection};
use crate::projection::MapProjection;
use crate::tetrahedral::{AUTHAGRAPH, TRIANGLE_FACE, WIDE_FACE, WIDE_VERTEX};

/// Range and default of one tunable parameter.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl ParamSpec {
    pub(crate) fn check(&self, value: f64) -> ProjResult<()> {
        if !value.is_finite() || value < self.min || value > self.max {
            return Err(ProjectionError::invalid_parameter(format!(
                "{} = {} is outside [{}, {}]",
                self.name, value, self.min, self.max
            )));
        }
        Ok(())
    }
}

pub(crate) const POWER_PARAM: ParamSpec = ParamSpec {
    name: "Power",
    min: 0.25,
    max: 1.0,
    default: 0.7,
};

pub(crate) const RHO_PARAM: ParamSpec = ParamSpec {
    name: "Rho",
    min: 0.0,
    max: 0.5,
    default: 0.25,
};

pub(crate) const TETRA_POWER_PARAMS: [ParamSpec; 3] = [
    ParamSpec {
        name: "k1",
        min: 0.01,
        max: 2.0,
        default: 0.98,
    },
    ParamSpec {
        name: "k2",
        min: 0.01,
        max: 2.0,
        default: 1.2,
    },
    ParamSpec {
        name: "k3",
        min: 0.01,
        max: 2.0,
        default: 0.98,
    },
];

/// How a catalog entry is realised.
#[derive(Debug, Clone, Copy, Serialize)]
pub enum EntryKind {
    /// Pure formula; [`MapProjection::from_name`] can build it.
    ClosedForm,
    /// Interpolates a mesh loaded from a CSV resource.
    Mesh {
        interpolation: MeshInterpolation,
        resource: &'static str,
    },
}

/// One catalog row.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryEntry {
    pub name: &'static str,
    pub description: &'static str,
    /// Plane frame; zero for mesh entries until their resource loads.
    pub width: f64,
    pub height: f64,
    pub has_aspect: bool,
    pub params: &'static [ParamSpec],
    pub kind: EntryKind,
}

impl RegistryEntry {
    /// Builds the projection this entry describes. Mesh entries read
    /// their resource from `mesh_dir`.
    pub fn instantiate(&self, mesh_dir: Option<&Path>) -> ProjResult<MapProjection> {
        match self.kind {
            EntryKind::ClosedForm => MapProjection::from_name(self.name, &[]),
            EntryKind::Mesh {
                interpolation,
                resource,
            } => {
                let dir = mesh_dir.ok_or_else(|| {
                    ProjectionError::resource(self.name, "no mesh directory given")
                })?;
                let mesh = MeshProjection::from_csv(interpolation, self.name, &dir.join(resource))?;
                let mesh = if self.has_aspect {
                    mesh
                } else {
                    mesh.with_fixed_aspect()
                };
                Ok(MapProjection::Mesh(mesh))
            }
        }
    }
}

pub static REGISTRY: Lazy<Vec<RegistryEntry>> = Lazy::new(|| {
    let mesh = |name, description, interpolation, resource, has_aspect| RegistryEntry {
        name,
        description,
        width: 0.0,
        height: 0.0,
        has_aspect,
        params: &[],
        kind: EntryKind::Mesh {
            interpolation,
            resource,
        },
    };
    vec![
        RegistryEntry {
            name: "Lee Tetrahedral",
            description: "A conformal projection of the tetrahedron that deserves more attention than it gets.",
            width: WIDE_FACE.width,
            height: WIDE_FACE.height,
            has_aspect: true,
            params: &[],
            kind: EntryKind::ClosedForm,
        },
        RegistryEntry {
            name: "Lee Triangular",
            description: "The Lee projection in a single triangle, the form in which it was first published, even though the rectangle wears it better.",
            width: TRIANGLE_FACE.width,
            height: TRIANGLE_FACE.height,
            has_aspect: true,
            params: &[],
            kind: EntryKind::ClosedForm,
        },
        RegistryEntry {
            name: "TetraGraph",
            description: "An equidistant projection of the tetrahedron; scale is true along every ray out of a face center.",
            width: WIDE_FACE.width,
            height: WIDE_FACE.height,
            has_aspect: true,
            params: &[],
            kind: EntryKind::ClosedForm,
        },
        RegistryEntry {
            name: "AuthaGraph",
            description: "An approximation of the hip Japanese map that is almost equal-area.",
            width: AUTHAGRAPH.width,
            height: AUTHAGRAPH.height,
            has_aspect: false,
            params: &[],
            kind: EntryKind::ClosedForm,
        },
        RegistryEntry {
            name: "AuthaPower",
            description: "A parametrised rearrangement of the AuthaGraph approximation.",
            width: WIDE_VERTEX.width,
            height: WIDE_VERTEX.height,
            has_aspect: true,
            params: &[POWER_PARAM],
            kind: EntryKind::ClosedForm,
        },
        RegistryEntry {
            name: "EquaHedral",
            description: "An exactly equal-area tetrahedral projection, with a small hole at each vertex to keep the shear finite.",
            width: WIDE_VERTEX.width,
            height: WIDE_VERTEX.height,
            has_aspect: true,
            params: &[RHO_PARAM],
            kind: EntryKind::ClosedForm,
        },
        RegistryEntry {
            name: "TetraPower",
            description: "A parametrised tetrahedral projection with tunable edge and corner exponents.",
            width: WIDE_FACE.width,
            height: WIDE_FACE.height,
            has_aspect: true,
            params: &TETRA_POWER_PARAMS,
            kind: EntryKind::ClosedForm,
        },
        mesh(
            "Danseiji O",
            "An earlier take on the optimal lenticular map, interpolated cell by cell in the plane.",
            MeshInterpolation::Planar,
            "danseijiO.csv",
            true,
        ),
        mesh(
            "Danseiji N",
            "The optimal conventional lenticular map.",
            MeshInterpolation::Spherical,
            "danseijiN.csv",
            true,
        ),
        mesh(
            "Danseiji I",
            "The optimal conventional equal-area map.",
            MeshInterpolation::Spherical,
            "danseijiI.csv",
            true,
        ),
        mesh(
            "Danseiji II",
            "An optimised map that trades size accuracy for better shapes.",
            MeshInterpolation::Spherical,
            "danseijiII.csv",
            true,
        ),
        mesh(
            "Danseiji III",
            "A map optimised to move distortion from the continents into the oceans.",
            MeshInterpolation::Spherical,
            "danseijiIII.csv",
            false,
        ),
        mesh(
            "Danseiji IV",
            "A map optimised to display landmasses accurately and without interruption.",
            MeshInterpolation::Spherical,
            "danseijiIV.csv",
            false,
        ),
        mesh(
            "Danseiji V",
            "A map optimised to show off the continents by compressing the oceans.",
            MeshInterpolation::Spherical,
            "danseijiV.csv",
            false,
        ),
        mesh(
            "Danseiji VI",
            "A compromise map where both physical area and population affect size.",
            MeshInterpolation::Spherical,
            "danseijiVI.csv",
            false,
        ),
    ]
});

/// All catalog entries in presentation order.
pub fn all() -> &'static [RegistryEntry] {
    &REGISTRY
}

/// Case-insensitive lookup by display name.
pub fn find(name: &str) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|e| e.name.eq_ignore_ascii_case(name))
}
