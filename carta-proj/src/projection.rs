//! The projection catalog.
//!
//! [`MapProjection`] is the front door of the crate: one value per
//! configured projection, with a forward [`project`](MapProjection::project),
//! an inverse [`invert`](MapProjection::invert) and the metadata a
//! renderer needs to frame the result. Closed-form members carry their
//! parameters in the variant; mesh-backed members carry the whole
//! loaded mesh.

use once_cell::sync::Lazy;

use carta_core::constants::DEG_TO_RAD;

use crate::coordinate::{PlanarCoord, SphericalCoord};
use crate::error::{ProjResult, ProjectionError};
use crate::mesh::MeshProjection;
use crate::oblique::ObliqueAspect;
use crate::registry::{self, ParamSpec};
use crate::tetrahedral::{self, authagraph, lee, tetragraph};
use crate::tetrahedral::{AUTHAGRAPH, TRIANGLE_FACE, WIDE_FACE, WIDE_VERTEX};

/// Orientation the AuthaGraph poster fixes: the north pole of the net
/// frame over the Pacific, tilted so no face edge cuts a continent.
static AUTHAGRAPH_POLE: Lazy<ObliqueAspect> = Lazy::new(|| {
    ObliqueAspect::new(77.0 * DEG_TO_RAD, 143.0 * DEG_TO_RAD, 17.0 * DEG_TO_RAD)
});

/// Everything a caller needs to present one projection: its catalog
/// identity, plane frame, and parameter metadata.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProjectionSpec {
    pub name: String,
    pub description: String,
    pub width: f64,
    pub height: f64,
    pub has_aspect: bool,
    pub params: Vec<ParamSpec>,
}

/// A configured map projection.
#[derive(Debug, Clone)]
pub enum MapProjection {
    /// Lee's conformal tetrahedral map in the wide rectangle.
    LeeRectangular,
    /// The same map in the triangle it was first published in.
    LeeTriangular,
    /// Equidistant tetrahedral map.
    TetraGraph,
    /// Power-law approximation of AuthaGraph in its fixed aspect.
    AuthaGraph,
    /// The AuthaGraph approximation with a free exponent.
    AuthaPower { power: f64 },
    /// Exactly equal-area vertex-centered map with vertex holes.
    EquaHedral { hole_r2: f64 },
    /// Face-centered map with tunable edge and corner exponents.
    TetraPower { k1: f64, k2: f64, k3: f64 },
    /// A projection backed by a loaded mesh resource.
    Mesh(MeshProjection),
}

impl MapProjection {
    pub fn autha_power(power: f64) -> ProjResult<Self> {
        registry::POWER_PARAM.check(power)?;
        Ok(Self::AuthaPower { power })
    }

    /// `rho` is the hole radius as a fraction of the net; it is stored
    /// squared and scaled, which is the form the math wants.
    pub fn equa_hedral(rho: f64) -> ProjResult<Self> {
        registry::RHO_PARAM.check(rho)?;
        Ok(Self::EquaHedral {
            hole_r2: 3.0 * rho * rho,
        })
    }

    pub fn tetra_power(k1: f64, k2: f64, k3: f64) -> ProjResult<Self> {
        registry::TETRA_POWER_PARAMS[0].check(k1)?;
        registry::TETRA_POWER_PARAMS[1].check(k2)?;
        registry::TETRA_POWER_PARAMS[2].check(k3)?;
        Ok(Self::TetraPower { k1, k2, k3 })
    }

    /// Builds a closed-form projection from its catalog name, filling
    /// missing parameters with the catalog defaults. Mesh-backed names
    /// are rejected here; they need a resource file.
    pub fn from_name(name: &str, params: &[f64]) -> ProjResult<Self> {
        let entry = registry::find(name)
            .ok_or_else(|| ProjectionError::unsupported_projection(name))?;
        if matches!(entry.kind, registry::EntryKind::Mesh { .. }) {
            return Err(ProjectionError::invalid_parameter(format!(
                "'{}' is mesh-backed; load its resource with MeshProjection::from_csv",
                entry.name
            )));
        }
        if params.len() > entry.params.len() {
            return Err(ProjectionError::invalid_parameter(format!(
                "{} takes at most {} parameters, got {}",
                entry.name,
                entry.params.len(),
                params.len()
            )));
        }
        let p = |i: usize| params.get(i).copied().unwrap_or(entry.params[i].default);
        match entry.name {
            "Lee Tetrahedral" => Ok(Self::LeeRectangular),
            "Lee Triangular" => Ok(Self::LeeTriangular),
            "TetraGraph" => Ok(Self::TetraGraph),
            "AuthaGraph" => Ok(Self::AuthaGraph),
            "AuthaPower" => Self::autha_power(p(0)),
            "EquaHedral" => Self::equa_hedral(p(0)),
            "TetraPower" => Self::tetra_power(p(0), p(1), p(2)),
            other => Err(ProjectionError::unsupported_projection(other)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::LeeRectangular => "Lee Tetrahedral",
            Self::LeeTriangular => "Lee Triangular",
            Self::TetraGraph => "TetraGraph",
            Self::AuthaGraph => "AuthaGraph",
            Self::AuthaPower { .. } => "AuthaPower",
            Self::EquaHedral { .. } => "EquaHedral",
            Self::TetraPower { .. } => "TetraPower",
            Self::Mesh(mesh) => mesh.name(),
        }
    }

    fn dims(&self) -> (f64, f64) {
        match self {
            Self::LeeRectangular | Self::TetraGraph | Self::TetraPower { .. } => {
                (WIDE_FACE.width, WIDE_FACE.height)
            }
            Self::LeeTriangular => (TRIANGLE_FACE.width, TRIANGLE_FACE.height),
            Self::AuthaPower { .. } | Self::EquaHedral { .. } => {
                (WIDE_VERTEX.width, WIDE_VERTEX.height)
            }
            Self::AuthaGraph => (AUTHAGRAPH.width, AUTHAGRAPH.height),
            Self::Mesh(mesh) => (mesh.width(), mesh.height()),
        }
    }

    /// Width of the plane box the map fills, centered on the origin.
    #[inline]
    pub fn width(&self) -> f64 {
        self.dims().0
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.dims().1
    }

    /// Whether the projection may be recentered on an arbitrary pole.
    /// AuthaGraph is pinned to its published aspect, and some meshes
    /// are optimised against the continents.
    pub fn has_aspect(&self) -> bool {
        match self {
            Self::AuthaGraph => false,
            Self::Mesh(mesh) => mesh.has_aspect(),
            _ => true,
        }
    }

    pub fn spec(&self) -> ProjectionSpec {
        let entry = registry::find(self.name());
        ProjectionSpec {
            name: self.name().to_string(),
            description: entry.map_or_else(String::new, |e| e.description.to_string()),
            width: self.width(),
            height: self.height(),
            has_aspect: self.has_aspect(),
            params: entry.map_or_else(Vec::new, |e| e.params.to_vec()),
        }
    }

    pub fn project(&self, coord: SphericalCoord) -> ProjResult<PlanarCoord> {
        match self {
            Self::LeeRectangular => {
                Ok(tetrahedral::project_with(&WIDE_FACE, coord, lee::project))
            }
            Self::LeeTriangular => Ok(tetrahedral::project_with(
                &TRIANGLE_FACE,
                coord,
                lee::project,
            )),
            Self::TetraGraph => Ok(tetrahedral::project_with(
                &WIDE_FACE,
                coord,
                tetragraph::project,
            )),
            Self::AuthaGraph => Ok(tetrahedral::project_with(
                &AUTHAGRAPH,
                AUTHAGRAPH_POLE.shift(coord),
                authagraph::project,
            )),
            Self::AuthaPower { power } => {
                let k = *power;
                Ok(tetrahedral::project_with(&WIDE_VERTEX, coord, |lat, lon| {
                    authagraph::power_project(lat, lon, k)
                }))
            }
            Self::EquaHedral { hole_r2 } => {
                let r02 = *hole_r2;
                Ok(tetrahedral::project_with(&WIDE_VERTEX, coord, |lat, lon| {
                    authagraph::equahedral_project(lat, lon, r02)
                }))
            }
            Self::TetraPower { k1, k2, k3 } => {
                let (k1, k2, k3) = (*k1, *k2, *k3);
                Ok(tetrahedral::project_with(&WIDE_FACE, coord, |lat, lon| {
                    tetragraph::power_project(lat, lon, k1, k2, k3)
                }))
            }
            Self::Mesh(mesh) => mesh.project(coord),
        }
    }

    /// Maps a plane point back to the globe. `None` means the point
    /// has no preimage: outside the triangle frame, or in a vertex
    /// hole. Mesh inverses always answer, with the outside flag folded
    /// into a longitude bias.
    pub fn invert(&self, point: PlanarCoord) -> Option<SphericalCoord> {
        match self {
            Self::LeeRectangular => tetrahedral::invert_with(&WIDE_FACE, point, lee::invert),
            Self::LeeTriangular => {
                tetrahedral::invert_with(&TRIANGLE_FACE, point, lee::invert)
            }
            Self::TetraGraph => {
                tetrahedral::invert_with(&WIDE_FACE, point, tetragraph::invert)
            }
            Self::AuthaGraph => {
                tetrahedral::invert_with(&AUTHAGRAPH, point, authagraph::invert)
                    .map(|c| AUTHAGRAPH_POLE.unshift(c))
            }
            Self::AuthaPower { power } => {
                let k = *power;
                tetrahedral::invert_with(&WIDE_VERTEX, point, |r, th| {
                    authagraph::power_invert(r, th, k)
                })
            }
            Self::EquaHedral { hole_r2 } => {
                let r02 = *hole_r2;
                tetrahedral::invert_with(&WIDE_VERTEX, point, |r, th| {
                    authagraph::equahedral_invert(r, th, r02)
                })
            }
            Self::TetraPower { k1, k2, k3 } => {
                let (k1, k2, k3) = (*k1, *k2, *k3);
                tetrahedral::invert_with(&WIDE_FACE, point, |r, th| {
                    tetragraph::power_invert(r, th, k1, k2, k3)
                })
            }
            Self::Mesh(mesh) => Some(mesh.invert(point).coord()),
        }
    }

    /// Forward projection through an oblique aspect.
    pub fn project_oblique(
        &self,
        coord: SphericalCoord,
        aspect: &ObliqueAspect,
    ) -> ProjResult<PlanarCoord> {
        self.project(aspect.shift(coord))
    }

    pub fn invert_oblique(
        &self,
        point: PlanarCoord,
        aspect: &ObliqueAspect,
    ) -> Option<SphericalCoord> {
        self.invert(point).map(|c| aspect.unshift(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carta_core::constants::{HALF_PI, SQRT3};
    use carta_core::math::coerce_angle;

    fn globe_grid() -> Vec<SphericalCoord> {
        let mut points = Vec::new();
        for i in -4..=4 {
            for j in -9..10 {
                points.push(SphericalCoord::new(
                    i as f64 * 0.33 + 0.05,
                    j as f64 * 0.31 + 0.07,
                ));
            }
        }
        points
    }

    #[test]
    fn test_tetragraph_origin_lands_on_face_edge() {
        let p = MapProjection::TetraGraph
            .project(SphericalCoord::new(0.0, 0.0))
            .unwrap();
        assert!(p.x().abs() < 1e-12, "x = {}", p.x());
        assert!((p.y() + SQRT3 / 2.0).abs() < 1e-12, "y = {}", p.y());
    }

    #[test]
    fn test_frames() {
        assert_eq!(MapProjection::TetraGraph.width(), 6.0);
        assert_eq!(MapProjection::TetraGraph.height(), 2.0 * SQRT3);
        assert_eq!(MapProjection::LeeTriangular.width(), 4.0 * SQRT3);
        assert_eq!(MapProjection::LeeTriangular.height(), 6.0);
        assert_eq!(MapProjection::AuthaGraph.width(), 4.0 * SQRT3);
        assert_eq!(MapProjection::AuthaGraph.height(), 3.0);
    }

    #[test]
    fn test_every_projection_stays_in_frame() {
        let projections = [
            MapProjection::LeeRectangular,
            MapProjection::LeeTriangular,
            MapProjection::TetraGraph,
            MapProjection::AuthaGraph,
            MapProjection::autha_power(0.7).unwrap(),
            MapProjection::equa_hedral(0.25).unwrap(),
            MapProjection::tetra_power(0.98, 1.2, 0.98).unwrap(),
        ];
        for projection in &projections {
            let (w, h) = (projection.width(), projection.height());
            for &coord in &globe_grid() {
                let p = projection.project(coord).unwrap();
                assert!(
                    p.x().abs() <= w / 2.0 + 1e-9 && p.y().abs() <= h / 2.0 + 1e-9,
                    "{} put ({}, {}) at ({}, {})",
                    projection.name(),
                    coord.lat(),
                    coord.lon(),
                    p.x(),
                    p.y()
                );
            }
        }
    }

    #[test]
    fn test_tetragraph_round_trip() {
        let projection = MapProjection::TetraGraph;
        for &coord in &globe_grid() {
            if coord.lat().abs() > 1.4 {
                continue;
            }
            let p = projection.project(coord).unwrap();
            let back = projection.invert(p).unwrap();
            assert!(
                (back.lat() - coord.lat()).abs() < 1e-9,
                "lat {} came back as {}",
                coord.lat(),
                back.lat()
            );
            assert!(
                coerce_angle(back.lon() - coord.lon()).abs() < 1e-9,
                "lon {} came back as {}",
                coord.lon(),
                back.lon()
            );
        }
    }

    #[test]
    fn test_lee_round_trip() {
        for projection in [MapProjection::LeeRectangular, MapProjection::LeeTriangular] {
            for &coord in &globe_grid() {
                if coord.lat().abs() > 1.4 {
                    continue;
                }
                let p = projection.project(coord).unwrap();
                let back = projection.invert(p).unwrap();
                assert!(
                    (back.lat() - coord.lat()).abs() < 1e-6,
                    "{}: lat {} came back as {}",
                    projection.name(),
                    coord.lat(),
                    back.lat()
                );
                assert!(
                    coerce_angle(back.lon() - coord.lon()).abs() < 1e-6,
                    "{}: lon {} came back as {}",
                    projection.name(),
                    coord.lon(),
                    back.lon()
                );
            }
        }
    }

    #[test]
    fn test_tetrapower_round_trip() {
        let projection = MapProjection::tetra_power(0.98, 1.2, 0.98).unwrap();
        for &coord in &globe_grid() {
            if coord.lat().abs() > 1.4 {
                continue;
            }
            let p = projection.project(coord).unwrap();
            let back = projection.invert(p).unwrap();
            assert!(
                (back.lat() - coord.lat()).abs() < 1e-8,
                "lat {} came back as {}",
                coord.lat(),
                back.lat()
            );
            assert!(
                coerce_angle(back.lon() - coord.lon()).abs() < 1e-8,
                "lon {} came back as {}",
                coord.lon(),
                back.lon()
            );
        }
    }

    #[test]
    fn test_vertex_family_round_trip_within_tolerance() {
        // The bearing inversion stops at a coarse tolerance and
        // AuthaGraph's exponent pair is not an exact reciprocal, so
        // these families only round trip loosely.
        let projections = [
            MapProjection::AuthaGraph,
            MapProjection::autha_power(0.7).unwrap(),
            MapProjection::equa_hedral(0.25).unwrap(),
        ];
        for projection in &projections {
            for &coord in &globe_grid() {
                if coord.lat().abs() > 1.3 {
                    continue;
                }
                let p = projection.project(coord).unwrap();
                let back = match projection.invert(p) {
                    Some(back) => back,
                    None => continue,
                };
                assert!(
                    (back.lat() - coord.lat()).abs() < 0.02,
                    "{}: lat {} came back as {}",
                    projection.name(),
                    coord.lat(),
                    back.lat()
                );
                assert!(
                    coerce_angle(back.lon() - coord.lon()).abs() < 0.05,
                    "{}: lon {} came back as {}",
                    projection.name(),
                    coord.lon(),
                    back.lon()
                );
            }
        }
    }

    #[test]
    fn test_equahedral_vertex_hole_is_unmapped() {
        let projection = MapProjection::equa_hedral(0.25).unwrap();
        assert!(projection
            .invert(PlanarCoord::new(0.003, SQRT3 - 0.003))
            .is_none());
        assert!(projection.invert(PlanarCoord::new(0.0, 0.9)).is_some());
    }

    #[test]
    fn test_triangle_frame_outside_is_unmapped() {
        assert!(MapProjection::LeeTriangular
            .invert(PlanarCoord::new(3.0, 2.0))
            .is_none());
    }

    #[test]
    fn test_aspect_flags() {
        assert!(!MapProjection::AuthaGraph.has_aspect());
        assert!(MapProjection::TetraGraph.has_aspect());
        assert!(MapProjection::LeeRectangular.has_aspect());
    }

    #[test]
    fn test_from_name_is_case_insensitive_and_validating() {
        assert!(matches!(
            MapProjection::from_name("tetragraph", &[]),
            Ok(MapProjection::TetraGraph)
        ));
        let defaulted = MapProjection::from_name("TetraPower", &[]).unwrap();
        match defaulted {
            MapProjection::TetraPower { k1, k2, k3 } => {
                assert_eq!((k1, k2, k3), (0.98, 1.2, 0.98));
            }
            other => panic!("expected TetraPower, got {}", other.name()),
        }

        let err = MapProjection::from_name("Mercator", &[]).unwrap_err();
        assert!(matches!(err, ProjectionError::UnsupportedProjection { .. }));

        let err = MapProjection::from_name("AuthaPower", &[2.0]).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidParameter { .. }));

        let err = MapProjection::from_name("Danseiji N", &[]).unwrap_err();
        assert!(err.to_string().contains("mesh"), "got: {err}");
    }

    #[test]
    fn test_oblique_helpers_match_manual_shift() {
        let aspect = ObliqueAspect::new(0.9, -1.2, 0.4);
        let projection = MapProjection::TetraGraph;
        let coord = SphericalCoord::new(0.3, 1.1);
        let direct = projection.project(aspect.shift(coord)).unwrap();
        let through = projection.project_oblique(coord, &aspect).unwrap();
        assert_eq!(direct.x(), through.x());
        assert_eq!(direct.y(), through.y());

        let back = projection.invert_oblique(direct, &aspect).unwrap();
        assert!((back.lat() - coord.lat()).abs() < 1e-9);
        assert!(coerce_angle(back.lon() - coord.lon()).abs() < 1e-9);
    }

    #[test]
    fn test_spec_reports_catalog_metadata() {
        let spec = MapProjection::autha_power(0.7).unwrap().spec();
        assert_eq!(spec.name, "AuthaPower");
        assert_eq!(spec.params.len(), 1);
        assert_eq!(spec.params[0].name, "Power");
        assert!(spec.has_aspect);
        assert!(!spec.description.is_empty());

        let spec = MapProjection::AuthaGraph.spec();
        assert!((spec.width - 4.0 * SQRT3).abs() < 1e-12);
        assert!(!spec.has_aspect);
    }

    #[test]
    fn test_authagraph_pole_is_fixed() {
        // The published aspect puts the net pole at 77 N 143 E; the
        // point antipodal-ish to it should still land in frame.
        let p = MapProjection::AuthaGraph
            .project(SphericalCoord::new(-HALF_PI + 0.01, 0.0))
            .unwrap();
        assert!(p.x().abs() <= 2.0 * SQRT3 + 1e-9);
        assert!(p.y().abs() <= 1.5 + 1e-9);
    }
}
