//! Projections defined by a precomputed distortion-optimised mesh.
//!
//! A mesh projection carries no formula of its own. The forward
//! direction looks up the cell of a coarse latitude-longitude grid and
//! interpolates between that cell's vertex positions; the inverse walks
//! a dense pixel grid of precomputed coordinates the other way. Both
//! grids come from a single CSV resource, one per projection, in the
//! format [`loader`] describes.
//!
//! Two interpolation schemes exist. [`MeshInterpolation::Planar`]
//! blends vertex positions bilinearly in latitude and longitude.
//! [`MeshInterpolation::Spherical`] first maps the cell onto a pair of
//! triangles whose widths follow the parallels, which keeps the
//! interpolation honest near the poles.

use std::fmt;
use std::path::Path;

use carta_core::constants::{HALF_PI, PI, TWOPI};
use carta_core::math::lin_interp;
use carta_core::Vector3;

use crate::coordinate::{PlanarCoord, SphericalCoord};
use crate::error::{ProjResult, ProjectionError};

mod loader;

/// How vertex positions are interpolated between grid points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum MeshInterpolation {
    Planar,
    Spherical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellShape {
    NegativeSlope,
    PositiveSlope,
    Quad,
}

#[derive(Debug, Clone)]
struct Cell {
    shape: CellShape,
    verts: Vec<PlanarCoord>,
}

#[derive(Debug, Clone)]
struct MeshData {
    width: f64,
    height: f64,
    cells: Vec<Vec<Cell>>,
    edge: Vec<PlanarCoord>,
    pixels: Vec<Vec<SphericalCoord>>,
}

/// Result of a mesh inverse lookup.
///
/// The pixel grid extrapolates beyond the map edge, so every plane
/// point gets an answer; `outside` says whether the point was beyond
/// the edge polygon. Outside coordinates carry a full-turn longitude
/// bias so they stay distinguishable after the fact.
#[derive(Debug, Clone, Copy)]
pub struct MeshInverse {
    coord: SphericalCoord,
    outside: bool,
}

impl MeshInverse {
    #[inline]
    pub fn coord(&self) -> SphericalCoord {
        self.coord
    }

    #[inline]
    pub fn is_outside(&self) -> bool {
        self.outside
    }
}

/// A projection backed by a mesh resource.
#[derive(Debug, Clone)]
pub struct MeshProjection {
    name: String,
    kind: MeshInterpolation,
    has_aspect: bool,
    data: MeshData,
}

impl MeshProjection {
    /// Loads a mesh from `path`. Any read or parse failure comes back
    /// as a resource error naming the projection.
    pub fn from_csv(
        kind: MeshInterpolation,
        name: impl Into<String>,
        path: &Path,
    ) -> ProjResult<Self> {
        let name = name.into();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ProjectionError::resource(name.clone(), e.to_string()))?;
        let data =
            loader::parse(&text).map_err(|msg| ProjectionError::resource(name.clone(), msg))?;
        Ok(Self {
            name,
            kind,
            has_aspect: true,
            data,
        })
    }

    /// A zero-size placeholder that never panics, for callers that
    /// must hold something when the resource is absent.
    pub fn degenerate(kind: MeshInterpolation, name: impl Into<String>) -> Self {
        let zero = PlanarCoord::new(0.0, 0.0);
        let origin = SphericalCoord::new(0.0, 0.0);
        Self {
            name: name.into(),
            kind,
            has_aspect: true,
            data: MeshData {
                width: 0.0,
                height: 0.0,
                cells: vec![vec![Cell {
                    shape: CellShape::Quad,
                    verts: vec![zero; 4],
                }]],
                edge: vec![zero],
                pixels: vec![vec![origin; 2]; 2],
            },
        }
    }

    /// Marks the mesh as tied to one orientation of the globe. Meshes
    /// optimised against the continents lose their meaning under an
    /// oblique aspect.
    pub fn with_fixed_aspect(mut self) -> Self {
        self.has_aspect = false;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> MeshInterpolation {
        self.kind
    }

    #[inline]
    pub fn has_aspect(&self) -> bool {
        self.has_aspect
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.data.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.data.height
    }

    pub fn project(&self, coord: SphericalCoord) -> ProjResult<PlanarCoord> {
        match self.kind {
            MeshInterpolation::Planar => Ok(self.project_planar(coord)),
            MeshInterpolation::Spherical => self.project_spherical(coord),
        }
    }

    /// Cell row and column for a coordinate, with the fractional
    /// position measured from the cell's north west corner.
    fn locate_cell(&self, coord: SphericalCoord) -> (usize, usize, f64, f64) {
        let rows = self.data.cells.len();
        let cols = self.data.cells[0].len();
        let i_f = lin_interp(coord.lat(), HALF_PI, -HALF_PI, 0.0, rows as f64);
        let j_f = lin_interp(coord.lon(), -PI, PI, 0.0, cols as f64);
        let i = (i_f as usize).min(rows - 1);
        let j = (j_f as usize).min(cols - 1);
        (i, j, i_f - i as f64, j_f - j as f64)
    }

    fn project_planar(&self, coord: SphericalCoord) -> PlanarCoord {
        let (i, j, cs, ce) = self.locate_cell(coord);
        let cn = 1.0 - cs;
        let cw = 1.0 - ce;
        let cell = &self.data.cells[i][j];
        let v = &cell.verts;
        let (corners, weights) = match cell.shape {
            CellShape::NegativeSlope => {
                if ce >= cs {
                    ([v[0], v[1], v[5]], [1.0 - cw - cs, cw, cs])
                } else {
                    ([v[3], v[4], v[2]], [1.0 - ce - cn, ce, cn])
                }
            }
            CellShape::PositiveSlope => {
                if ce >= cn {
                    ([v[5], v[0], v[4]], [1.0 - cn - cw, cn, cw])
                } else {
                    ([v[2], v[3], v[1]], [1.0 - cs - ce, cs, ce])
                }
            }
            CellShape::Quad => {
                let x = cn * ce * v[0].x() + cn * cw * v[1].x() + cs * cw * v[2].x()
                    + cs * ce * v[3].x();
                let y = cn * ce * v[0].y() + cn * cw * v[1].y() + cs * cw * v[2].y()
                    + cs * ce * v[3].y();
                return PlanarCoord::new(x, y);
            }
        };
        let x = weights[0] * corners[0].x() + weights[1] * corners[1].x()
            + weights[2] * corners[2].x();
        let y = weights[0] * corners[0].y() + weights[1] * corners[1].y()
            + weights[2] * corners[2].y();
        PlanarCoord::new(x, y)
    }

    fn project_spherical(&self, coord: SphericalCoord) -> ProjResult<PlanarCoord> {
        let rows = self.data.cells.len();
        let (i, j, cs, ce) = self.locate_cell(coord);
        let cell = &self.data.cells[i][j];
        let v = &cell.verts;

        // Cell corners in a local frame whose widths track the
        // parallels, so triangles keep their true proportions.
        let p_north = HALF_PI - i as f64 * PI / rows as f64;
        let p_south = HALF_PI - (i + 1) as f64 * PI / rows as f64;
        let y_s = 1.0 - cs;
        let x_s = (ce - 0.5) * (y_s * p_north.cos() + (1.0 - y_s) * p_south.cos());
        let nw = (-0.5 * p_north.cos(), 1.0);
        let ne = (0.5 * p_north.cos(), 1.0);
        let sw = (-0.5 * p_south.cos(), 0.0);
        let se = (0.5 * p_south.cos(), 0.0);

        let candidates = match cell.shape {
            CellShape::NegativeSlope => vec![
                (ne, nw, se, [v[0], v[1], v[5]]),
                (sw, se, nw, [v[3], v[4], v[2]]),
            ],
            CellShape::PositiveSlope => vec![
                (se, ne, sw, [v[5], v[0], v[4]]),
                (nw, sw, ne, [v[2], v[3], v[1]]),
            ],
            CellShape::Quad => {
                if i < rows / 2 {
                    vec![(nw, sw, se, [v[1], v[2], v[3]])]
                } else {
                    vec![(sw, ne, nw, [v[2], v[0], v[1]])]
                }
            }
        };

        for (t0, t1, t2, plane) in candidates {
            // Barycentric weights of (x_s, y_s) in the sphere-side
            // triangle, reused on the plane-side corners.
            let det = (t1.1 - t2.1) * (t2.0 - t0.0) + (t2.0 - t1.0) * (t2.1 - t0.1);
            let c0 = ((t1.1 - t2.1) * (t2.0 - x_s) + (t2.0 - t1.0) * (t2.1 - y_s)) / det;
            let c1 = ((t2.1 - t0.1) * (t2.0 - x_s) + (t0.0 - t2.0) * (t2.1 - y_s)) / det;
            let c2 = 1.0 - c0 - c1;
            if c0 >= 0.0 && c1 >= 0.0 && c2 >= 0.0 {
                return Ok(PlanarCoord::new(
                    c0 * plane[0].x() + c1 * plane[1].x() + c2 * plane[2].x(),
                    c0 * plane[0].y() + c1 * plane[1].y() + c2 * plane[2].y(),
                ));
            }
        }
        Err(ProjectionError::invalid_input(format!(
            "({}, {}) falls outside every triangle of its cell",
            coord.lat(),
            coord.lon()
        )))
    }

    /// Inverse lookup through the pixel grid. Interpolation runs on
    /// unit vectors rather than raw angles so cells that straddle the
    /// antimeridian blend cleanly.
    pub fn invert(&self, point: PlanarCoord) -> MeshInverse {
        let inside = self.edge_contains(point);

        let pix_rows = self.data.pixels.len();
        let pix_cols = self.data.pixels[0].len();
        let half_w = self.data.width / 2.0;
        let half_h = self.data.height / 2.0;
        let i_f = lin_interp(point.y(), half_h, -half_h, 0.0, (pix_rows - 1) as f64);
        let j_f = lin_interp(point.x(), -half_w, half_w, 0.0, (pix_cols - 1) as f64);
        let i0 = (i_f as usize).min(pix_rows - 2);
        let j0 = (j_f as usize).min(pix_cols - 2);
        let cy = i_f - i0 as f64;
        let cx = j_f - j0 as f64;

        let mut sum = Vector3::zeros();
        for (di, row_weight) in [(0, 1.0 - cy), (1, cy)] {
            for (dj, weight) in [(0, (1.0 - cx) * row_weight), (1, cx * row_weight)] {
                let pix = self.data.pixels[i0 + di][j0 + dj];
                sum = sum + Vector3::from_spherical(pix.lat(), pix.lon()) * weight;
            }
        }
        let (lat, lon) = sum.to_spherical();
        MeshInverse {
            coord: SphericalCoord::new(lat, if inside { lon } else { lon + TWOPI }),
            outside: !inside,
        }
    }

    /// Even-odd ray cast against the boundary polygon.
    fn edge_contains(&self, point: PlanarCoord) -> bool {
        let edge = &self.data.edge;
        let n = edge.len();
        let mut inside = false;
        for k in 0..n {
            let p0 = edge[k];
            let p1 = edge[(k + 1) % n];
            if (p0.y() > point.y()) != (p1.y() > point.y()) {
                let x_cross =
                    (point.y() - p0.y()) / (p1.y() - p0.y()) * (p1.x() - p0.x()) + p0.x();
                if x_cross > point.x() {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

impl fmt::Display for MeshProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One planar cell covering the whole globe, mapping it onto the
    /// square [-1, 1] x [-1, 1].
    fn whole_globe_quad() -> MeshProjection {
        MeshProjection {
            name: "quad".into(),
            kind: MeshInterpolation::Planar,
            has_aspect: true,
            data: MeshData {
                width: 2.0,
                height: 2.0,
                cells: vec![vec![Cell {
                    shape: CellShape::Quad,
                    verts: vec![
                        PlanarCoord::new(1.0, 1.0),
                        PlanarCoord::new(-1.0, 1.0),
                        PlanarCoord::new(-1.0, -1.0),
                        PlanarCoord::new(1.0, -1.0),
                    ],
                }]],
                edge: vec![
                    PlanarCoord::new(-1.0, -1.0),
                    PlanarCoord::new(1.0, -1.0),
                    PlanarCoord::new(1.0, 1.0),
                    PlanarCoord::new(-1.0, 1.0),
                ],
                pixels: vec![
                    vec![
                        SphericalCoord::new(HALF_PI / 2.0, -HALF_PI),
                        SphericalCoord::new(HALF_PI / 2.0, HALF_PI),
                    ],
                    vec![
                        SphericalCoord::new(-HALF_PI / 2.0, -HALF_PI),
                        SphericalCoord::new(-HALF_PI / 2.0, HALF_PI),
                    ],
                ],
            },
        }
    }

    #[test]
    fn test_planar_quad_blend_is_bilinear() {
        let mesh = whole_globe_quad();
        let center = mesh.project(SphericalCoord::new(0.0, 0.0)).unwrap();
        assert!(center.x().abs() < 1e-12);
        assert!(center.y().abs() < 1e-12);

        let p = mesh
            .project(SphericalCoord::new(PI / 4.0, HALF_PI))
            .unwrap();
        assert!((p.x() - 0.5).abs() < 1e-12, "x = {}", p.x());
        assert!((p.y() - 0.5).abs() < 1e-12, "y = {}", p.y());

        // The domain corners collapse onto single vertex weights, so
        // they must come back exactly.
        for (lat, lon, x, y) in [
            (HALF_PI, -PI, -1.0, 1.0),
            (HALF_PI, PI, 1.0, 1.0),
            (-HALF_PI, -PI, -1.0, -1.0),
            (-HALF_PI, PI, 1.0, -1.0),
        ] {
            let p = mesh.project(SphericalCoord::new(lat, lon)).unwrap();
            assert_eq!(p.x(), x, "corner ({lat}, {lon})");
            assert_eq!(p.y(), y, "corner ({lat}, {lon})");
        }
    }

    #[test]
    fn test_planar_sloped_cell_is_continuous_across_diagonal() {
        // Vertices laid out so both triangles reproduce the identity;
        // any seam on the diagonal would break it.
        let ne = PlanarCoord::new(1.0, 1.0);
        let nw = PlanarCoord::new(-1.0, 1.0);
        let sw = PlanarCoord::new(-1.0, -1.0);
        let se = PlanarCoord::new(1.0, -1.0);
        let mut mesh = whole_globe_quad();
        mesh.data.cells[0][0] = Cell {
            shape: CellShape::NegativeSlope,
            verts: vec![ne, nw, nw, sw, se, se],
        };
        for (lat, lon) in [(0.9, -0.4), (-0.9, 0.4), (0.2, 2.8), (-1.1, -2.0)] {
            let p = mesh.project(SphericalCoord::new(lat, lon)).unwrap();
            assert!((p.x() - lon / PI).abs() < 1e-12, "x at ({lat}, {lon})");
            assert!((p.y() - lat / HALF_PI).abs() < 1e-12, "y at ({lat}, {lon})");
        }
    }

    #[test]
    fn test_spherical_triangle_blend() {
        // Two rows, one column; the north cell becomes the triangle
        // (nw, sw, se) mapped to (0,1), (-1,0), (1,0).
        let mut mesh = whole_globe_quad();
        mesh.kind = MeshInterpolation::Spherical;
        mesh.data.cells = vec![
            vec![Cell {
                shape: CellShape::Quad,
                verts: vec![
                    PlanarCoord::new(0.0, 0.0),
                    PlanarCoord::new(0.0, 1.0),
                    PlanarCoord::new(-1.0, 0.0),
                    PlanarCoord::new(1.0, 0.0),
                ],
            }],
            vec![Cell {
                shape: CellShape::Quad,
                verts: vec![
                    PlanarCoord::new(0.0, 0.0),
                    PlanarCoord::new(0.0, -1.0),
                    PlanarCoord::new(-1.0, 0.0),
                    PlanarCoord::new(1.0, 0.0),
                ],
            }],
        ];
        let p = mesh.project(SphericalCoord::new(PI / 4.0, 0.0)).unwrap();
        assert!(p.x().abs() < 1e-9, "x = {}", p.x());
        assert!((p.y() - 0.5).abs() < 1e-9, "y = {}", p.y());
    }

    #[test]
    fn test_inverse_blends_pixels() {
        let mesh = whole_globe_quad();
        let inv = mesh.invert(PlanarCoord::new(0.0, 0.0));
        assert!(!inv.is_outside());
        assert!(inv.coord().lat().abs() < 1e-9);
        assert!(inv.coord().lon().abs() < 1e-9);

        // Midway down the west edge the two blended pixels share a
        // longitude, so the direction average keeps it.
        let west = mesh.invert(PlanarCoord::new(-1.0, 0.0));
        assert!(!west.is_outside());
        assert!(west.coord().lat().abs() < 1e-9);
        assert!((west.coord().lon() + HALF_PI).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_flags_points_beyond_the_edge() {
        let mesh = whole_globe_quad();
        let inv = mesh.invert(PlanarCoord::new(5.0, 0.0));
        assert!(inv.is_outside());
        assert!(inv.coord().lon() > PI, "lon = {}", inv.coord().lon());
    }

    #[test]
    fn test_degenerate_mesh_never_panics() {
        let planar = MeshProjection::degenerate(MeshInterpolation::Planar, "missing");
        let p = planar.project(SphericalCoord::new(0.5, 1.0)).unwrap();
        assert_eq!(p.x(), 0.0);
        assert_eq!(p.y(), 0.0);
        let inv = planar.invert(PlanarCoord::new(0.3, -0.2));
        assert!(inv.is_outside());

        let spherical = MeshProjection::degenerate(MeshInterpolation::Spherical, "missing");
        assert!(spherical.project(SphericalCoord::new(0.5, 1.0)).is_err());
    }

    #[test]
    fn test_fixed_aspect_builder() {
        let mesh = MeshProjection::degenerate(MeshInterpolation::Spherical, "pinned");
        assert!(mesh.has_aspect());
        assert!(!mesh.with_fixed_aspect().has_aspect());
    }

    #[test]
    fn test_from_csv_loads_and_projects() {
        use std::io::Write as _;

        let mut text = String::from("4,1,1,4,2,2,2,2\n");
        text.push_str("1,1\n-1,1\n-1,-1\n1,-1\n");
        text.push_str("0,0,1,2,3\n");
        text.push_str("2\n3\n0\n1\n");
        text.push_str("0.7854,-1.5708\n0.7854,1.5708\n");
        text.push_str("-0.7854,-1.5708\n-0.7854,1.5708\n");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        let mesh =
            MeshProjection::from_csv(MeshInterpolation::Planar, "tiny", file.path()).unwrap();
        assert_eq!(mesh.width(), 2.0);
        let p = mesh.project(SphericalCoord::new(0.0, 0.0)).unwrap();
        assert!(p.x().abs() < 1e-12 && p.y().abs() < 1e-12);
        let inv = mesh.invert(PlanarCoord::new(0.0, 0.0));
        assert!(!inv.is_outside());
    }

    #[test]
    fn test_from_csv_failure_names_the_projection() {
        let missing = Path::new("/definitely/not/here.csv");
        let err =
            MeshProjection::from_csv(MeshInterpolation::Spherical, "danseijiN", missing)
                .unwrap_err();
        assert!(err.to_string().contains("danseijiN"), "got: {err}");
        assert!(err.is_fatal());
    }
}
