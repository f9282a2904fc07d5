//! Shared machinery for projections that unfold a regular tetrahedron.
//!
//! Every member of the family is the same three-step pipeline: pick the
//! face (or vertex) nearest the input point, run a per-face formula in
//! that face's oblique frame, then place the resulting polar coordinates
//! into a flat net of triangles. The nets:
//!
//! | Layout | Plane size | Centra | Out-of-bounds rule |
//! |--------|-----------|--------|--------------------|
//! | [`WIDE_FACE`] | 6 x 2 sqrt(3) | 6 face centers | reflect across the nearest horizontal edge |
//! | [`TRIANGLE_FACE`] | 4 sqrt(3) x 6 | 4 face centers | none |
//! | [`WIDE_VERTEX`] | 6 x 2 sqrt(3) | 4 vertices | reflect across the nearest horizontal edge |
//! | [`AUTHAGRAPH`] | 4 sqrt(3) x 3 | 4 vertices + 2 repeats | wrap x periodically |

use once_cell::sync::Lazy;

use carta_core::constants::{HALF_PI, PI, SQRT3};
use carta_core::math::floor_mod;

use crate::coordinate::{PlanarCoord, SphericalCoord};
use crate::oblique::ObliqueAspect;

pub(crate) mod authagraph;
mod dixon;
pub(crate) mod lee;
pub(crate) mod tetragraph;

/// One face center or vertex of the unfolded tetrahedron.
///
/// `lat`/`lon` locate the centrum on the globe and `spin` orients its
/// local frame; together they define the oblique aspect the per-face
/// formula runs in. `plane_rot` and the `x`/`y` offsets then place the
/// face's polar output into the net.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Centrum {
    pub lat: f64,
    pub lon: f64,
    pub spin: f64,
    pub plane_rot: f64,
    pub x: f64,
    pub y: f64,
}

impl Centrum {
    fn new(lat: f64, lon: f64, spin: f64, plane_rot: f64, x: f64, y: f64) -> Self {
        Self {
            lat,
            lon,
            spin,
            plane_rot,
            x,
            y,
        }
    }

    pub(crate) fn aspect(&self) -> ObliqueAspect {
        ObliqueAspect::new(self.lat, self.lon, self.spin)
    }
}

/// What to do with forward output that falls outside the plane box.
///
/// Each net leaves a sliver of one face hanging over the edge; the rule
/// moves that sliver to the congruent position on the other side.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Relocation {
    /// Leave the point where it landed.
    None,
    /// Point reflection through the fold vertex on the top or bottom
    /// edge: `(x, y) -> (-x, span * sign(y) - y)`.
    Reflect { span: f64 },
    /// The net tiles periodically along x; wrap into the central period.
    WrapX,
}

impl Relocation {
    fn apply(&self, point: PlanarCoord, width: f64) -> PlanarCoord {
        match self {
            Self::None => point,
            Self::Reflect { span } => {
                let flip = if point.y() > 0.0 {
                    *span
                } else if point.y() < 0.0 {
                    -*span
                } else {
                    0.0
                };
                PlanarCoord::new(-point.x(), flip - point.y())
            }
            Self::WrapX => PlanarCoord::new(
                floor_mod(point.x() + 3.0 * width / 2.0, width) - width / 2.0,
                point.y(),
            ),
        }
    }
}

/// Which plane points have a preimage under the inverse.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Bounds {
    /// The whole plane box maps back.
    Rectangle,
    /// Only the published triangle `y > sqrt(3) |x| - 3` maps back.
    Triangle,
}

pub(crate) struct Layout {
    pub width: f64,
    pub height: f64,
    pub relocation: Relocation,
    pub bounds: Bounds,
    pub centra: Vec<Centrum>,
}

impl Layout {
    pub(crate) fn in_bounds(&self, point: PlanarCoord) -> bool {
        match self.bounds {
            Bounds::Rectangle => true,
            Bounds::Triangle => point.y() > SQRT3 * point.x().abs() - 3.0,
        }
    }
}

/// Face-centered net shaped like `[<|>]`, two half-faces split across
/// the top edge and two across the bottom.
pub(crate) static WIDE_FACE: Lazy<Layout> = Lazy::new(|| {
    let a = (1.0f64 / 3.0).asin();
    Layout {
        width: 6.0,
        height: 2.0 * SQRT3,
        relocation: Relocation::Reflect { span: SQRT3 },
        bounds: Bounds::Rectangle,
        // lat, lon, spin, plane rotation, x, y
        centra: vec![
            Centrum::new(a, PI, -2.0 * PI / 3.0, -2.0 * PI / 3.0, 2.0, SQRT3),
            Centrum::new(a, PI, 2.0 * PI / 3.0, -PI / 3.0, -2.0, SQRT3),
            Centrum::new(-HALF_PI, 0.0, 2.0 * PI / 3.0, 2.0 * PI / 3.0, 2.0, -SQRT3),
            Centrum::new(-HALF_PI, 0.0, -2.0 * PI / 3.0, PI / 3.0, -2.0, -SQRT3),
            Centrum::new(a, PI / 3.0, -2.0 * PI / 3.0, PI, 1.0, 0.0),
            Centrum::new(a, -PI / 3.0, 2.0 * PI / 3.0, 0.0, -1.0, 0.0),
        ],
    }
});

/// Face-centered net in one large triangle, the form Lee published.
pub(crate) static TRIANGLE_FACE: Lazy<Layout> = Lazy::new(|| {
    let a = (1.0f64 / 3.0).asin();
    Layout {
        width: 4.0 * SQRT3,
        height: 6.0,
        relocation: Relocation::None,
        bounds: Bounds::Triangle,
        // lat, lon, spin, plane rotation, x, y
        centra: vec![
            Centrum::new(a, PI / 3.0, 0.0, -5.0 * PI / 6.0, SQRT3, 2.0),
            Centrum::new(a, -PI / 3.0, 0.0, -PI / 6.0, -SQRT3, 2.0),
            Centrum::new(a, PI, 0.0, HALF_PI, 0.0, -1.0),
            Centrum::new(-HALF_PI, 0.0, 0.0, -HALF_PI, 0.0, 1.0),
        ],
    }
});

/// Vertex-centered net shaped like `[<|>]`.
pub(crate) static WIDE_VERTEX: Lazy<Layout> = Lazy::new(|| {
    let a = (1.0f64 / 3.0).asin();
    Layout {
        width: 6.0,
        height: 2.0 * SQRT3,
        relocation: Relocation::Reflect { span: 2.0 * SQRT3 },
        bounds: Bounds::Rectangle,
        // lat, lon, spin, plane rotation, x, y
        centra: vec![
            Centrum::new(HALF_PI, 0.0, PI / 3.0, -PI / 3.0, 0.0, SQRT3),
            Centrum::new(-a, 0.0, 2.0 * PI / 3.0, PI / 3.0, 0.0, -SQRT3),
            Centrum::new(-a, 2.0 * PI / 3.0, -2.0 * PI / 3.0, PI, 3.0, 0.0),
            Centrum::new(-a, -2.0 * PI / 3.0, 2.0 * PI / 3.0, 0.0, -3.0, 0.0),
        ],
    }
});

/// Vertex-centered zigzag strip `|\/\/|` with the offset the AuthaGraph
/// poster uses. The last two centra repeat the first two one period to
/// the right so the inverse can resolve the whole strip; the forward
/// selection always ties onto the originals.
pub(crate) static AUTHAGRAPH: Lazy<Layout> = Lazy::new(|| {
    let a = (1.0f64 / 3.0).asin();
    Layout {
        width: 4.0 * SQRT3,
        height: 3.0,
        relocation: Relocation::WrapX,
        bounds: Bounds::Rectangle,
        // lat, lon, spin, plane rotation, x, y
        centra: vec![
            Centrum::new(-a, PI, 0.0, -HALF_PI, -2.0 * SQRT3 - 0.6096, 1.5),
            Centrum::new(-a, -PI / 3.0, -2.0 * PI / 3.0, HALF_PI, -SQRT3 - 0.6096, -1.5),
            Centrum::new(HALF_PI, 0.0, 0.0, -HALF_PI, -0.6096, 1.5),
            Centrum::new(-a, PI / 3.0, 2.0 * PI / 3.0, HALF_PI, SQRT3 - 0.6096, -1.5),
            Centrum::new(-a, PI, 0.0, -HALF_PI, 2.0 * SQRT3 - 0.6096, 1.5),
            Centrum::new(-a, -PI / 3.0, -2.0 * PI / 3.0, HALF_PI, 3.0 * SQRT3 - 0.6096, -1.5),
        ],
    }
});

/// Picks the centrum whose local frame puts the point at the highest
/// latitude, i.e. the nearest one. Ties happen where repeated centra
/// split a face across the map edge; the longitude cosine then picks
/// the half that owns the point. At a shared pole itself the local
/// longitude is all rounding noise, so which of the pair wins there is
/// deterministic but not a table-order guarantee.
fn select_centrum<'a>(layout: &'a Layout, coord: SphericalCoord) -> (&'a Centrum, SphericalCoord) {
    let mut best = &layout.centra[0];
    let mut best_local = SphericalCoord::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for centrum in &layout.centra {
        let local = centrum.aspect().shift(coord);
        if local.lat() > best_local.lat()
            || (local.lat() == best_local.lat() && local.lon().cos() > best_local.lon().cos())
        {
            best = centrum;
            best_local = local;
        }
    }
    (best, best_local)
}

/// Runs the forward pipeline: face selection, the per-face formula
/// `inner` in polar form, placement into the net, and at most one
/// out-of-bounds relocation.
pub(crate) fn project_with<F>(layout: &Layout, coord: SphericalCoord, inner: F) -> PlanarCoord
where
    F: Fn(f64, f64) -> (f64, f64),
{
    let (centrum, local) = select_centrum(layout, coord);
    let (r, theta) = inner(local.lat(), local.lon());
    let th = theta + centrum.plane_rot;
    let point = PlanarCoord::new(r * th.cos() + centrum.x, r * th.sin() + centrum.y);
    if point.x().abs() > layout.width / 2.0 || point.y().abs() > layout.height / 2.0 {
        layout.relocation.apply(point, layout.width)
    } else {
        point
    }
}

/// Runs the inverse pipeline: bounds test, nearest centrum by plane
/// offset, the per-face inverse `inner`, and the oblique unshift back
/// to absolute coordinates. `inner` returning `None` propagates.
pub(crate) fn invert_with<F>(layout: &Layout, point: PlanarCoord, inner: F) -> Option<SphericalCoord>
where
    F: Fn(f64, f64) -> Option<(f64, f64)>,
{
    if !layout.in_bounds(point) {
        return None;
    }
    let mut best = &layout.centra[0];
    let mut best_dist = f64::INFINITY;
    for centrum in &layout.centra {
        let dist = (point.x() - centrum.x).hypot(point.y() - centrum.y);
        if dist < best_dist {
            best = centrum;
            best_dist = dist;
        }
    }
    let dx = point.x() - best.x;
    let dy = point.y() - best.y;
    let (lat, lon) = inner(dx.hypot(dy), dy.atan2(dx) - best.plane_rot)?;
    Some(best.aspect().unshift(SphericalCoord::new(lat, lon)))
}
