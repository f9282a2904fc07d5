//! Two-phase parameter search over projection families.
//!
//! A coarse odometer scan of the parameter box feeds the best start
//! per weight into a fixed-budget finite-difference descent. Each
//! weight blends size and shape distortion differently, so the
//! per-weight optima trace an approximate trade-off frontier between
//! equal-area and conformal behaviour.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;

use carta_core::constants::{HALF_PI, PI, SQRT2, TWOPI};

use crate::coordinate::{PlanarCoord, SphericalCoord};
use crate::distortion::DistortionField;
use crate::tetrahedral::{self, WIDE_FACE};

/// Objective weights, from strongly size-favouring to strongly
/// shape-favouring. One optimum is produced per weight.
pub const WEIGHTS: [f64; 11] = [0.083, 0.20, 0.33, 0.50, 0.71, 1.0, 1.4, 2.0, 3.0, 5.0, 12.0];

const NUM_DESCENT: usize = 40;
const GRADIENT_PROBE: f64 = 1e-7;
const DESCENT_RATE: f64 = 5e-2;

/// Stage labels reported through [`ProgressSink`].
pub const SCAN_STAGE: &str = "scanning parameter grid";
pub const REFINE_STAGE: &str = "refining by gradient descent";

/// Inclusive search range of one family parameter.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParamBounds {
    pub min: f64,
    pub max: f64,
}

/// Best parameters found for one weight, with the distortion pair they
/// achieve. NaN size and shape mean the family never produced a finite
/// measurement anywhere in its box.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyOptimum {
    pub weight: f64,
    pub size: f64,
    pub shape: f64,
    pub params: Vec<f64>,
}

/// Observer for coarse progress checkpoints. Both phases report a
/// cumulative completed/total pair under a stage label; calls may
/// arrive from worker threads.
pub trait ProgressSink: Sync {
    fn checkpoint(&self, stage: &str, completed: usize, total: usize);
}

/// Sink that discards every checkpoint.
pub struct SilentSink;

impl ProgressSink for SilentSink {
    fn checkpoint(&self, _stage: &str, _completed: usize, _total: usize) {}
}

/// Searches a family's parameter box and returns one optimum per entry
/// of [`WEIGHTS`], in weight order.
pub fn optimize_family<F, P>(
    family: &F,
    bounds: &[ParamBounds],
    points: &[SphericalCoord],
    progress: &P,
) -> Vec<FamilyOptimum>
where
    F: Fn(SphericalCoord, &[f64]) -> PlanarCoord + Sync,
    P: ProgressSink,
{
    let grid = parameter_grid(bounds);
    progress.checkpoint(SCAN_STAGE, 0, grid.len());
    let scanned = AtomicUsize::new(0);
    let measured: Vec<(f64, f64)> = grid
        .par_iter()
        .map(|params| {
            let result = measure_family(family, params, points);
            let done = scanned.fetch_add(1, Ordering::Relaxed) + 1;
            progress.checkpoint(SCAN_STAGE, done, grid.len());
            result
        })
        .collect();

    let refine_total = WEIGHTS.len() * NUM_DESCENT;
    progress.checkpoint(REFINE_STAGE, 0, refine_total);
    let refined = AtomicUsize::new(0);
    WEIGHTS
        .par_iter()
        .map(|&weight| {
            let mut best_value = f64::INFINITY;
            let mut best_index = None;
            for (index, &(size, shape)) in measured.iter().enumerate() {
                let value = objective(size, shape, weight);
                if value < best_value {
                    best_value = value;
                    best_index = Some(index);
                }
            }
            let tick = || {
                let done = refined.fetch_add(1, Ordering::Relaxed) + 1;
                progress.checkpoint(REFINE_STAGE, done, refine_total);
            };
            match best_index {
                Some(index) => descend(
                    family,
                    points,
                    weight,
                    &grid[index],
                    measured[index],
                    best_value,
                    &tick,
                ),
                None => {
                    for _ in 0..NUM_DESCENT {
                        tick();
                    }
                    FamilyOptimum {
                        weight,
                        size: f64::NAN,
                        shape: f64::NAN,
                        params: bounds.iter().map(|bound| bound.min).collect(),
                    }
                }
            }
        })
        .collect()
}

fn objective(size: f64, shape: f64, weight: f64) -> f64 {
    size.powf(1.5) + weight * shape.powf(1.5)
}

fn measure_family<F>(family: &F, params: &[f64], points: &[SphericalCoord]) -> (f64, f64)
where
    F: Fn(SphericalCoord, &[f64]) -> PlanarCoord + Sync,
{
    let field = DistortionField::measure(points, &|coord| family(coord, params));
    (field.size_spread(), field.shape_mean())
}

/// Odometer walk over the parameter box. The per-axis step count is
/// `floor(16^(1/n))`, shrunk by a hair so the walk reaches past the
/// upper bound before an axis rolls over; the all-minimum corner is the
/// starting state and is never itself emitted.
fn parameter_grid(bounds: &[ParamBounds]) -> Vec<Vec<f64>> {
    let axis_steps = 16f64.powf(1.0 / bounds.len() as f64).floor();
    let mut params: Vec<f64> = bounds.iter().map(|bound| bound.min).collect();
    let mut grid = Vec::new();
    loop {
        let mut advanced = false;
        for i in 0..params.len() {
            if params[i] < bounds[i].max {
                for (param, bound) in params[..i].iter_mut().zip(&bounds[..i]) {
                    *param = bound.min;
                }
                params[i] += (bounds[i].max - bounds[i].min) / axis_steps * 0.99999999;
                advanced = true;
                break;
            }
        }
        if !advanced {
            return grid;
        }
        grid.push(params.clone());
    }
}

/// Fixed-budget descent from the scan's best start for one weight. The
/// result is kept only when it does not worsen the objective; a NaN
/// excursion therefore falls back to the scan result.
fn descend<F, T>(
    family: &F,
    points: &[SphericalCoord],
    weight: f64,
    start: &[f64],
    brute: (f64, f64),
    brute_value: f64,
    tick: &T,
) -> FamilyOptimum
where
    F: Fn(SphericalCoord, &[f64]) -> PlanarCoord + Sync,
    T: Fn(),
{
    let mut params = start.to_vec();
    let mut value = brute_value;
    let mut gradient = vec![0.0; params.len()];
    for iteration in 0..NUM_DESCENT {
        if iteration > 0 {
            let (size, shape) = measure_family(family, &params, points);
            value = objective(size, shape, weight);
        }
        for axis in 0..params.len() {
            params[axis] += GRADIENT_PROBE;
            let (size, shape) = measure_family(family, &params, points);
            gradient[axis] = (objective(size, shape, weight) - value) / GRADIENT_PROBE;
            params[axis] -= GRADIENT_PROBE;
        }
        for (param, slope) in params.iter_mut().zip(&gradient) {
            *param -= slope * DESCENT_RATE;
        }
        tick();
    }

    let (size, shape) = measure_family(family, &params, points);
    if objective(size, shape, weight) <= brute_value {
        FamilyOptimum {
            weight,
            size,
            shape,
            params,
        }
    } else {
        FamilyOptimum {
            weight,
            size: brute.0,
            shape: brute.1,
            params: start.to_vec(),
        }
    }
}

/// Search box for [`hyperelliptical`]: superellipse order, latitude
/// spacing exponent, aspect ratio.
pub const HYPERELLIPTICAL_BOUNDS: [ParamBounds; 3] = [
    ParamBounds { min: 2.5, max: 5.0 },
    ParamBounds { min: 0.5, max: 1.75 },
    ParamBounds { min: 1.0, max: 2.0 },
];

/// Search box for [`tetrapower`] and [`tetrafillet`].
pub const TETRAHEDRAL_BOUNDS: [ParamBounds; 3] = [
    ParamBounds { min: 0.25, max: 2.25 },
    ParamBounds { min: 0.25, max: 2.25 },
    ParamBounds { min: 0.25, max: 2.25 },
];

/// Pseudocylindrical family bounded by a superellipse of order `k`,
/// with parallels spaced by the exponent `n` and overall aspect `a`.
pub fn hyperelliptical(coord: SphericalCoord, params: &[f64]) -> PlanarCoord {
    let (k, n, a) = (params[0], params[1], params[2]);
    let t = (coord.lat() / HALF_PI).abs();
    PlanarCoord::new(
        (1.0 - t.powf(k)).powf(1.0 / k) * coord.lon(),
        (1.0 - (1.0 - t).powf(n)) / n.sqrt() * coord.lat().signum() * HALF_PI * a,
    )
}

/// Tetrahedral family with power-warped bearings and radii; the face
/// boundary stays the straight-edged triangle.
pub fn tetrapower(coord: SphericalCoord, params: &[f64]) -> PlanarCoord {
    tetrahedral::project_with(&WIDE_FACE, coord, |lat, lon| {
        power_sector(lat, lon, params, |tht_p| 0.5 / tht_p.cos())
    })
}

/// Like [`tetrapower`] but with the face corners rounded off by a
/// polynomial fillet.
pub fn tetrafillet(coord: SphericalCoord, params: &[f64]) -> PlanarCoord {
    tetrahedral::project_with(&WIDE_FACE, coord, |lat, lon| {
        power_sector(lat, lon, params, |tht_p| {
            0.5 + tht_p.powi(2) / 4.0 + 5.0 * tht_p.powi(4) / 48.0 - 0.132621 * tht_p.powi(6)
        })
    })
}

/// Shared face-frame formula of the tetrahedral families. `r_max_of`
/// gives the sector's boundary radius as a function of the warped
/// bearing, which is all that distinguishes the two.
fn power_sector<R>(lat: f64, lon: f64, params: &[f64], r_max_of: R) -> (f64, f64)
where
    R: Fn(f64) -> f64,
{
    let (k1, k2, k3) = (params[0], params[1], params[2]);
    let sector = TWOPI / 3.0;
    let t0 = ((lon + PI / 3.0) / sector).floor() * sector;
    let tht = lon - t0;
    let tht_p = PI / 3.0 * (1.0 - (1.0 - tht.abs() / HALF_PI).powf(k1)) / (1.0 - 3f64.powf(-k1))
        * tht.signum();
    let weight = tht_p.abs() / (PI / 3.0);
    let k_rad = k3 * weight + k2 * (1.0 - weight);
    let r_max = r_max_of(tht_p);
    let rtgf = (1.0 / lat.tan() * tht.cos()).atan() / SQRT2.atan() * r_max;
    let r = (1.0 - (1.0 - rtgf).powf(k_rad)) / (1.0 - (1.0 - r_max).powf(k_rad))
        * r_max
        * 2.0
        * PI
        / 3.0;
    (r, tht_p + t0)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::distortion::sample_globe;

    #[test]
    fn test_parameter_grid_walks_the_box() {
        let unit = ParamBounds { min: 0.0, max: 1.0 };

        let line = parameter_grid(&[unit]);
        assert_eq!(line.len(), 17);
        assert!((line[0][0] - 1.0 / 16.0).abs() < 1e-7);
        assert!(line.last().unwrap()[0] > 1.0, "scan ends past the box edge");

        let cube = parameter_grid(&[unit; 3]);
        assert_eq!(cube.len(), 63);
        assert!(cube.iter().all(|point| point.len() == 3));
        // The all-minimum corner is the start state, never emitted.
        assert!(cube.iter().all(|point| point.iter().any(|&v| v != 0.0)));
    }

    #[test]
    fn test_refinement_never_loses_to_the_scan() {
        // Anisotropic stretch with its optimum inside the box.
        let family = |coord: SphericalCoord, params: &[f64]| {
            let stretch = 1.0 + (params[0] - 0.9) * (params[0] - 0.9);
            PlanarCoord::new(coord.lon() * stretch, coord.lat() / stretch)
        };
        let bounds = [ParamBounds { min: 0.5, max: 1.5 }];
        let points = sample_globe(0.5);
        let optima = optimize_family(&family, &bounds, &points, &SilentSink);
        assert_eq!(optima.len(), WEIGHTS.len());

        let grid = parameter_grid(&bounds);
        for optimum in &optima {
            let brute = grid
                .iter()
                .map(|params| {
                    let (size, shape) = measure_family(&family, params, &points);
                    objective(size, shape, optimum.weight)
                })
                .fold(f64::INFINITY, f64::min);
            let refined = objective(optimum.size, optimum.shape, optimum.weight);
            assert!(
                refined <= brute + 1e-12,
                "weight {}: refined {refined} vs scan {brute}",
                optimum.weight
            );
        }
    }

    #[test]
    fn test_unmeasurable_family_reports_nan() {
        let family = |_: SphericalCoord, _: &[f64]| PlanarCoord::new(f64::NAN, f64::NAN);
        let bounds = [ParamBounds { min: 0.0, max: 1.0 }];
        let optima = optimize_family(&family, &bounds, &sample_globe(1.0), &SilentSink);
        assert_eq!(optima.len(), WEIGHTS.len());
        for optimum in &optima {
            assert!(optimum.size.is_nan());
            assert!(optimum.shape.is_nan());
            assert_eq!(optimum.params, vec![0.0]);
        }
    }

    struct RecordingSink {
        events: Mutex<Vec<(String, usize, usize)>>,
    }

    impl ProgressSink for RecordingSink {
        fn checkpoint(&self, stage: &str, completed: usize, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push((stage.to_string(), completed, total));
        }
    }

    #[test]
    fn test_progress_reports_both_stages_in_order() {
        let family = |coord: SphericalCoord, params: &[f64]| {
            PlanarCoord::new(coord.lon() * (1.0 + params[0]), coord.lat())
        };
        let bounds = [ParamBounds { min: 0.0, max: 1.0 }];
        let sink = RecordingSink {
            events: Mutex::new(Vec::new()),
        };
        optimize_family(&family, &bounds, &sample_globe(1.0), &sink);

        let events = sink.events.into_inner().unwrap();
        let switch = events
            .iter()
            .position(|(stage, _, _)| stage == REFINE_STAGE)
            .unwrap();
        assert!(events[..switch].iter().all(|(stage, _, _)| stage == SCAN_STAGE));
        assert!(events[switch..].iter().all(|(stage, _, _)| stage == REFINE_STAGE));

        // The scan saw every grid point, the refinement every descent
        // iteration, whatever order the worker threads ran in.
        assert_eq!(events[..switch].iter().map(|e| e.1).max(), Some(17));
        let refine_total = WEIGHTS.len() * NUM_DESCENT;
        assert_eq!(events[switch..].iter().map(|e| e.1).max(), Some(refine_total));
        assert!(events[switch..].iter().all(|e| e.2 == refine_total));
    }

    #[test]
    fn test_families_stay_finite_over_the_box_corners() {
        let cloud = sample_globe(0.6);
        let boxes: [(&dyn Fn(SphericalCoord, &[f64]) -> PlanarCoord, &[ParamBounds]); 3] = [
            (&hyperelliptical, &HYPERELLIPTICAL_BOUNDS),
            (&tetrapower, &TETRAHEDRAL_BOUNDS),
            (&tetrafillet, &TETRAHEDRAL_BOUNDS),
        ];
        for (family, bounds) in boxes {
            for corner in [
                bounds.iter().map(|b| b.min).collect::<Vec<_>>(),
                bounds.iter().map(|b| b.max).collect::<Vec<_>>(),
            ] {
                for &point in &cloud {
                    let planar = family(point, &corner);
                    assert!(
                        planar.x().is_finite() && planar.y().is_finite(),
                        "non-finite at {point:?} with {corner:?}"
                    );
                }
            }
        }
    }
}
