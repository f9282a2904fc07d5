//! Measure distortion of cataloged projections

use crate::cli::{AnalyzeArgs, Cli};
use anyhow::Context;
use carta_proj::registry;
use carta_proj::{sample_globe, DistortionField, MapProjection, PlanarCoord, SphericalCoord};
use std::cell::Cell;

pub fn run(args: &AnalyzeArgs, cli: &Cli) -> anyhow::Result<()> {
    let points = sample_globe(args.spacing);
    println!(
        "Sampling {} points at spacing {} rad",
        points.len(),
        args.spacing
    );

    for name in &args.names {
        let entry = registry::find(name)
            .with_context(|| format!("no projection named '{name}' in the catalog"))?;
        let projection = entry
            .instantiate(args.mesh_dir.as_deref())
            .with_context(|| format!("could not build '{}'", entry.name))?;
        report(&projection, &points, cli.verbose);
    }
    Ok(())
}

fn report(projection: &MapProjection, points: &[SphericalCoord], verbose: bool) {
    let anomalies = Cell::new(0usize);
    let forward = |coord: SphericalCoord| match projection.project(coord) {
        Ok(point) if point.x().is_finite() && point.y().is_finite() => point,
        _ => {
            anomalies.set(anomalies.get() + 1);
            if verbose {
                eprintln!(
                    "{}: no finite image for ({:.4}, {:.4})",
                    projection.name(),
                    coord.lat(),
                    coord.lon()
                );
            }
            PlanarCoord::new(f64::NAN, f64::NAN)
        }
    };

    let field = DistortionField::measure(points, &forward);
    println!(
        "{}: size spread {:.4}, mean shape distortion {:.4}",
        projection.name(),
        field.size_spread(),
        field.shape_mean()
    );
    if verbose {
        println!("    rms shape distortion {:.4}", field.shape_rms());
    }
    if anomalies.get() > 0 {
        println!(
            "    {} of {} forward evaluations had no finite image",
            anomalies.get(),
            3 * field.len()
        );
    }
}
