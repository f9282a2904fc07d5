//! Optimize a projection family and report its distortion frontier

use crate::cli::{Cli, OptimizeArgs};
use anyhow::{bail, Context};
use carta_proj::optimize::{self, ParamBounds, ProgressSink};
use carta_proj::{sample_globe, PlanarCoord, SphericalCoord};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::sync::Mutex;

type FamilyFn = fn(SphericalCoord, &[f64]) -> PlanarCoord;

pub fn run(args: &OptimizeArgs, cli: &Cli) -> anyhow::Result<()> {
    let (family, bounds): (FamilyFn, &[ParamBounds]) = match args.family.as_str() {
        "hyperelliptical" => (optimize::hyperelliptical, &optimize::HYPERELLIPTICAL_BOUNDS),
        "tetrapower" => (optimize::tetrapower, &optimize::TETRAHEDRAL_BOUNDS),
        "tetrafillet" => (optimize::tetrafillet, &optimize::TETRAHEDRAL_BOUNDS),
        other => bail!(
            "unknown family '{other}'; expected hyperelliptical, tetrapower, or tetrafillet"
        ),
    };

    let points = sample_globe(args.spacing);
    eprintln!(
        "Optimizing {} over {} sample points",
        args.family,
        points.len()
    );

    let sink = BarSink::new();
    let optima = optimize::optimize_family(&family, bounds, &points, &sink);
    sink.finish();

    if cli.verbose {
        for optimum in &optima {
            eprintln!(
                "weight {:>6}: size {:.4}, shape {:.4}, params {:?}",
                optimum.weight, optimum.size, optimum.shape, optimum.params
            );
        }
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create {}", path.display()))?;
            serde_json::to_writer_pretty(file, &optima)?;
            println!("Frontier written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&optima)?),
    }
    Ok(())
}

/// Progress bar that restarts whenever the optimizer enters a new
/// stage.
struct BarSink {
    bar: ProgressBar,
    stage: Mutex<String>,
}

impl BarSink {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        BarSink {
            bar,
            stage: Mutex::new(String::new()),
        }
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl ProgressSink for BarSink {
    fn checkpoint(&self, stage: &str, completed: usize, total: usize) {
        if let Ok(mut current) = self.stage.lock() {
            if *current != stage {
                *current = stage.to_string();
                self.bar.set_length(total as u64);
                self.bar.set_message(stage.to_string());
            }
        }
        self.bar.set_position(completed as u64);
    }
}
