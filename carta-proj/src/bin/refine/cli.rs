//! CLI argument definitions for refine

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "refine")]
#[command(about = "Map projection analysis and optimization")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the projection catalog
    List(ListArgs),

    /// Measure the distortion of cataloged projections
    Analyze(AnalyzeArgs),

    /// Optimize a projection family across the weight spectrum
    Optimize(OptimizeArgs),
}

#[derive(Parser)]
pub struct ListArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Projection names, as printed by `list`
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Sample spacing on the sphere, in radians
    #[arg(long, default_value = "0.02")]
    pub spacing: f64,

    /// Directory holding mesh CSV resources
    #[arg(long)]
    pub mesh_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct OptimizeArgs {
    /// Family to search: hyperelliptical, tetrapower, or tetrafillet
    pub family: String,

    /// Sample spacing on the sphere, in radians
    #[arg(long, default_value = "0.02")]
    pub spacing: f64,

    /// Write the frontier as JSON to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}
