//! Refine: map projection analysis and optimization CLI
//!
//! Lists the projection catalog, measures distortion over a sample of
//! the sphere, and searches projection families for low-distortion
//! parameters.

mod analyze;
mod cli;
mod list;
mod optimize_cmd;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::List(args) => list::run(args, &cli),
        Commands::Analyze(args) => analyze::run(args, &cli),
        Commands::Optimize(args) => optimize_cmd::run(args, &cli),
    }
}
