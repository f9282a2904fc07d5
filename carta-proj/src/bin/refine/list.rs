//! Print the projection catalog

use crate::cli::{Cli, ListArgs};
use carta_proj::registry::{self, EntryKind};

pub fn run(args: &ListArgs, _cli: &Cli) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(registry::all())?);
        return Ok(());
    }

    for entry in registry::all() {
        let aspect = if entry.has_aspect {
            "adjustable aspect"
        } else {
            "fixed aspect"
        };
        match entry.kind {
            EntryKind::ClosedForm => println!("{}  ({})", entry.name, aspect),
            EntryKind::Mesh { resource, .. } => {
                println!("{}  ({}, mesh {})", entry.name, aspect, resource)
            }
        }
        println!("    {}", entry.description);
        for param in entry.params {
            println!(
                "    {}: [{}, {}], default {}",
                param.name, param.min, param.max, param.default
            );
        }
    }
    Ok(())
}
