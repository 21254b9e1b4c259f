use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use quill_codegen::{ImportPlan, Listing};
use quill_manifest::{MANIFEST_FILE, Manifest};
use serde::Serialize;

use super::{RenderOverrides, UnwrapOrExit};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to listing.toml (defaults to ./listing.toml)
    #[arg(short, long, default_value = MANIFEST_FILE)]
    pub config: PathBuf,

    /// Print the import plan as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub overrides: RenderOverrides,
}

/// JSON form of a checked manifest.
#[derive(Serialize)]
struct CheckReport<'a> {
    file: String,
    plan: &'a ImportPlan,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        let config = self.overrides.apply(manifest.render.clone());
        let document = manifest.to_document();
        let plan = document.plan(&config).unwrap_or_exit();

        if self.json {
            let report = CheckReport {
                file: document.file_path().display().to_string(),
                plan: &plan,
            };
            let json = serde_json::to_string_pretty(&report).wrap_err("Failed to encode plan")?;
            println!("{json}");
            return Ok(());
        }

        println!("✓ {} is valid\n", self.config.display());
        println!("  file: {}", document.file_path().display());

        let imports = plan.imports();
        if imports.is_empty() {
            println!("\n  no imports");
        } else {
            let mut listing = Listing::default();
            listing.emit(imports).unwrap_or_exit();
            println!(
                "\n  {} import{}:",
                imports.len(),
                if imports.len() == 1 { "" } else { "s" }
            );
            for line in listing.materialize().lines() {
                println!("    {line}");
            }
        }

        let levels: Vec<_> = plan.levels().collect();
        if !levels.is_empty() {
            println!("\n  {} name{}:", levels.len(), if levels.len() == 1 { "" } else { "s" });
            for (name, level) in levels {
                println!("    {name} -> {} ({level})", level.apply(name));
            }
        }

        for name in plan.shadowed() {
            eprintln!("warning: '{name}' is shadowed and stays fully qualified");
        }
        for name in plan.dropped() {
            eprintln!("warning: import of '{name}' collides with another import and was dropped");
        }
        for name in plan.pruned() {
            println!("  pruned unused import '{name}'");
        }
        Ok(())
    }
}
