use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use quill_manifest::{MANIFEST_FILE, Manifest};
use tracing::info;

use super::{RenderOverrides, UnwrapOrExit};

#[derive(Args)]
pub struct RenderCommand {
    /// Path to listing.toml (defaults to ./listing.toml)
    #[arg(short, long, default_value = MANIFEST_FILE)]
    pub config: PathBuf,

    /// Output directory; prints to stdout when absent
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: RenderOverrides,
}

impl RenderCommand {
    /// Run the render command
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        let config = self.overrides.apply(manifest.render.clone());
        let file = manifest
            .to_document()
            .source_file(&config)
            .unwrap_or_exit();

        match &self.output {
            Some(dir) => {
                let path = file.write(dir)?;
                info!(path = %path.display(), "wrote source file");
                println!("✓ wrote {}", path.display());
            }
            None => print!("{}", file.content()),
        }
        Ok(())
    }
}
