mod check;
mod completions;
mod render;

use check::CheckCommand;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use completions::CompletionsCommand;
use eyre::Result;
use quill_codegen::{Indent, NamingPolicy, RenderConfig};
use render::RenderCommand;
use tracing::Level;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for quill_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

impl<T> UnwrapOrExit<T> for quill_codegen::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "quill")]
#[command(version)]
#[command(about = "Render Java source files from TOML listing manifests")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Render(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }

    /// Install the stderr log subscriber at the requested verbosity.
    pub fn init_tracing(&self) {
        let level = match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the Java file described by listing.toml
    Render(RenderCommand),

    /// Validate listing.toml and show the import plan
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Naming policy as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Naming {
    Canonical,
    ExplicitOnly,
    AutoImport,
}

impl From<Naming> for NamingPolicy {
    fn from(naming: Naming) -> Self {
        match naming {
            Naming::Canonical => NamingPolicy::Canonical,
            Naming::ExplicitOnly => NamingPolicy::ExplicitOnly,
            Naming::AutoImport => NamingPolicy::AutoImport,
        }
    }
}

/// Render settings that override the manifest's `[render]` table.
#[derive(clap::Args, Debug, Default)]
pub(crate) struct RenderOverrides {
    /// Spaces per indentation level, 0 for a tab
    #[arg(long)]
    pub indent: Option<u8>,

    /// Keep declared imports that nothing references
    #[arg(long)]
    pub no_prune: bool,

    /// Naming policy (overrides listing.toml setting)
    #[arg(long, value_enum)]
    pub naming: Option<Naming>,
}

impl RenderOverrides {
    pub fn apply(&self, mut config: RenderConfig) -> RenderConfig {
        if let Some(width) = self.indent {
            config = config.indent(match width {
                0 => Indent::Tab,
                n => Indent::Spaces(n),
            });
        }
        if self.no_prune {
            config = config.prune_unused_imports(false);
        }
        if let Some(naming) = self.naming {
            config = config.naming(naming.into());
        }
        config
    }
}
