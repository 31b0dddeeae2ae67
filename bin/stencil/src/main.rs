//! Stencil CLI
//!
//! Single binary for the stencil site builder. One invocation runs one
//! build and exits; `--watch` (or `-w`) keeps rebuilding on debounced
//! template changes instead.
//!
//! This is the binary entry point. The library functionality is in
//! `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;
use stencil::RunOptions;

/// Command-line interface for stencil.
#[derive(Parser)]
#[command(name = "stencil", version, about = "Template-driven static site builder")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "stencil.toml")]
    config: std::path::PathBuf,

    /// Rebuild on template changes instead of exiting after one build
    #[arg(short, long)]
    watch: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    stencil::init_tracing(cli.verbose);

    stencil::run(&cli.config, RunOptions { watch: cli.watch }).await
}
