//! Build command - one cycle, then exit.

use color_eyre::eyre::Result;
use stencil_core::Config;
use stencil_generator::Builder;

/// Run a single build cycle.
///
/// The cycle's failure is logged at this boundary and surfaced to the
/// caller, so the process exits non-zero on a failed build.
pub async fn run(config: Config) -> Result<()> {
    let mut builder = Builder::new(config);

    println!("Building {}...", builder.templates_dir().display());

    match builder.build().await {
        Ok(stats) => {
            println!(
                "  {} pages, {} stylesheets in {}ms",
                stats.pages, stats.stylesheets, stats.duration_ms
            );
            println!("  Output: {}", builder.output_dir().display());
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "build failed");
            Err(e.into())
        }
    }
}
