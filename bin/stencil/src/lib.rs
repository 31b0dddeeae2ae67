//! Stencil CLI Library
//!
//! Command drivers for the stencil site builder, plus the programmatic
//! entry point used by the binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, watch)

use std::path::Path;

use color_eyre::eyre::Result;

pub mod cmd;

// Re-export core types for convenience
pub use stencil_core::Config;
pub use stencil_generator::{BuildStats, Builder};

/// Options for [`run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Rebuild on debounced template changes instead of exiting after one
    /// build.
    pub watch: bool,
}

/// Run the builder with the given configuration file.
///
/// Performs one build cycle, or — with `watch` set — installs a
/// filesystem watcher and rebuilds per debounced change batch without
/// ever returning on its own.
pub async fn run(config_path: &Path, options: RunOptions) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    if options.watch {
        cmd::watch::run(config).await
    } else {
        cmd::build::run(config).await
    }
}

/// Initialize tracing with the specified verbosity level.
///
/// `verbose` maps 0 → WARN, 1 → INFO, 2 → DEBUG, 3+ → TRACE.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_options_default_is_single_build() {
        assert!(!RunOptions::default().watch);
    }
}
