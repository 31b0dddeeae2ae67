//! Build orchestration.
//!
//! One build cycle: invalidate and reload the template bundle, clear the
//! output directory, render pages, generate stylesheets, write files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use stencil_core::{Config, CoreError};
use thiserror::Error;
use tracing::info;

use crate::loader::TemplateLoader;
use crate::markup::MarkupError;
use crate::writer;

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Template loading error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Markup rendering error.
    #[error("render error: {0}")]
    Markup(#[from] MarkupError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of pages written.
    pub pages: usize,

    /// Number of stylesheets written.
    pub stylesheets: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that runs build cycles.
#[derive(Debug)]
pub struct Builder {
    loader: TemplateLoader,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a builder from a configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            loader: TemplateLoader::new(config.build.templates_dir, config.site),
            output_dir: config.build.output_dir,
        }
    }

    /// The template source tree this builder watches and loads.
    pub fn templates_dir(&self) -> &Path {
        self.loader.root()
    }

    /// The output directory this builder writes into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run one build cycle.
    ///
    /// Loads templates before touching the output directory, so a load
    /// failure leaves the previous output intact. Errors propagate; the
    /// caller decides whether to abort or keep watching.
    pub async fn build(&mut self) -> Result<BuildStats> {
        let start = Instant::now();

        info!(
            templates = %self.loader.root().display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        let bundle = self.loader.load()?;
        let (pages, stylesheets) = writer::write_output(&bundle, &self.output_dir).await?;

        let stats = BuildStats {
            pages,
            stylesheets,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            pages = stats.pages,
            stylesheets = stats.stylesheets,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }
}
