//! Error types for the stencil core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for stencil.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Manifest (template entry point) loading error.
    #[error("Manifest error in {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// Template module loading error.
    #[error("Template error in {path}: {message}")]
    Template { path: PathBuf, message: String },

    /// Stylesheet module parsing error.
    #[error("Stylesheet error in {path}: {message}")]
    Stylesheet { path: PathBuf, message: String },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new manifest error.
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new template error.
    pub fn template(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Template {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new stylesheet error.
    pub fn stylesheet(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Stylesheet {
            path: path.into(),
            message: message.into(),
        }
    }
}
