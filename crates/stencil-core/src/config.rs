//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for stencil.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Watch mode settings.
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title, used as the fallback page title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Language code for the document root element.
    #[serde(default = "default_language")]
    pub language: String,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory holding the template sources.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Output directory for the generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Watch mode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Quiet period after the last filesystem event before a rebuild fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Whether watch mode runs a build before the first change event.
    #[serde(default = "default_true")]
    pub initial_build: bool,
}

// Default value functions
fn default_title() -> String {
    "Untitled Site".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            language: default_language(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            initial_build: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.watch.debounce_ms == 0 {
            return Err(CoreError::config("watch.debounce_ms must be at least 1"));
        }

        if self.build.templates_dir.as_os_str().is_empty() {
            return Err(CoreError::config("build.templates_dir cannot be empty"));
        }

        if self.build.output_dir.as_os_str().is_empty() {
            return Err(CoreError::config("build.output_dir cannot be empty"));
        }

        Ok(())
    }
}
