//! Stencil Core Library
//!
//! Core types, configuration, and error handling for the stencil site
//! builder: the render-tree and style-cache data model, the template
//! bundle produced by each load cycle, and the TOML configuration.

pub mod bundle;
pub mod config;
pub mod error;
pub mod style;
pub mod tree;

pub use bundle::TemplateBundle;
pub use config::Config;
pub use error::{CoreError, Result};
pub use style::{StyleCache, StyleRule};
pub use tree::{Element, Node};
