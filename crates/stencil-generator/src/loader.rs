//! Template loading.
//!
//! Loads the manifest entry point and its page/stylesheet modules through
//! the module registry, producing a fresh [`TemplateBundle`] each cycle.
//! The registry subtree under the template root is invalidated up front,
//! so every user module is re-read from disk; entries outside that tree
//! are never touched.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use stencil_core::config::SiteConfig;
use stencil_core::error::{CoreError, Result};
use stencil_core::style::StyleCache;
use stencil_core::tree::{Element, Node};
use stencil_core::TemplateBundle;
use tracing::debug;

use crate::markdown;
use crate::registry::ModuleRegistry;

/// Name of the template entry point inside the template root.
pub const MANIFEST_FILE: &str = "site.toml";

const CSS_PREFIX: &str = "css/";

/// The template entry point: declares the page and stylesheet modules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub pages: Vec<PageDecl>,

    #[serde(default)]
    pub stylesheets: Vec<StylesheetDecl>,
}

/// A declared page: output path, Markdown source, optional title.
#[derive(Debug, Clone, Deserialize)]
pub struct PageDecl {
    pub output: String,
    pub source: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// A declared stylesheet: output path (normalized under `css/`) and CSS
/// source.
#[derive(Debug, Clone, Deserialize)]
pub struct StylesheetDecl {
    pub output: String,
    pub source: String,
}

/// A loaded template module, as cached in the registry.
#[derive(Debug, Clone)]
pub enum Module {
    Manifest(Manifest),
    Page(Vec<Node>),
    Stylesheet(StyleCache),
}

/// Loads template bundles, owning the module registry.
#[derive(Debug)]
pub struct TemplateLoader {
    root: PathBuf,
    site: SiteConfig,
    registry: ModuleRegistry<Module>,
}

impl TemplateLoader {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, site: SiteConfig) -> Self {
        Self {
            root: root.into(),
            site,
            registry: ModuleRegistry::new(),
        }
    }

    /// The template source tree this loader reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The module registry backing this loader.
    pub fn registry(&self) -> &ModuleRegistry<Module> {
        &self.registry
    }

    /// Load a fresh template bundle.
    ///
    /// Every module under the template root is forced to reload; failures
    /// propagate to the caller with no partial bundle.
    pub fn load(&mut self) -> Result<TemplateBundle> {
        self.registry.invalidate_below(&self.root);

        let manifest = self.load_manifest()?;

        let stylesheet_outputs: Vec<String> = manifest
            .stylesheets
            .iter()
            .map(|decl| css_output(&decl.output))
            .collect();

        let mut pages = Vec::with_capacity(manifest.pages.len());
        for decl in &manifest.pages {
            let body = self.load_page(&decl.source)?;
            let title = decl.title.as_deref().unwrap_or(self.site.title.as_str());
            let tree = document(title, &self.site.language, &stylesheet_outputs, body);
            pages.push((decl.output.clone(), tree));
        }

        let mut stylesheets = Vec::with_capacity(manifest.stylesheets.len());
        for (decl, output) in manifest.stylesheets.iter().zip(stylesheet_outputs) {
            let cache = self.load_stylesheet(&decl.source)?;
            stylesheets.push((output, cache));
        }

        debug!(
            pages = pages.len(),
            stylesheets = stylesheets.len(),
            "loaded template bundle"
        );

        Ok(TemplateBundle { pages, stylesheets })
    }

    fn load_manifest(&mut self) -> Result<Manifest> {
        let path = self.root.join(MANIFEST_FILE);
        let module = self.registry.get_or_try_insert(&path, |path| {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| CoreError::manifest(path, e.to_string()))?;
            let manifest: Manifest =
                toml::from_str(&raw).map_err(|e| CoreError::manifest(path, e.to_string()))?;
            debug!(path = %path.display(), "loaded manifest");
            Ok::<Module, CoreError>(Module::Manifest(manifest))
        })?;

        match module {
            Module::Manifest(manifest) => Ok(manifest.clone()),
            _ => Err(CoreError::manifest(path, "cached module is not a manifest")),
        }
    }

    fn load_page(&mut self, source: &str) -> Result<Vec<Node>> {
        let path = self.root.join(source);
        let module = self.registry.get_or_try_insert(&path, |path| {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| CoreError::template(path, e.to_string()))?;
            debug!(path = %path.display(), "loaded page module");
            Ok::<Module, CoreError>(Module::Page(markdown::to_tree(&raw)))
        })?;

        match module {
            Module::Page(nodes) => Ok(nodes.clone()),
            _ => Err(CoreError::template(path, "cached module is not a page")),
        }
    }

    fn load_stylesheet(&mut self, source: &str) -> Result<StyleCache> {
        let path = self.root.join(source);
        let module = self.registry.get_or_try_insert(&path, |path| {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| CoreError::template(path, e.to_string()))?;
            let cache = StyleCache::parse(&raw)
                .map_err(|e| CoreError::stylesheet(path, e.to_string()))?;
            debug!(path = %path.display(), rules = cache.len(), "loaded stylesheet module");
            Ok::<Module, CoreError>(Module::Stylesheet(cache))
        })?;

        match module {
            Module::Stylesheet(cache) => Ok(cache.clone()),
            _ => Err(CoreError::template(path, "cached module is not a stylesheet")),
        }
    }
}

/// Normalize a stylesheet output path under the `css/` directory.
fn css_output(output: &str) -> String {
    if output.starts_with(CSS_PREFIX) {
        output.to_string()
    } else {
        format!("{CSS_PREFIX}{output}")
    }
}

/// Wrap page body nodes in the document shell.
fn document(title: &str, language: &str, stylesheets: &[String], body: Vec<Node>) -> Node {
    let mut head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8").into())
        .child(Element::new("title").child(Node::text(title)).into());

    for href in stylesheets {
        head = head.child(
            Element::new("link")
                .attr("rel", "stylesheet")
                .attr("href", format!("/{href}"))
                .into(),
        );
    }

    Element::new("html")
        .attr("lang", language)
        .child(head.into())
        .child(Element::new("body").children(body).into())
        .into()
}
