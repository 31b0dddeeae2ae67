//! Output directory management and file emission.
//!
//! Every build clears the previous output (the `css/` subtree and the
//! direct-child HTML files) before writing; there is no incremental
//! diffing and no rollback of steps that already ran.

use std::io;
use std::path::Path;

use stencil_core::TemplateBundle;
use tokio::fs;
use tracing::debug;

use crate::build::Result;
use crate::{markup, stylesheet};

/// Subdirectory of the output directory holding generated CSS.
pub const CSS_DIR: &str = "css";

/// Write a bundle into the output directory.
///
/// Returns the number of pages and stylesheets written. The first failure
/// aborts the remaining writes; files already written stay on disk.
pub async fn write_output(bundle: &TemplateBundle, out_dir: &Path) -> Result<(usize, usize)> {
    clean_output(out_dir).await?;
    fs::create_dir_all(out_dir.join(CSS_DIR)).await?;

    let mut pages = 0;
    for (path, tree) in &bundle.pages {
        let html = markup::render_document(tree)?;
        let dest = out_dir.join(path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&dest, html).await?;
        debug!(path = %dest.display(), "wrote page");
        pages += 1;
    }

    let mut stylesheets = 0;
    for (path, css) in stylesheet::generate(&bundle.stylesheets) {
        let dest = out_dir.join(&path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&dest, css).await?;
        debug!(path = %dest.display(), "wrote stylesheet");
        stylesheets += 1;
    }

    Ok((pages, stylesheets))
}

/// Remove the `css/` subtree and the direct-child `*.html` files.
///
/// A missing output directory (first build) is not an error.
async fn clean_output(out_dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(out_dir.join(CSS_DIR)).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut entries = match fs::read_dir(out_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_html = path.extension().is_some_and(|ext| ext == "html");
        if is_html && entry.file_type().await?.is_file() {
            debug!(path = %path.display(), "removing stale page");
            fs::remove_file(&path).await?;
        }
    }

    Ok(())
}
