//! HTML rendering of render trees.
//!
//! The only consumer of [`Node`] values: walks the tree and emits HTML
//! text with escaping and void-element handling.

use stencil_core::tree::{Element, Node};
use thiserror::Error;

/// Markup rendering errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    /// Tag names must be non-empty ASCII alphanumerics or hyphens.
    #[error("invalid tag name: {0:?}")]
    InvalidTag(String),

    /// Attribute names must be non-empty ASCII alphanumerics or hyphens.
    #[error("invalid attribute name: {0:?}")]
    InvalidAttr(String),

    /// Void elements cannot carry children.
    #[error("void element <{0}> has children")]
    VoidWithChildren(String),
}

/// Result type for markup rendering.
pub type Result<T> = std::result::Result<T, MarkupError>;

/// Elements that never take content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Render a node to HTML text.
pub fn render(node: &Node) -> Result<String> {
    let mut out = String::new();
    write_node(&mut out, node)?;
    Ok(out)
}

/// Render a node as a complete HTML document.
pub fn render_document(node: &Node) -> Result<String> {
    let mut out = String::from("<!DOCTYPE html>\n");
    write_node(&mut out, node)?;
    out.push('\n');
    Ok(out)
}

fn write_node(out: &mut String, node: &Node) -> Result<()> {
    match node {
        Node::Text(text) => {
            escape_text(out, text);
            Ok(())
        }
        Node::Raw(raw) => {
            out.push_str(raw);
            Ok(())
        }
        Node::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut String, element: &Element) -> Result<()> {
    if !is_valid_name(&element.tag) {
        return Err(MarkupError::InvalidTag(element.tag.clone()));
    }

    out.push('<');
    out.push_str(&element.tag);

    for (name, value) in &element.attrs {
        if !is_valid_name(name) {
            return Err(MarkupError::InvalidAttr(name.clone()));
        }
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            escape_attr(out, value);
            out.push('"');
        }
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        if !element.children.is_empty() {
            return Err(MarkupError::VoidWithChildren(element.tag.clone()));
        }
        return Ok(());
    }

    for child in &element.children {
        write_node(out, child)?;
    }

    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
