//! The render tree: an owned virtual-node representation of a page's
//! markup structure.
//!
//! Trees are produced by template loading and consumed by the markup
//! renderer; nothing else inspects them.

/// A single node in a render tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with a tag, attributes, and children.
    Element(Element),

    /// Text content, escaped on render.
    Text(String),

    /// Pre-rendered markup, emitted verbatim.
    Raw(String),
}

impl Node {
    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Create a raw markup node.
    pub fn raw(content: impl Into<String>) -> Self {
        Self::Raw(content.into())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An element node: tag, ordered attributes, ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with the given tag and no attributes or children.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    /// Append a sequence of child nodes.
    #[must_use]
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }
}
