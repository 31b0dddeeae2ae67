//! Markdown source to render tree conversion.
//!
//! Folds the pulldown-cmark event stream into an owned [`Node`] tree via
//! an element stack. Inline HTML passes through as raw nodes.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use stencil_core::tree::{Element, Node};

/// Parse a Markdown source into its top-level render-tree nodes.
pub fn to_tree(source: &str) -> Vec<Node> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let parser = Parser::new_ext(source, options);
    let mut builder = TreeBuilder::default();

    for event in parser {
        match event {
            Event::Start(tag) => builder.start(tag),
            Event::End(_) => builder.end(),
            Event::Text(text) => builder.push(Node::text(text.to_string())),
            Event::Code(code) => {
                builder.push(Element::new("code").child(Node::text(code.to_string())).into());
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                builder.push(Node::raw(html.to_string()));
            }
            Event::SoftBreak => builder.push(Node::text("\n")),
            Event::HardBreak => builder.push(Element::new("br").into()),
            Event::Rule => builder.push(Element::new("hr").into()),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input")
                    .attr("type", "checkbox")
                    .attr("disabled", "");
                if checked {
                    input = input.attr("checked", "");
                }
                builder.push(input.into());
            }
            _ => {}
        }
    }

    builder.finish()
}

/// How a stack frame is folded into its parent when its tag ends.
#[derive(Debug)]
enum FrameKind {
    /// Emitted as the element itself.
    Normal,

    /// Children spliced into the parent; no wrapping element.
    Fragment,

    /// A fenced or indented code block: children become the text of a
    /// `<code>` element nested in the frame's `<pre>`.
    Code(Option<String>),

    /// An image: child text becomes the `alt` attribute.
    Image { src: String, title: String },

    /// A table header row, wrapped in `<thead>` on end.
    TableHead,
}

#[derive(Debug)]
struct Frame {
    element: Element,
    kind: FrameKind,
}

#[derive(Debug, Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    roots: Vec<Node>,
}

impl TreeBuilder {
    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(frame) => frame.element.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::normal(Element::new("p")),
            Tag::Heading { level, id, .. } => {
                let mut element = Element::new(heading_tag(level));
                if let Some(id) = id {
                    element = element.attr("id", id.to_string());
                }
                Frame::normal(element)
            }
            Tag::BlockQuote(_) => Frame::normal(Element::new("blockquote")),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                Frame {
                    element: Element::default(),
                    kind: FrameKind::Code(language),
                }
            }
            Tag::List(Some(start)) => {
                let mut element = Element::new("ol");
                if start != 1 {
                    element = element.attr("start", start.to_string());
                }
                Frame::normal(element)
            }
            Tag::List(None) => Frame::normal(Element::new("ul")),
            Tag::Item => Frame::normal(Element::new("li")),
            Tag::Emphasis => Frame::normal(Element::new("em")),
            Tag::Strong => Frame::normal(Element::new("strong")),
            Tag::Strikethrough => Frame::normal(Element::new("del")),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut element = Element::new("a").attr("href", dest_url.to_string());
                if !title.is_empty() {
                    element = element.attr("title", title.to_string());
                }
                Frame::normal(element)
            }
            Tag::Image {
                dest_url, title, ..
            } => Frame {
                element: Element::default(),
                kind: FrameKind::Image {
                    src: dest_url.to_string(),
                    title: title.to_string(),
                },
            },
            Tag::Table(_) => Frame::normal(Element::new("table")),
            Tag::TableHead => Frame {
                element: Element::new("tr"),
                kind: FrameKind::TableHead,
            },
            Tag::TableRow => Frame::normal(Element::new("tr")),
            Tag::TableCell => {
                let in_head = self
                    .stack
                    .iter()
                    .any(|frame| matches!(frame.kind, FrameKind::TableHead));
                Frame::normal(Element::new(if in_head { "th" } else { "td" }))
            }
            // Unsupported structures contribute their children transparently.
            _ => Frame {
                element: Element::default(),
                kind: FrameKind::Fragment,
            },
        };

        self.stack.push(frame);
    }

    fn end(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };

        match frame.kind {
            FrameKind::Normal => self.push(frame.element.into()),
            FrameKind::Fragment => {
                for child in frame.element.children {
                    self.push(child);
                }
            }
            FrameKind::Code(language) => {
                let mut code = Element::new("code");
                if let Some(language) = language {
                    code = code.attr("class", format!("language-{language}"));
                }
                let code = code.children(frame.element.children);
                self.push(Element::new("pre").child(code.into()).into());
            }
            FrameKind::Image { src, title } => {
                let alt = collect_text(&frame.element.children);
                let mut img = Element::new("img").attr("src", src).attr("alt", alt);
                if !title.is_empty() {
                    img = img.attr("title", title);
                }
                self.push(img.into());
            }
            FrameKind::TableHead => {
                self.push(Element::new("thead").child(frame.element.into()).into());
            }
        }
    }

    fn finish(mut self) -> Vec<Node> {
        // A malformed event stream could leave open frames; fold them up.
        while !self.stack.is_empty() {
            self.end();
        }
        self.roots
    }
}

impl Frame {
    fn normal(element: Element) -> Self {
        Self {
            element,
            kind: FrameKind::Normal,
        }
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Flatten the text content of a node sequence (for image alt text).
fn collect_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => out.push_str(&collect_text(&element.children)),
            Node::Raw(_) => {}
        }
    }
    out
}
