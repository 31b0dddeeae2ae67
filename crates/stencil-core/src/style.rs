//! Style caches: ordered collections of CSS rules extracted from
//! stylesheet sources.
//!
//! A `StyleCache` is opaque to the output writer; only the stylesheet
//! generator consumes it.

use thiserror::Error;

/// Style cache parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleParseError {
    /// A closing brace without a matching opening brace, or vice versa.
    #[error("unbalanced braces in stylesheet")]
    UnbalancedBraces,

    /// A declaration block with nothing in front of it.
    #[error("declaration block without a selector")]
    MissingSelector,
}

/// A single extracted rule.
///
/// Statement rules such as `@import` have an empty body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleRule {
    pub selector: String,
    pub body: String,
}

/// An ordered collection of CSS rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleCache {
    rules: Vec<StyleRule>,
}

impl StyleCache {
    /// Parse a stylesheet source into a cache of top-level rules.
    ///
    /// Nested blocks (e.g. `@media`) are kept whole inside the body of
    /// their top-level rule.
    pub fn parse(source: &str) -> Result<Self, StyleParseError> {
        let source = strip_comments(source);

        let mut rules = Vec::new();
        let mut selector = String::new();
        let mut body = String::new();
        let mut depth = 0usize;

        for ch in source.chars() {
            match ch {
                '{' => {
                    if depth > 0 {
                        body.push(ch);
                    } else if selector.trim().is_empty() {
                        return Err(StyleParseError::MissingSelector);
                    }
                    depth += 1;
                }
                '}' => {
                    if depth == 0 {
                        return Err(StyleParseError::UnbalancedBraces);
                    }
                    depth -= 1;
                    if depth == 0 {
                        rules.push(StyleRule {
                            selector: selector.trim().to_string(),
                            body: body.trim().to_string(),
                        });
                        selector.clear();
                        body.clear();
                    } else {
                        body.push(ch);
                    }
                }
                ';' if depth == 0 => {
                    let statement = selector.trim();
                    if !statement.is_empty() {
                        rules.push(StyleRule {
                            selector: statement.to_string(),
                            body: String::new(),
                        });
                    }
                    selector.clear();
                }
                _ => {
                    if depth == 0 {
                        selector.push(ch);
                    } else {
                        body.push(ch);
                    }
                }
            }
        }

        if depth != 0 {
            return Err(StyleParseError::UnbalancedBraces);
        }

        let trailing = selector.trim();
        if !trailing.is_empty() {
            rules.push(StyleRule {
                selector: trailing.to_string(),
                body: String::new(),
            });
        }

        Ok(Self { rules })
    }

    /// The extracted rules, in source order.
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Append a rule.
    pub fn push(&mut self, rule: StyleRule) {
        self.rules.push(rule);
    }

    /// Append all rules from another cache, preserving order.
    pub fn merge(&mut self, other: StyleCache) {
        self.rules.extend(other.rules);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Remove `/* ... */` comments. An unterminated comment swallows the rest
/// of the input.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }

    out.push_str(rest);
    out
}
