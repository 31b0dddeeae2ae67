//! CSS generation from style caches.
//!
//! Takes the ordered (path, cache) pairs of a template bundle and emits
//! ordered (path, css text) pairs. Not a 1:1 mapping: caches that share
//! an output path are merged, and repeated rules are deduplicated with
//! first occurrence winning.

use std::collections::{HashMap, HashSet};

use stencil_core::style::{StyleCache, StyleRule};

/// Generate CSS text for each distinct output path.
pub fn generate(sheets: &[(String, StyleCache)]) -> Vec<(String, String)> {
    let mut order: Vec<&str> = Vec::new();
    let mut merged: HashMap<&str, Vec<&StyleRule>> = HashMap::new();
    let mut seen: HashMap<&str, HashSet<&StyleRule>> = HashMap::new();

    for (path, cache) in sheets {
        let path = path.as_str();
        if !merged.contains_key(path) {
            order.push(path);
            merged.insert(path, Vec::new());
            seen.insert(path, HashSet::new());
        }

        for rule in cache.rules() {
            let is_new = seen
                .get_mut(path)
                .is_some_and(|rules| rules.insert(rule));
            if is_new {
                if let Some(bucket) = merged.get_mut(path) {
                    bucket.push(rule);
                }
            }
        }
    }

    order
        .into_iter()
        .map(|path| (path.to_string(), emit(&merged[path])))
        .collect()
}

fn emit(rules: &[&StyleRule]) -> String {
    let mut out = String::new();

    for rule in rules {
        if rule.body.is_empty() {
            out.push_str(&rule.selector);
            out.push_str(";\n");
        } else {
            out.push_str(&rule.selector);
            out.push_str(" {\n");
            out.push_str(&rule.body);
            out.push_str("\n}\n");
        }
    }

    out
}
