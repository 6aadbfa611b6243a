//! Element lookup by directive options and by name

use super::syntax::{has_directive, strip_directives, syntax};
use crate::svg::{NodeId, SvgDocument};
use std::collections::HashMap;

/// Descendants of `root` whose id carries a directive with any of `keys`
pub fn elements_with_options(doc: &SvgDocument, root: NodeId, keys: &[&str]) -> Vec<NodeId> {
    doc.descendants(root)
        .into_iter()
        .filter(|&node| {
            let Some(id) = doc.attr(node, "id").filter(|id| has_directive(id)) else {
                return false;
            };
            match syntax(id) {
                Ok(directive) => directive.first_key(keys).is_some(),
                Err(e) => {
                    log::warn!("ignoring directive on '{}': {}", id, e);
                    false
                }
            }
        })
        .collect()
}

/// Name -> element lookup over `root` and its descendants
///
/// An id with a directive is reachable by its tag-stripped base name and by
/// the directive's own name; a plain id by itself. The first element to
/// claim a name keeps it.
pub fn elements_by_name(doc: &SvgDocument, root: NodeId) -> HashMap<String, NodeId> {
    let mut names = HashMap::new();
    for node in std::iter::once(root).chain(doc.descendants(root)) {
        let Some(id) = doc.attr(node, "id") else {
            continue;
        };
        if !has_directive(id) {
            names.entry(id.to_string()).or_insert(node);
            continue;
        }
        let base = strip_directives(id);
        let base = base.trim_matches(|c: char| c == ' ' || c == '-');
        if !base.is_empty() {
            names.entry(base.to_string()).or_insert(node);
        }
        if let Ok(directive) = syntax(id) {
            if !directive.name.is_empty() {
                names.entry(directive.name).or_insert(node);
            }
        }
    }
    names
}
