//! Template cleanup before dynamics are discovered
//!
//! - `text`: drop `x`/`y` on a `tspan` when its parent `text` already positions
//!   it, so replaced text does not jump
//! - `decode`: turn `_xHEX_` escapes in element ids back into characters
//! - `all`: both of the above

use super::document::{NodeId, SvgDocument};
use crate::parse::decode_illustrator;

fn enabled(methods: &[&str], method: &str) -> bool {
    methods.iter().any(|m| *m == "all" || *m == method)
}

pub fn clean_svg(doc: &mut SvgDocument, svg: NodeId, methods: &[&str]) {
    if enabled(methods, "text") {
        for tspan in doc.find_all(svg, &["tspan"]) {
            let Some(parent) = doc.parent(tspan) else {
                continue;
            };
            for coord in ["x", "y"] {
                if doc.has_attr(parent, coord) {
                    doc.remove_attr(tspan, coord);
                }
            }
        }
    }

    if enabled(methods, "decode") {
        for node in doc.descendants(svg) {
            if let Some(id) = doc.attr(node, "id") {
                let decoded = decode_illustrator(id);
                if decoded != id {
                    doc.set_attr(node, "id", &decoded);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<svg><text x="1" y="2"><tspan x="1" y="2">{{Revenue}}</tspan></text><text><tspan x="5">a</tspan></text><rect id="bar_x7B__x7B_s:Revenue_x7D__x7D_"/></svg>"#;

    #[test]
    fn test_text_cleanup() {
        let mut doc = SvgDocument::parse(TEMPLATE).unwrap();
        let root = doc.root();
        clean_svg(&mut doc, root, &["text"]);
        let tspans = doc.find_all(root, &["tspan"]);
        assert!(!doc.has_attr(tspans[0], "x"));
        assert!(!doc.has_attr(tspans[0], "y"));
        assert_eq!(doc.attr(tspans[1], "x"), Some("5"));
        let rect = doc.find_all(root, &["rect"])[0];
        assert_eq!(doc.attr(rect, "id"), Some("bar_x7B__x7B_s:Revenue_x7D__x7D_"));
    }

    #[test]
    fn test_decode_cleanup() {
        let mut doc = SvgDocument::parse(TEMPLATE).unwrap();
        let root = doc.root();
        clean_svg(&mut doc, root, &["all"]);
        let rect = doc.find_all(root, &["rect"])[0];
        assert_eq!(doc.attr(rect, "id"), Some("bar{{s:Revenue}}"));
    }
}
