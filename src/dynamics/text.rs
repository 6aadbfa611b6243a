//! Text substitution
//!
//! Every `{{...}}` tag in a text element's original content is replaced with
//! a column value on each update. The content seen at load time is kept as
//! the template so updates never compound.

use super::ApplyContext;
use crate::data::{Data, FORMAT_FAIL_OUTPUT};
use crate::parse::{column_from_data, has_directive, replace_directives, syntax, Directive};
use crate::svg::{bbox, NodeId, SvgDocument};

#[derive(Clone, Debug, PartialEq)]
pub struct TextDynamic {
    pub element: NodeId,
    template: String,
}

impl TextDynamic {
    pub fn new(doc: &mut SvgDocument, element: NodeId) -> Self {
        let template = doc.text_content(element);
        align(doc, element);
        Self { element, template }
    }

    /// `text` elements holding a tag, or their child elements when they have any
    pub fn get_dynamics(doc: &mut SvgDocument, root: NodeId) -> Vec<TextDynamic> {
        let mut elements = Vec::new();
        for text in doc.find_all(root, &["text"]) {
            let children = doc.element_children(text);
            if children.is_empty() {
                elements.push(text);
            } else {
                elements.extend(children);
            }
        }
        elements.retain(|&e| has_directive(&doc.text_content(e)));
        elements.into_iter().map(|e| TextDynamic::new(doc, e)).collect()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn apply(&mut self, data: &Data, ctx: &mut ApplyContext) {
        let text = render(&self.template, data);
        ctx.doc.set_text_content(self.element, &text);
    }
}

/// Substitute every tag in `template` from the first data row
pub fn render(template: &str, data: &Data) -> String {
    replace_directives(template, |tag| match syntax(tag) {
        Ok(directive) => resolve(&directive, data),
        Err(e) => {
            log::warn!("unreadable text tag: {}", e);
            FORMAT_FAIL_OUTPUT.to_string()
        }
    })
}

fn resolve(directive: &Directive, data: &Data) -> String {
    let Some(column) = column_from_data(&directive.name, data) else {
        return FORMAT_FAIL_OUTPUT.to_string();
    };
    if directive.flag(&["name", "n"]) {
        column.name.clone()
    } else {
        data.get_formatted(0, &column.name, directive.flag(&["compact", "c"]))
    }
}

fn anchor_for(align: &str) -> Option<&'static str> {
    match align {
        "start" | "left" | "l" => Some("start"),
        "middle" | "center" | "c" | "m" => Some("middle"),
        "end" | "right" | "r" => Some("end"),
        _ => None,
    }
}

/// Alignment requested by the element's own id or its parent's
fn requested_anchor(doc: &SvgDocument, element: NodeId) -> Option<&'static str> {
    std::iter::once(Some(element))
        .chain(std::iter::once(doc.parent(element)))
        .flatten()
        .filter_map(|node| doc.attr(node, "id"))
        .filter(|id| has_directive(id))
        .filter_map(|id| syntax(id).ok())
        .find_map(|d| d.opt(&["align", "a"]).and_then(|v| anchor_for(&v.to_string())))
}

/// Move the anchor point so the text grows from the requested edge
fn align(doc: &mut SvgDocument, element: NodeId) {
    let Some(anchor) = requested_anchor(doc, element) else {
        return;
    };
    let Some(b) = bbox(doc, element) else {
        return;
    };
    let x = match anchor {
        "middle" => b.x + b.width / 2.0,
        "end" => b.x + b.width,
        _ => b.x,
    };
    doc.set_attr(element, "x", &crate::data::js_number_string(x));
    doc.set_attr(element, "text-anchor", anchor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Formatter, Value};
    use std::collections::HashMap;

    fn data() -> Data {
        let mut data = Data::new(
            vec![vec![Some(Value::from("Technology")), Some(Value::from(180435.0))]],
            &["Department".to_string(), "Revenue".to_string()],
        );
        data.set_column_format("Revenue", Formatter::Text, true);
        data
    }

    #[test]
    fn test_render_by_name_and_position() {
        let data = data();
        assert_eq!(render("{{Department}}: {{#0}}", &data), "Technology: 180435");
        assert_eq!(render("{{@0|n}}", &data), "Department");
        assert_eq!(render("{{Missing}}", &data), "???");
        assert_eq!(render("{{Revenue|x:a:b}}", &data), "???");
    }

    #[test]
    fn test_compact_flag_uses_compact_formatter() {
        let data = data();
        // Text formatter on a number renders the failure marker
        assert_eq!(render("{{Revenue|c}}", &data), "???");
        assert_eq!(render("{{Revenue|c:false}}", &data), "180435");
    }

    #[test]
    fn test_get_dynamics_and_apply() {
        let mut doc = SvgDocument::parse(
            r#"<svg><text>{{Department}}</text><text><tspan>Total</tspan><tspan>{{Revenue}}</tspan></text><text>plain</text></svg>"#,
        )
        .unwrap();
        let root = doc.root();
        let mut dynamics = TextDynamic::get_dynamics(&mut doc, root);
        assert_eq!(dynamics.len(), 2);
        assert_eq!(doc.tag(dynamics[1].element), Some("tspan"));

        let refs = HashMap::new();
        let data = data();
        for _ in 0..2 {
            let mut ctx = ApplyContext { doc: &mut doc, refs: &refs };
            for d in dynamics.iter_mut() {
                d.apply(&data, &mut ctx);
            }
        }
        assert_eq!(doc.text_content(dynamics[0].element), "Technology");
        assert_eq!(doc.text_content(dynamics[1].element), "180435");
        assert_eq!(dynamics[1].template(), "{{Revenue}}");
    }

    #[test]
    fn test_alignment_from_parent() {
        let mut doc = SvgDocument::parse(
            r#"<svg><text id="label {{a:middle}}" x="100" y="50" font-size="10"><tspan>{{Department}}</tspan></text></svg>"#,
        )
        .unwrap();
        let root = doc.root();
        let dynamics = TextDynamic::get_dynamics(&mut doc, root);
        let tspan = dynamics[0].element;
        // 14 glyphs at 6px starting from the parent's x
        assert_eq!(doc.attr(tspan, "x"), Some("142"));
        assert_eq!(doc.attr(tspan, "text-anchor"), Some("middle"));
    }
}
