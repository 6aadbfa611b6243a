//! Fill, stroke and opacity driven by normalized column values

use super::{normalize, ApplyContext};
use crate::data::{js_number_string, Data};
use crate::parse::{elements_with_options, first_key, syntax, Options};
use crate::svg::{Color, NodeId, SvgDocument};

const DEFAULT_TARGET: Color = Color { r: 255, g: 0, b: 0, a: 255 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleKind {
    Fill,
    Line,
    Alpha,
}

impl StyleKind {
    pub const ALL: [StyleKind; 3] = [StyleKind::Fill, StyleKind::Line, StyleKind::Alpha];

    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            StyleKind::Fill => &["fill", "f"],
            StyleKind::Line => &["line", "l"],
            StyleKind::Alpha => &["alpha", "a"],
        }
    }

    pub fn all_keys() -> Vec<&'static str> {
        Self::ALL.iter().flat_map(|k| k.keys().iter().copied()).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleDynamic {
    pub element: NodeId,
    opts: Options,
    base_alpha: f64,
    base_fill: Color,
    base_stroke: Color,
}

/// Colour currently painted for `prop`, from inline style or attribute
fn paint(doc: &SvgDocument, id: NodeId, prop: &str) -> Option<Color> {
    doc.style(id, prop)
        .or_else(|| doc.attr(id, prop).map(String::from))
        .and_then(|value| Color::parse(&value))
}

impl StyleDynamic {
    pub fn new(doc: &mut SvgDocument, element: NodeId) -> Self {
        let opts = doc
            .attr(element, "id")
            .and_then(|id| syntax(id).ok())
            .map(|d| d.opts)
            .unwrap_or_default();

        let mut props: Vec<String> = doc
            .style(element, "transition-property")
            .map(|p| p.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        props.extend(["fill", "stroke", "opacity"].map(String::from));
        doc.set_style(element, "transition-property", &props.join(","));
        doc.set_style(element, "transition-duration", "1s");

        let base_alpha = doc
            .attr(element, "opacity")
            .and_then(|a| a.trim().parse::<f64>().ok())
            .unwrap_or(1.0);

        Self {
            element,
            opts,
            base_alpha,
            base_fill: paint(doc, element, "fill").unwrap_or_else(Color::black),
            base_stroke: paint(doc, element, "stroke").unwrap_or_else(Color::black),
        }
    }

    pub fn get_dynamics(doc: &mut SvgDocument, root: NodeId) -> Vec<StyleDynamic> {
        let elements = elements_with_options(doc, root, &StyleKind::all_keys());
        elements.into_iter().map(|e| StyleDynamic::new(doc, e)).collect()
    }

    pub fn base_alpha(&self) -> f64 {
        self.base_alpha
    }

    fn target(&self, keys: &[&str]) -> Color {
        first_key(&self.opts, keys)
            .and_then(|k| self.opts.get(k))
            .and_then(|v| Color::parse(&v.to_string()))
            .unwrap_or(DEFAULT_TARGET)
    }

    pub fn apply(&mut self, data: &Data, ctx: &mut ApplyContext) {
        for kind in StyleKind::ALL {
            let Some(reference) = first_key(&self.opts, kind.keys())
                .and_then(|k| self.opts.get(k))
                .map(|v| v.to_string())
            else {
                continue;
            };
            let Some(t) = normalize(data, &reference) else {
                continue;
            };
            match kind {
                StyleKind::Fill => {
                    let color = self.base_fill.lerp(&self.target(&["fillColor", "fc"]), t);
                    ctx.doc.set_style(self.element, "fill", &color.to_css());
                }
                StyleKind::Line => {
                    let color = self.base_stroke.lerp(&self.target(&["lineColor", "lc"]), t);
                    ctx.doc.set_style(self.element, "stroke", &color.to_css());
                }
                StyleKind::Alpha => {
                    let opacity = js_number_string(self.base_alpha * t);
                    ctx.doc.set_style(self.element, "opacity", &opacity);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{StatsUpdate, Value};
    use std::collections::HashMap;

    fn data(value: f64) -> Data {
        let mut data = Data::new(
            vec![vec![Some(Value::from(value)), Some(Value::from("x"))]],
            &["Expenses".to_string(), "Label".to_string()],
        );
        data.set_column_stats("Expenses", StatsUpdate::range(0.0, 300.0));
        data
    }

    #[test]
    fn test_discovery_and_transitions() {
        let mut doc = SvgDocument::parse(
            r#"<svg><rect id="a {{f:Expenses}}" style="transition-property: transform"/><rect id="b {{s:Expenses}}"/></svg>"#,
        )
        .unwrap();
        let root = doc.root();
        let dynamics = StyleDynamic::get_dynamics(&mut doc, root);
        assert_eq!(dynamics.len(), 1);
        assert_eq!(
            doc.style(dynamics[0].element, "transition-property").as_deref(),
            Some("transform,fill,stroke,opacity")
        );
        assert_eq!(doc.style(dynamics[0].element, "transition-duration").as_deref(), Some("1s"));
    }

    #[test]
    fn test_fill_line_and_alpha() {
        let mut doc = SvgDocument::parse(
            r##"<svg><rect id="bar {{f:Expenses,fc:#0000ff,l:Expenses,a:Expenses}}" fill="#ffffff" opacity="0.8"/></svg>"##,
        )
        .unwrap();
        let root = doc.root();
        let mut dynamics = StyleDynamic::get_dynamics(&mut doc, root);
        assert_eq!(dynamics[0].base_alpha(), 0.8);

        let refs = HashMap::new();
        let mut ctx = ApplyContext { doc: &mut doc, refs: &refs };
        dynamics[0].apply(&data(300.0), &mut ctx);
        let el = dynamics[0].element;
        assert_eq!(doc.style(el, "fill").as_deref(), Some("#0000ff"));
        assert_eq!(doc.style(el, "stroke").as_deref(), Some("#ff0000"));
        assert_eq!(doc.style(el, "opacity").as_deref(), Some("0.8"));

        let mut ctx = ApplyContext { doc: &mut doc, refs: &refs };
        dynamics[0].apply(&data(0.0), &mut ctx);
        assert_eq!(doc.style(el, "fill").as_deref(), Some("#ffffff"));
        assert_eq!(doc.style(el, "stroke").as_deref(), Some("#000000"));
        assert_eq!(doc.style(el, "opacity").as_deref(), Some("0"));
    }

    #[test]
    fn test_unresolved_column_leaves_element_alone() {
        let mut doc = SvgDocument::parse(r#"<svg><rect id="{{f:Nope,a:Label}}"/></svg>"#).unwrap();
        let root = doc.root();
        let mut dynamics = StyleDynamic::get_dynamics(&mut doc, root);
        let refs = HashMap::new();
        let mut ctx = ApplyContext { doc: &mut doc, refs: &refs };
        dynamics[0].apply(&data(150.0), &mut ctx);
        assert_eq!(doc.style(dynamics[0].element, "fill"), None);
        assert_eq!(doc.style(dynamics[0].element, "opacity"), None);
    }
}
