//! Geometric transforms driven by normalized column values
//!
//! The element is wrapped twice: an inner group takes over its class, style
//! and clip path, and an outer `__guide__` group carries the eased offset for
//! path guides. CSS transitions animate everything written to the element's
//! own `transform` style.

use super::easer::Easer;
use super::guide::Guide;
use super::{normalize, ApplyContext};
use crate::data::{js_number_string, Data};
use crate::parse::{elements_with_options, range, syntax, Options};
use crate::svg::{bbox, parse_transform_list, BBox, NodeId, Point, SvgDocument};

pub const GUIDE_CLASS: &str = "__guide__";

const TRANSFORMABLE: &[&str] = &[
    "g", "rect", "circle", "ellipse", "line", "polyline", "polygon", "path", "text", "image", "use",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformKind {
    Scale,
    ScaleX,
    ScaleY,
    Rotate,
    Position,
    PositionX,
    PositionY,
}

impl TransformKind {
    pub const ALL: [TransformKind; 7] = [
        TransformKind::Scale,
        TransformKind::ScaleX,
        TransformKind::ScaleY,
        TransformKind::Rotate,
        TransformKind::Position,
        TransformKind::PositionX,
        TransformKind::PositionY,
    ];

    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            TransformKind::Scale => &["scale", "s"],
            TransformKind::ScaleX => &["scaleX", "sx"],
            TransformKind::ScaleY => &["scaleY", "sy"],
            TransformKind::Rotate => &["rotate", "r"],
            TransformKind::Position => &["position", "p"],
            TransformKind::PositionX => &["positionX", "px"],
            TransformKind::PositionY => &["positionY", "py"],
        }
    }

    pub fn all_keys() -> Vec<&'static str> {
        Self::ALL.iter().flat_map(|k| k.keys().iter().copied()).collect()
    }

    pub fn is_position(&self) -> bool {
        matches!(
            self,
            TransformKind::Position | TransformKind::PositionX | TransformKind::PositionY
        )
    }

    /// CSS fragment for a normalized value `t` without a guide
    pub fn fragment(&self, t: f64, opts: &Options) -> String {
        let n = js_number_string;
        match self {
            TransformKind::Scale => format!("scale({},{})", n(t), n(t)),
            TransformKind::ScaleX => format!("scaleX({})", n(t)),
            TransformKind::ScaleY => format!("scaleY({})", n(t)),
            TransformKind::Rotate => {
                let ratio = crate::parse::first_key(opts, &["rotateRatio", "rr", "rotateLimit", "rl"])
                    .and_then(|k| opts.get(k))
                    .map(|v| v.to_number())
                    .filter(|r| r.is_finite())
                    .unwrap_or(1.0);
                format!("rotate({}deg)", n(t * 360.0 * ratio))
            }
            TransformKind::Position => format!("translate({}px,{}px)", n(t), n(t)),
            TransformKind::PositionX => format!("translateX({}px)", n(t)),
            TransformKind::PositionY => format!("translateY({}px)", n(t)),
        }
    }

    /// CSS fragment moving by a guide offset
    pub fn offset_fragment(&self, offset: Point) -> String {
        let n = js_number_string;
        match self {
            TransformKind::PositionX => format!("translateX({}px)", n(offset.x)),
            TransformKind::PositionY => format!("translateY({}px)", n(offset.y)),
            _ => format!("translate({}px,{}px)", n(offset.x), n(offset.y)),
        }
    }
}

fn translate(p: Point) -> String {
    format!("translate({}px,{}px)", js_number_string(p.x), js_number_string(p.y))
}

#[derive(Clone, Debug)]
pub struct TransformDynamic {
    pub element: NodeId,
    /// Inner wrapper holding the element's class, style and clip path
    pub base: NodeId,
    /// Outer wrapper receiving eased guide offsets
    pub carrier: NodeId,
    opts: Options,
    bbox: BBox,
    origin: Point,
    base_transforms: Vec<String>,
    guide: Option<Guide>,
    easer: Easer,
    eased_kind: Option<TransformKind>,
}

impl TransformDynamic {
    pub fn new(doc: &mut SvgDocument, element: NodeId) -> Self {
        let opts = doc
            .attr(element, "id")
            .and_then(|id| syntax(id).ok())
            .map(|d| d.opts)
            .unwrap_or_default();
        let bbox = bbox(doc, element).unwrap_or_default();
        let origin = origin(&opts, &bbox);
        let base_transforms = doc
            .attr(element, "transform")
            .map(|t| parse_transform_list(t).iter().map(|m| m.to_css()).collect())
            .unwrap_or_default();
        let guide = crate::parse::first_key(&opts, &["guide", "g"])
            .and_then(|k| opts.get(k))
            .map(|name| Guide::new(name.to_string()));

        let (base, carrier) = wrap_with_groups(doc, element);

        doc.set_attr(element, "vector-effect", "non-scaling-stroke");
        doc.set_style(element, "transition-property", "transform");
        doc.set_style(element, "transition-duration", "1s");
        doc.set_style(
            element,
            "transform-origin",
            &format!("{}px {}px", js_number_string(origin.x), js_number_string(origin.y)),
        );

        Self {
            element,
            base,
            carrier,
            opts,
            bbox,
            origin,
            base_transforms,
            guide,
            easer: Easer::new(),
            eased_kind: None,
        }
    }

    pub fn get_dynamics(doc: &mut SvgDocument, root: NodeId) -> Vec<TransformDynamic> {
        let keys = TransformKind::all_keys();
        let elements: Vec<NodeId> = elements_with_options(doc, root, &keys)
            .into_iter()
            .filter(|&e| doc.tag(e).map(|t| TRANSFORMABLE.contains(&t)).unwrap_or(false))
            .collect();
        elements.into_iter().map(|e| TransformDynamic::new(doc, e)).collect()
    }

    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn easer(&self) -> &Easer {
        &self.easer
    }

    /// Position kind currently following a path guide
    pub fn eased_kind(&self) -> Option<TransformKind> {
        self.eased_kind
    }

    fn column_for(&self, kind: TransformKind) -> Option<String> {
        crate::parse::first_key(&self.opts, kind.keys())
            .and_then(|k| self.opts.get(k))
            .map(|v| v.to_string())
    }

    pub fn apply(&mut self, data: &Data, ctx: &mut ApplyContext) {
        let mut fragments = Vec::new();
        if !self.base_transforms.is_empty() {
            fragments.push(translate(Point::new(-self.origin.x, -self.origin.y)));
            fragments.extend(self.base_transforms.iter().cloned());
            fragments.push(translate(self.origin));
        }

        // A path guide yields one point, so one position kind can follow it
        let mut eased: Option<TransformKind> = None;
        for kind in TransformKind::ALL {
            let Some(reference) = self.column_for(kind) else {
                continue;
            };
            let Some(t) = normalize(data, &reference) else {
                log::debug!("no normalized value for '{}'", reference);
                continue;
            };
            if kind.is_position() {
                if let Some(guide) = self.guide.as_mut() {
                    if !guide.is_linear(ctx.doc, ctx.refs) {
                        match eased {
                            Some(first) => log::warn!(
                                "{:?} ignored: guide '{}' already followed by {:?}",
                                kind,
                                guide.name(),
                                first
                            ),
                            None => {
                                self.easer.ease(self.easer.cur_t(), t);
                                self.eased_kind = Some(kind);
                                eased = Some(kind);
                            }
                        }
                        continue;
                    }
                    if let Some(offset) = guide.offset(t, self.origin, ctx.doc, ctx.refs) {
                        fragments.push(kind.offset_fragment(offset));
                        continue;
                    }
                }
            }
            fragments.push(kind.fragment(t, &self.opts));
        }

        if fragments.is_empty() {
            ctx.doc.remove_style(self.element, "transform");
        } else {
            ctx.doc.set_style(self.element, "transform", &fragments.join(" "));
        }
    }

    /// Advance a running guide animation; `true` while more frames are needed
    pub fn tick(&mut self, now: f64, ctx: &mut ApplyContext) -> bool {
        let (Some(kind), Some(guide)) = (self.eased_kind, self.guide.as_mut()) else {
            return false;
        };
        let origin = self.origin;
        let carrier = self.carrier;
        let refs = ctx.refs;
        let doc = &mut *ctx.doc;
        self.easer.tick(now, |t| {
            if let Some(offset) = guide.offset(t, origin, doc, refs) {
                doc.set_style(carrier, "transform", &kind.offset_fragment(offset));
            }
        })
    }
}

/// Pivot as a fraction of the bounding box, `o:0.5` or `o:0_1` style
fn origin(opts: &Options, bbox: &BBox) -> Point {
    let (h, v) = crate::parse::first_key(opts, &["origin", "o"])
        .and_then(|k| opts.get(k))
        .map(|value| range(&value.to_string()).endpoints())
        .unwrap_or((0.0, 0.0));
    let h = if h.is_finite() { h } else { 0.0 };
    let v = if v.is_finite() { v } else { 0.0 };
    Point::new(bbox.x + bbox.width * h, bbox.y + bbox.height * v)
}

fn wrap_with_groups(doc: &mut SvgDocument, element: NodeId) -> (NodeId, NodeId) {
    let base = doc.wrap(element, "g");
    for attr in ["class", "style", "clip-path"] {
        if let Some(value) = doc.remove_attr(element, attr) {
            doc.set_attr(base, attr, &value);
        }
    }
    let carrier = doc.wrap(base, "g");
    doc.set_attr(carrier, "class", GUIDE_CLASS);
    (base, carrier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{StatsUpdate, Value};
    use crate::parse::elements_by_name;
    use std::collections::HashMap;

    const TEMPLATE: &str = r#"<svg>
<path id="track" d="M0 0 H100"/>
<rect id="box" x="0" y="0" width="100" height="100"/>
<rect id="bar {{s:Revenue,o:0.5}}" class="fat" style="fill: red;" clip-path="url(#c)" x="0" y="0" width="10" height="20" transform="translate(5 5)"/>
<circle id="knob {{r:Revenue,rr:0.5}}" r="4"/>
<circle id="dot {{p:Revenue,g:track}}" r="2"/>
<circle id="chip {{px:Revenue,g:box}}" cx="10" cy="10" r="2"/>
<circle id="loose {{py:Revenue}}" r="2"/>
<ellipse id="odd {{s:Missing}}" rx="2" ry="2"/>
<tspan id="skip {{s:Revenue}}"/>
</svg>"#;

    fn data(value: f64) -> Data {
        let mut data = Data::new(vec![vec![Some(Value::from(value))]], &["Revenue".to_string()]);
        data.set_column_stats("Revenue", StatsUpdate::range(0.0, 300.0));
        data
    }

    fn setup() -> (SvgDocument, HashMap<String, NodeId>, Vec<TransformDynamic>) {
        let mut doc = SvgDocument::parse(TEMPLATE).unwrap();
        let refs = elements_by_name(&doc, doc.root());
        let root = doc.root();
        let dynamics = TransformDynamic::get_dynamics(&mut doc, root);
        (doc, refs, dynamics)
    }

    fn apply_all(doc: &mut SvgDocument, refs: &HashMap<String, NodeId>, dynamics: &mut [TransformDynamic], value: f64) {
        let data = data(value);
        let mut ctx = ApplyContext { doc, refs };
        for d in dynamics.iter_mut() {
            d.apply(&data, &mut ctx);
        }
    }

    #[test]
    fn test_eligibility_and_wrapping() {
        let (doc, _, dynamics) = setup();
        assert_eq!(dynamics.len(), 6);
        let bar = &dynamics[0];
        assert_eq!(doc.parent(bar.element), Some(bar.base));
        assert_eq!(doc.parent(bar.base), Some(bar.carrier));
        assert_eq!(doc.attr(bar.carrier, "class"), Some(GUIDE_CLASS));
        assert_eq!(doc.attr(bar.base, "class"), Some("fat"));
        assert_eq!(doc.attr(bar.base, "clip-path"), Some("url(#c)"));
        assert_eq!(doc.style(bar.base, "fill").as_deref(), Some("red"));
        assert!(!doc.has_attr(bar.element, "class"));
        assert_eq!(doc.attr(bar.element, "vector-effect"), Some("non-scaling-stroke"));
        assert_eq!(doc.style(bar.element, "transform-origin").as_deref(), Some("5px 10px"));
        assert_eq!(doc.style(bar.element, "transition-property").as_deref(), Some("transform"));
    }

    #[test]
    fn test_scale_with_base_transform() {
        let (mut doc, refs, mut dynamics) = setup();
        apply_all(&mut doc, &refs, &mut dynamics, 150.0);
        assert_eq!(
            doc.style(dynamics[0].element, "transform").as_deref(),
            Some("translate(-5px,-10px) matrix(1,0,0,1,5,5) translate(5px,10px) scale(0.5,0.5)")
        );
    }

    #[test]
    fn test_rotate_ratio_and_plain_position() {
        let (mut doc, refs, mut dynamics) = setup();
        apply_all(&mut doc, &refs, &mut dynamics, 300.0);
        assert_eq!(doc.style(dynamics[1].element, "transform").as_deref(), Some("rotate(180deg)"));
        assert_eq!(doc.style(dynamics[4].element, "transform").as_deref(), Some("translateY(1px)"));
        assert_eq!(doc.style(dynamics[5].element, "transform"), None);
    }

    #[test]
    fn test_linear_guide_applies_inline() {
        let (mut doc, refs, mut dynamics) = setup();
        apply_all(&mut doc, &refs, &mut dynamics, 150.0);
        // Box midpoint (50, 50) minus the circle's top-left origin (8, 8)
        assert_eq!(doc.style(dynamics[3].element, "transform").as_deref(), Some("translateX(42px)"));
    }

    #[test]
    fn test_path_guide_eases_carrier() {
        let (mut doc, refs, mut dynamics) = setup();
        apply_all(&mut doc, &refs, &mut dynamics, 300.0);
        let dot = &mut dynamics[2];
        assert_eq!(doc.style(dot.element, "transform"), None);
        assert!(dot.easer().is_active());

        let mut ctx = ApplyContext { doc: &mut doc, refs: &refs };
        assert!(dot.tick(0.0, &mut ctx));
        assert!(dot.tick(500.0, &mut ctx));
        assert!(!dot.tick(1000.0, &mut ctx));
        // Track end (100, 0) minus the circle's top-left origin (-2, -2)
        assert_eq!(doc.style(dot.carrier, "transform").as_deref(), Some("translate(102px,2px)"));
        assert_eq!(dot.easer().cur_t(), 1.0);
    }

    #[test]
    fn test_path_guide_follows_one_position_kind() {
        let mut doc = SvgDocument::parse(
            r#"<svg><path id="track" d="M0 0 H100"/><circle id="pin {{py:Revenue,px:Revenue,g:track}}" r="2"/></svg>"#,
        )
        .unwrap();
        let refs = elements_by_name(&doc, doc.root());
        let root = doc.root();
        let mut dynamics = TransformDynamic::get_dynamics(&mut doc, root);
        apply_all(&mut doc, &refs, &mut dynamics, 150.0);
        let pin = &mut dynamics[0];
        assert_eq!(pin.eased_kind(), Some(TransformKind::PositionX));
        assert_eq!(pin.easer().end_t(), 0.5);
        assert_eq!(doc.style(pin.element, "transform"), None);

        let mut ctx = ApplyContext { doc: &mut doc, refs: &refs };
        assert!(pin.tick(0.0, &mut ctx));
        assert!(!pin.tick(1000.0, &mut ctx));
        assert_eq!(doc.style(pin.carrier, "transform").as_deref(), Some("translateX(52px)"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let (mut doc, refs, mut dynamics) = setup();
        apply_all(&mut doc, &refs, &mut dynamics, 150.0);
        let first = doc.to_markup().unwrap();
        apply_all(&mut doc, &refs, &mut dynamics, 150.0);
        assert_eq!(doc.to_markup().unwrap(), first);
    }
}
