//! Guides map a normalized value to an offset along another element
//!
//! Path-like guides (paths, polylines, polygons, lines, circles, ellipses)
//! are followed by arc length. Anything else is linear: its bounding box is
//! crossed from the bottom-left to the top-right corner.

use crate::svg::{bbox, outline, own_transform, BBox, NodeId, Outline, Point, SvgDocument};
use std::collections::HashMap;

const PATH_LIKE: &[&str] = &["path", "polyline", "polygon", "line", "circle", "ellipse"];

#[derive(Clone, Debug, PartialEq)]
pub enum GuideShape {
    Linear(BBox),
    NonLinear(Outline),
}

impl GuideShape {
    pub fn from_element(doc: &SvgDocument, id: NodeId) -> Option<Self> {
        let tag = doc.tag(id)?;
        if PATH_LIKE.contains(&tag) {
            if let Some(line) = outline(doc, id) {
                return Some(GuideShape::NonLinear(line));
            }
        }
        let b = bbox(doc, id)?.transform(&own_transform(doc, id));
        Some(GuideShape::Linear(b))
    }

    pub fn point_at(&self, t: f64) -> Option<Point> {
        match self {
            GuideShape::Linear(b) => Some(Point::new(b.x + b.width * t, b.y + b.height * (1.0 - t))),
            GuideShape::NonLinear(line) => line.point_at(t),
        }
    }
}

/// A guide bound to a named element, resolved on first use
#[derive(Clone, Debug)]
pub struct Guide {
    name: String,
    shape: Option<Option<GuideShape>>,
}

impl Guide {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), shape: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolve(&mut self, doc: &SvgDocument, refs: &HashMap<String, NodeId>) -> Option<&GuideShape> {
        let name = &self.name;
        self.shape
            .get_or_insert_with(|| {
                let shape = refs.get(name).and_then(|&id| GuideShape::from_element(doc, id));
                if shape.is_none() {
                    log::warn!("guide '{}' not found", name);
                }
                shape
            })
            .as_ref()
    }

    pub fn is_linear(&mut self, doc: &SvgDocument, refs: &HashMap<String, NodeId>) -> bool {
        !matches!(self.resolve(doc, refs), Some(GuideShape::NonLinear(_)))
    }

    /// Offset that moves `origin` onto the guide at `t`
    pub fn offset(
        &mut self,
        t: f64,
        origin: Point,
        doc: &SvgDocument,
        refs: &HashMap<String, NodeId>,
    ) -> Option<Point> {
        let p = self.resolve(doc, refs)?.point_at(t)?;
        Some(Point::new(p.x - origin.x, p.y - origin.y))
    }
}
