//! Geometry estimates for elements
//!
//! There is no layout engine behind the tree, so `bbox` mirrors `getBBox()`
//! from attributes alone: exact for basic shapes and paths, approximate for
//! text (average glyph advance of 0.6em).

use super::document::{NodeId, SvgDocument};
use super::geometry::{parse_transform, BBox, Matrix, Point};
use super::path::{parse_path, Outline};
use kurbo::Ellipse;
use svgtypes::{Length, PointsParser};

const DEFAULT_FONT_SIZE: f64 = 16.0;
const GLYPH_ADVANCE: f64 = 0.6;
const ASCENT: f64 = 0.8;

/// Number part of a length attribute ("12", "12px", "1e2"); units are ignored
pub fn parse_length(value: &str) -> Option<f64> {
    value.trim().parse::<Length>().ok().map(|len| len.number)
}

fn num(doc: &SvgDocument, id: NodeId, name: &str) -> f64 {
    doc.attr(id, name).and_then(parse_length).unwrap_or(0.0)
}

/// First coordinate of a possibly multi-valued text position attribute
fn first_num(doc: &SvgDocument, id: NodeId, name: &str) -> Option<f64> {
    doc.attr(id, name)?.split([' ', ',']).find(|s| !s.is_empty()).and_then(parse_length)
}

fn parse_points(text: &str) -> Vec<Point> {
    PointsParser::from(text).map(|(x, y)| Point::new(x, y)).collect()
}

/// The element's own `transform` attribute as one matrix
pub fn own_transform(doc: &SvgDocument, id: NodeId) -> Matrix {
    doc.attr(id, "transform").map(parse_transform).unwrap_or_default()
}

fn font_size(doc: &SvgDocument, id: NodeId) -> f64 {
    let mut node = Some(id);
    while let Some(n) = node {
        let size = doc
            .style(n, "font-size")
            .as_deref()
            .and_then(parse_length)
            .or_else(|| doc.attr(n, "font-size").and_then(parse_length));
        if let Some(size) = size {
            return size;
        }
        node = doc.parent(n);
    }
    DEFAULT_FONT_SIZE
}

fn text_bbox(doc: &SvgDocument, id: NodeId) -> Option<BBox> {
    let text = doc.text_content(id);
    let size = font_size(doc, id);
    let width = text.trim().chars().count() as f64 * size * GLYPH_ADVANCE;

    let mut x = first_num(doc, id, "x");
    let mut y = first_num(doc, id, "y");
    if let Some(parent) = doc.parent(id).filter(|&p| doc.tag(p) == Some("text")) {
        x = x.or_else(|| first_num(doc, parent, "x"));
        y = y.or_else(|| first_num(doc, parent, "y"));
    }
    let (x, y) = (x.unwrap_or(0.0), y.unwrap_or(0.0));

    let anchor = doc
        .attr(id, "text-anchor")
        .map(String::from)
        .or_else(|| doc.style(id, "text-anchor"));
    let left = match anchor.as_deref() {
        Some("middle") => x - width / 2.0,
        Some("end") => x - width,
        _ => x,
    };
    Some(BBox::new(left, y - size * ASCENT, width, size))
}

/// Estimated bounding box in the element's own user space
pub fn bbox(doc: &SvgDocument, id: NodeId) -> Option<BBox> {
    match doc.tag(id)? {
        "rect" | "image" | "use" | "foreignObject" => Some(BBox::new(
            num(doc, id, "x"),
            num(doc, id, "y"),
            num(doc, id, "width"),
            num(doc, id, "height"),
        )),
        "circle" => {
            let r = num(doc, id, "r");
            Some(BBox::new(num(doc, id, "cx") - r, num(doc, id, "cy") - r, 2.0 * r, 2.0 * r))
        }
        "ellipse" => {
            let (rx, ry) = (num(doc, id, "rx"), num(doc, id, "ry"));
            Some(BBox::new(num(doc, id, "cx") - rx, num(doc, id, "cy") - ry, 2.0 * rx, 2.0 * ry))
        }
        "line" => BBox::from_points([
            Point::new(num(doc, id, "x1"), num(doc, id, "y1")),
            Point::new(num(doc, id, "x2"), num(doc, id, "y2")),
        ]),
        "polyline" | "polygon" => BBox::from_points(parse_points(doc.attr(id, "points")?)),
        "path" => Outline::new(parse_path(doc.attr(id, "d")?)).bbox(),
        "text" | "tspan" => text_bbox(doc, id),
        _ => doc
            .element_children(id)
            .into_iter()
            .filter_map(|child| Some(bbox(doc, child)?.transform(&own_transform(doc, child))))
            .reduce(|a, b| a.union(&b)),
    }
}

/// Ellipse starting at its rightmost point, like `getPointAtLength(0)`
fn ellipse_outline(cx: f64, cy: f64, rx: f64, ry: f64) -> Option<Outline> {
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }
    Some(Outline::from_shape(&Ellipse::new((cx, cy), (rx, ry), 0.0)))
}

/// Outline of a path-like element with its own transform applied
pub fn outline(doc: &SvgDocument, id: NodeId) -> Option<Outline> {
    let line = match doc.tag(id)? {
        "path" => Outline::new(parse_path(doc.attr(id, "d")?)),
        "polyline" => Outline::from_points(&parse_points(doc.attr(id, "points")?), false),
        "polygon" => Outline::from_points(&parse_points(doc.attr(id, "points")?), true),
        "line" => Outline::from_points(
            &[
                Point::new(num(doc, id, "x1"), num(doc, id, "y1")),
                Point::new(num(doc, id, "x2"), num(doc, id, "y2")),
            ],
            false,
        ),
        "circle" => {
            let r = num(doc, id, "r");
            ellipse_outline(num(doc, id, "cx"), num(doc, id, "cy"), r, r)?
        }
        "ellipse" => ellipse_outline(
            num(doc, id, "cx"),
            num(doc, id, "cy"),
            num(doc, id, "rx"),
            num(doc, id, "ry"),
        )?,
        _ => return None,
    };
    if line.is_empty() {
        return None;
    }
    let m = own_transform(doc, id);
    Some(if m.is_identity() { line } else { line.transform(&m) })
}
