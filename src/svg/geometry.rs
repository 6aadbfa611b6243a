//! Points, boxes and 2D affine transforms

use crate::data::value::js_number_string;
use kurbo::{Affine, Rect};
use svgtypes::{TransformListParser, TransformListToken};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<BBox> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in iter {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(BBox::new(x0, y0, x1 - x0, y1 - y0))
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox::from_points(self.corners().into_iter().chain(other.corners())).unwrap_or(*self)
    }

    /// Box around the transformed corners
    pub fn transform(&self, m: &Matrix) -> BBox {
        BBox::from_points(self.corners().iter().map(|p| m.apply(p))).unwrap_or(*self)
    }
}

/// Affine matrix `[a c e; b d f; 0 0 1]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self { e: tx, f: ty, ..Self::identity() }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self { a: sx, d: sy, ..Self::identity() }
    }

    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    pub fn skew_x(degrees: f64) -> Self {
        Self { c: degrees.to_radians().tan(), ..Self::identity() }
    }

    pub fn skew_y(degrees: f64) -> Self {
        Self { b: degrees.to_radians().tan(), ..Self::identity() }
    }

    pub fn apply(&self, p: &Point) -> Point {
        Point::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// CSS `matrix(a,b,c,d,e,f)` function
    pub fn to_css(&self) -> String {
        let parts = [self.a, self.b, self.c, self.d, self.e, self.f].map(js_number_string);
        format!("matrix({})", parts.join(","))
    }
}

impl From<svgtypes::Transform> for Matrix {
    fn from(ts: svgtypes::Transform) -> Self {
        Self { a: ts.a, b: ts.b, c: ts.c, d: ts.d, e: ts.e, f: ts.f }
    }
}

impl From<Matrix> for Affine {
    fn from(m: Matrix) -> Self {
        Affine::new([m.a, m.b, m.c, m.d, m.e, m.f])
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Point::new(p.x, p.y)
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        kurbo::Point::new(p.x, p.y)
    }
}

impl From<Rect> for BBox {
    fn from(r: Rect) -> Self {
        BBox::new(r.x0, r.y0, r.width(), r.height())
    }
}

/// One matrix per item of an SVG `transform` attribute, in list order.
/// A centred `rotate(a cx cy)` yields its translate/rotate/translate triple.
pub fn parse_transform_list(text: &str) -> Vec<Matrix> {
    let mut list = Vec::new();
    for token in TransformListParser::from(text) {
        let matrix = match token {
            Ok(TransformListToken::Matrix { a, b, c, d, e, f }) => Matrix { a, b, c, d, e, f },
            Ok(TransformListToken::Translate { tx, ty }) => Matrix::translate(tx, ty),
            Ok(TransformListToken::Scale { sx, sy }) => Matrix::scale(sx, sy),
            Ok(TransformListToken::Rotate { angle }) => Matrix::rotate(angle),
            Ok(TransformListToken::SkewX { angle }) => Matrix::skew_x(angle),
            Ok(TransformListToken::SkewY { angle }) => Matrix::skew_y(angle),
            Err(e) => {
                log::warn!("transform '{}': {}", text, e);
                break;
            }
        };
        list.push(matrix);
    }
    list
}

/// The whole `transform` attribute as one matrix; unparsable lists are identity
pub fn parse_transform(text: &str) -> Matrix {
    text.parse::<svgtypes::Transform>().map(Matrix::from).unwrap_or_default()
}
