//! Outlines walked by arc length
//!
//! Path data is read with `svgtypes` (arcs and shorthand curves come out as
//! absolute cubics and quadratics) into a `kurbo::BezPath`. Positions along
//! the outline follow `getPointAtLength`: movetos start a new run without
//! adding length.

use super::geometry::{BBox, Matrix, Point};
use kurbo::{Affine, BezPath, ParamCurve, ParamCurveArclen, PathSeg, Shape};
use svgtypes::{SimplePathSegment, SimplifyingPathParser};

/// Arc length accuracy, in user units
const ACCURACY: f64 = 1e-4;

/// Parse path data; parsing stops at the first error
pub fn parse_path(d: &str) -> BezPath {
    let mut path = BezPath::new();
    for segment in SimplifyingPathParser::from(d) {
        let segment = match segment {
            Ok(segment) => segment,
            Err(e) => {
                log::debug!("path data '{}': {}", d, e);
                break;
            }
        };
        match segment {
            SimplePathSegment::MoveTo { x, y } => path.move_to((x, y)),
            SimplePathSegment::LineTo { x, y } => path.line_to((x, y)),
            SimplePathSegment::Quadratic { x1, y1, x, y } => path.quad_to((x1, y1), (x, y)),
            SimplePathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                path.curve_to((x1, y1), (x2, y2), (x, y))
            }
            SimplePathSegment::ClosePath => path.close_path(),
        }
    }
    path
}

/// A path with cumulative segment lengths
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    path: BezPath,
    lengths: Vec<f64>,
}

impl Outline {
    pub fn new(path: BezPath) -> Self {
        let mut total = 0.0;
        let lengths = path
            .segments()
            .map(|seg| {
                total += seg.arclen(ACCURACY);
                total
            })
            .collect();
        Self { path, lengths }
    }

    /// Connected run through `points`
    pub fn from_points(points: &[Point], closed: bool) -> Self {
        let mut path = BezPath::new();
        for (i, &p) in points.iter().enumerate() {
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        if closed && points.len() > 2 {
            path.close_path();
        }
        Self::new(path)
    }

    pub fn from_shape(shape: &impl Shape) -> Self {
        Self::new(shape.to_path(ACCURACY))
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn total_length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    pub fn start(&self) -> Option<Point> {
        self.path.segments().next().map(|seg| seg.start().into())
    }

    /// Point at fraction `t` of the total length (clamped to 0..1)
    pub fn point_at(&self, t: f64) -> Option<Point> {
        let first = self.path.segments().next()?;
        let total = self.total_length();
        if total <= 0.0 || !t.is_finite() {
            return Some(first.start().into());
        }
        let target = t.clamp(0.0, 1.0) * total;
        let index = self.lengths.partition_point(|&len| len < target).min(self.lengths.len() - 1);
        let seg = self.path.segments().nth(index)?;
        let before = if index == 0 { 0.0 } else { self.lengths[index - 1] };
        let local = match seg {
            PathSeg::Line(line) => {
                let len = line.arclen(ACCURACY);
                if len > 0.0 {
                    (target - before) / len
                } else {
                    0.0
                }
            }
            _ => seg.inv_arclen(target - before, ACCURACY),
        };
        Some(seg.eval(local).into())
    }

    pub fn bbox(&self) -> Option<BBox> {
        if self.path.elements().is_empty() {
            return None;
        }
        Some(self.path.bounding_box().into())
    }

    pub fn transform(&self, m: &Matrix) -> Outline {
        let mut path = self.path.clone();
        path.apply_affine(Affine::from(*m));
        Outline::new(path)
    }
}
