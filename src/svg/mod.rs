//! Headless SVG surface
//!
//! A mutable element tree standing in for the browser DOM, plus the geometry
//! the dynamics need from it (bounding boxes, transforms, path outlines).

pub mod clean;
pub mod color;
pub mod document;
pub mod geometry;
pub mod path;
pub mod shape;

pub use clean::clean_svg;
pub use color::Color;
pub use document::{parse_style, serialize_style, NodeId, NodeKind, SvgDocument};
pub use geometry::{parse_transform, parse_transform_list, BBox, Matrix, Point};
pub use path::{parse_path, Outline};
pub use shape::{bbox, outline, own_transform, parse_length};
