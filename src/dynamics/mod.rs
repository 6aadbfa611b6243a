//! Dynamics bind directive-tagged template elements to data
//!
//! Each dynamic owns one element plus whatever it precomputed at load time.
//! The registry builds them once per template; every data update then runs
//! `apply` on each in registration order.

pub mod easer;
pub mod guide;
pub mod style;
pub mod text;
pub mod transform;

pub use easer::{ease_in_out_cubic, Easer, EASE_DURATION_MS};
pub use guide::{Guide, GuideShape};
pub use style::{StyleDynamic, StyleKind};
pub use text::TextDynamic;
pub use transform::{TransformDynamic, TransformKind, GUIDE_CLASS};

use crate::data::Data;
use crate::parse::column_from_data;
use crate::svg::{NodeId, SvgDocument};
use std::collections::HashMap;

/// The surface a dynamic writes to, plus the name lookup guides resolve against
pub struct ApplyContext<'a> {
    pub doc: &'a mut SvgDocument,
    pub refs: &'a HashMap<String, NodeId>,
}

/// Position of the first row's value for `reference` between its column's min and max
///
/// `None` when the column, its stats or a finite value is missing. A column
/// whose min equals its max normalizes to 0.
pub fn normalize(data: &Data, reference: &str) -> Option<f64> {
    let column = column_from_data(reference, data)?;
    let stats = column.stats?;
    let value = data.get(0, &column.name)?.as_number()?;
    if !value.is_finite() || !stats.min.is_finite() || !stats.max.is_finite() {
        return None;
    }
    let span = stats.max - stats.min;
    if span == 0.0 {
        return Some(0.0);
    }
    Some((value - stats.min) / span)
}

#[derive(Clone, Debug)]
pub enum Dynamic {
    Text(TextDynamic),
    Transform(TransformDynamic),
    Style(StyleDynamic),
}

impl Dynamic {
    pub fn element(&self) -> NodeId {
        match self {
            Dynamic::Text(d) => d.element,
            Dynamic::Transform(d) => d.element,
            Dynamic::Style(d) => d.element,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Dynamic::Text(_) => "text",
            Dynamic::Transform(_) => "transform",
            Dynamic::Style(_) => "style",
        }
    }

    pub fn apply(&mut self, data: &Data, ctx: &mut ApplyContext) {
        match self {
            Dynamic::Text(d) => d.apply(data, ctx),
            Dynamic::Transform(d) => d.apply(data, ctx),
            Dynamic::Style(d) => d.apply(data, ctx),
        }
    }

    /// Advance any running animation; `true` while more frames are wanted
    pub fn tick(&mut self, now: f64, ctx: &mut ApplyContext) -> bool {
        match self {
            Dynamic::Transform(d) => d.tick(now, ctx),
            Dynamic::Text(_) | Dynamic::Style(_) => false,
        }
    }
}

/// Which dynamic families the registry builds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DynamicTypes {
    pub text: bool,
    pub transforms: bool,
    pub styles: bool,
}

impl Default for DynamicTypes {
    fn default() -> Self {
        Self::all()
    }
}

impl DynamicTypes {
    pub fn all() -> Self {
        Self { text: true, transforms: true, styles: true }
    }

    pub fn none() -> Self {
        Self { text: false, transforms: false, styles: false }
    }

    /// From a comma list over `all`, `text`, `transforms`/`shapes` and `styles`
    pub fn parse(list: &str) -> Self {
        let mut types = Self::none();
        for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match item {
                "all" => return Self::all(),
                "text" => types.text = true,
                "transforms" | "shapes" => types.transforms = true,
                "styles" => types.styles = true,
                other => log::warn!("unknown dynamic type '{}'", other),
            }
        }
        types
    }
}

/// Build every enabled dynamic under `root`: text, then transforms, then styles
pub fn get_dynamics(doc: &mut SvgDocument, root: NodeId, types: DynamicTypes) -> Vec<Dynamic> {
    let mut dynamics = Vec::new();
    if types.text {
        dynamics.extend(TextDynamic::get_dynamics(doc, root).into_iter().map(Dynamic::Text));
    }
    if types.transforms {
        dynamics.extend(TransformDynamic::get_dynamics(doc, root).into_iter().map(Dynamic::Transform));
    }
    if types.styles {
        dynamics.extend(StyleDynamic::get_dynamics(doc, root).into_iter().map(Dynamic::Style));
    }
    dynamics
}
