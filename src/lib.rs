//! Dynamic SVG WASM Module
//!
//! Binds tabular data to SVG templates annotated with `{{...}}` directives:
//! text substitution, data-driven transforms and styles, and eased motion
//! along guide paths.

pub mod api;
pub mod controller;
pub mod data;
pub mod dynamics;
pub mod errors;
pub mod parse;
pub mod svg;

// Re-export commonly used types
pub use controller::{ControllerOptions, DynamicSvg, Lifecycle};
pub use data::{Column, ColumnType, Data, Formatter, Locale, Stats, StatsUpdate, VaMessage, Value};
pub use dynamics::{get_dynamics, normalize, ApplyContext, Dynamic, DynamicTypes, Easer, Guide};
pub use errors::{DirectiveError, DynSvgError, Result, SvgError};
pub use parse::{data_stats, range, syntax, Directive, OptValue, RangeValue};
pub use svg::SvgDocument;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        // a logger was installed by an earlier start
        return;
    }

    log::info!("Dynamic SVG WASM module initialized");
}
