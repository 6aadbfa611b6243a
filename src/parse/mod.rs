//! Directive parsing
//!
//! Turns `{{...}}` tags found in element ids, text content and column labels
//! into structured directives, and resolves the references they make.

pub mod column;
pub mod elements;
pub mod range;
pub mod stats;
pub mod syntax;

pub use column::{column_from_data, column_identifier};
pub use elements::{elements_by_name, elements_with_options};
pub use range::{range, RangeValue};
pub use stats::data_stats;
pub use syntax::{
    decode_illustrator, first_key, has_directive, replace_directives, strip_directives, syntax,
    Directive, OptValue, Options,
};
