//! Tabular data model
//!
//! Rows of cell values, typed columns with numeric statistics, and the
//! per-column display formatters derived from an inbound data message.

pub mod column;
pub mod formats;
pub mod locale;
pub mod message;
pub mod number_format;
pub mod row;
pub mod table;
pub mod value;

pub use column::{Column, ColumnFormat, ColumnType, Stats, StatsUpdate};
pub use formats::{parse_va_format, parse_va_formats, Formatter, FORMAT_FAIL_OUTPUT};
pub use locale::Locale;
pub use message::{VaColumn, VaColumnType, VaFormat, VaMessage};
pub use number_format::{NumberFormat, NumberStyle};
pub use row::{ColumnKey, Row};
pub use table::Data;
pub use value::{js_number_string, parse_js_number, Value};
