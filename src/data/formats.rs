//! Column display formats
//!
//! Each message column declares a display format name; `parse_va_format`
//! maps it onto a [`Formatter`] by prefix:
//!
//! - `DOLLAR`, `EURO`, `POUND`, `WON`, `YEN` are aliases for `NLMNL<ISO>`
//! - `NLMNI*` literal suffix prepended to a locale number
//! - `TIME`, `HOUR`, `HHMM`, `MMSS` duration decompositions of seconds
//! - `NLMNL*` currency, `PERCENT` percent, `F*` no grouping, `BEST` significant digits
//! - anything else: locale number with the declared precision

use super::locale::Locale;
use super::message::{VaColumn, VaColumnType, VaFormat, VaMessage};
use super::number_format::{NumberFormat, NumberStyle};
use super::value::{js_number_string, Value};

/// Output for values a formatter cannot render
pub const FORMAT_FAIL_OUTPUT: &str = "???";

const BASIC_FORMATS: [(&str, &str); 5] = [
    ("DOLLAR", "NLMNLUSD"),
    ("EURO", "NLMNLEUR"),
    ("POUND", "NLMNLGBP"),
    ("WON", "NLMNLCNY"),
    ("YEN", "NLMNLJPY"),
];

/// A value -> display string mapping
#[derive(Clone, Debug, PartialEq)]
pub enum Formatter {
    /// Locale number, optionally preceded by a literal prefix
    Number { prefix: String, number: NumberFormat },
    /// Whole hours of a duration in seconds
    Hours(NumberFormat),
    /// `hh:mm:ss` from seconds
    Time,
    /// `hh:mm` from seconds
    HoursMinutes,
    /// `mm:ss` from seconds
    MinutesSeconds,
    /// Strings pass through unchanged
    Text,
}

impl Formatter {
    pub fn format(&self, value: &Value) -> String {
        match (self, value) {
            (Formatter::Text, Value::Text(s)) => s.clone(),
            (Formatter::Text, Value::Number(_)) => FORMAT_FAIL_OUTPUT.to_string(),
            (_, Value::Text(_)) => FORMAT_FAIL_OUTPUT.to_string(),
            (Formatter::Number { prefix, number }, Value::Number(n)) => {
                format!("{}{}", prefix, number.format(*n))
            }
            (Formatter::Hours(number), Value::Number(n)) => number.format((n / 3600.0).floor()),
            (Formatter::Time, Value::Number(n)) => {
                let (h, m, s) = time_from_seconds(*n);
                format!("{}:{}:{}", pad2(h), pad2(m), pad2(s))
            }
            (Formatter::HoursMinutes, Value::Number(n)) => {
                let (h, m, _) = time_from_seconds(*n);
                format!("{}:{}", pad2(h), pad2(m))
            }
            (Formatter::MinutesSeconds, Value::Number(n)) => {
                let secs = js_round(*n);
                let minutes = (secs / 60.0).floor();
                let seconds = ((secs % 3600.0) % 60.0).ceil();
                format!("{}:{}", pad2(minutes), pad2(seconds))
            }
        }
    }
}

/// `Math.round`: halves round toward positive infinity
fn js_round(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn pad2(n: f64) -> String {
    format!("{:0>2}", js_number_string(n))
}

/// Split a duration in seconds into hours, minutes and seconds
fn time_from_seconds(secs: f64) -> (f64, f64, f64) {
    let secs = js_round(secs);
    let hours = (secs / 3600.0).floor();
    let rem = secs % 3600.0;
    let minutes = (rem / 60.0).floor();
    let seconds = (rem % 60.0).ceil();
    (hours, minutes, seconds)
}

fn resolve_alias(name: &str) -> &str {
    BASIC_FORMATS
        .iter()
        .find(|(basic, _)| *basic == name)
        .map(|(_, full)| *full)
        .unwrap_or(name)
}

fn number_formatter(format: &VaFormat, compact: bool, locale: &Locale) -> Formatter {
    let mut number = NumberFormat::new(*locale);
    number.min_fraction_digits = Some(format.precision);
    number.max_fraction_digits = Some(format.precision);
    if compact {
        number.compact = true;
        number.max_significant_digits = Some(3);
    }

    let name = resolve_alias(&format.name);

    if let Some(prefix) = name.strip_prefix("NLMNI") {
        return Formatter::Number { prefix: prefix.to_string(), number };
    } else if name.starts_with("TIME") {
        return Formatter::Time;
    } else if name.starts_with("HOUR") {
        return Formatter::Hours(NumberFormat::new(*locale));
    } else if name.starts_with("HHMM") {
        return Formatter::HoursMinutes;
    } else if name.starts_with("MMSS") {
        return Formatter::MinutesSeconds;
    } else if let Some(code) = name.strip_prefix("NLMNL") {
        number.style = NumberStyle::Currency(code.to_string());
    } else if name.starts_with("PERCENT") {
        number.style = NumberStyle::Percent;
    } else if name.starts_with('F') {
        number.use_grouping = false;
    } else if name.starts_with("BEST") {
        number.max_fraction_digits = None;
        number.max_significant_digits = Some(if compact { 3 } else { format.width.max(1) });
    }

    Formatter::Number { prefix: String::new(), number }
}

/// Build the formatter for one message column
pub fn parse_va_format(column: &VaColumn, compact: bool, locale: &Locale) -> Formatter {
    match (&column.format, column.column_type) {
        (Some(format), VaColumnType::Number) => number_formatter(format, compact, locale),
        _ => Formatter::Text,
    }
}

/// Formatters for every message column, keyed by column label
pub fn parse_va_formats(message: &VaMessage, compact: bool, locale: &Locale) -> Vec<(String, Formatter)> {
    message
        .columns
        .iter()
        .map(|column| (column.label.clone(), parse_va_format(column, compact, locale)))
        .collect()
}
