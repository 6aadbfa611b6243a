//! Locale-aware number formatting
//!
//! Mirrors the subset of `Intl.NumberFormat` options the display formats rely
//! on: fixed fraction digits, significant digits, grouping, currency, percent
//! and compact notation. When significant digits are set they take priority
//! over fraction digits, as `roundingPriority: "auto"` does.

use super::locale::Locale;
use num_format::ToFormattedString;

#[derive(Clone, Debug, PartialEq)]
pub enum NumberStyle {
    Decimal,
    Currency(String),
    Percent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NumberFormat {
    pub locale: Locale,
    pub style: NumberStyle,
    pub min_fraction_digits: Option<u32>,
    pub max_fraction_digits: Option<u32>,
    pub max_significant_digits: Option<u32>,
    pub use_grouping: bool,
    pub compact: bool,
}

impl NumberFormat {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            style: NumberStyle::Decimal,
            min_fraction_digits: None,
            max_fraction_digits: None,
            max_significant_digits: None,
            use_grouping: true,
            compact: false,
        }
    }

    pub fn format(&self, value: f64) -> String {
        let mut v = value;
        if self.style == NumberStyle::Percent {
            v *= 100.0;
        }

        let body = if v.is_nan() {
            "NaN".to_string()
        } else if v.is_infinite() {
            "∞".to_string()
        } else if self.compact {
            self.format_compact(v.abs())
        } else {
            self.format_plain(v.abs())
        };

        // "-0" never shows a sign
        let negative = (v < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0'))
            || v == f64::NEG_INFINITY;
        let sign = if negative { "-" } else { "" };

        match &self.style {
            NumberStyle::Decimal => format!("{}{}", sign, body),
            NumberStyle::Percent => format!("{}{}{}", sign, body, self.locale.percent_suffix),
            NumberStyle::Currency(code) => {
                let symbol = self.locale.currency_symbol(code);
                if self.locale.currency_after {
                    format!("{}{}\u{a0}{}", sign, body, symbol)
                } else if symbol.chars().all(|c| c.is_ascii_alphabetic()) {
                    format!("{}{}\u{a0}{}", sign, symbol, body)
                } else {
                    format!("{}{}{}", sign, symbol, body)
                }
            }
        }
    }

    fn default_fraction_digits(&self) -> (u32, u32) {
        let (min, max) = match &self.style {
            NumberStyle::Decimal => (0, 3),
            NumberStyle::Percent => (0, 0),
            NumberStyle::Currency(code) if code == "JPY" => (0, 0),
            NumberStyle::Currency(_) => (2, 2),
        };
        let min = self.min_fraction_digits.unwrap_or(min);
        let max = self.max_fraction_digits.unwrap_or(max.max(min));
        (min, max.max(min))
    }

    fn format_plain(&self, abs: f64) -> String {
        let digits = match self.max_significant_digits {
            Some(sig) => significant(abs, sig),
            None => {
                let (min, max) = self.default_fraction_digits();
                fixed(abs, min, max)
            }
        };
        self.localize(&digits)
    }

    fn format_compact(&self, abs: f64) -> String {
        let mut exp3 = 0usize;
        while exp3 < 4 && abs >= 10f64.powi(3 * (exp3 as i32 + 1)) {
            exp3 += 1;
        }

        loop {
            let unit = if exp3 == 0 { "" } else { self.locale.compact_units[exp3 - 1] };
            // Locales without an abbreviation at this magnitude show the full number
            let scale = if unit.is_empty() { 1.0 } else { 10f64.powi(3 * exp3 as i32) };
            let scaled = abs / scale;
            let digits = match self.max_significant_digits {
                Some(sig) => significant(scaled, sig),
                None if scaled < 100.0 => significant(scaled, 2),
                None => fixed(scaled, 0, 0),
            };
            let rounded: f64 = digits.parse().unwrap_or(scaled);
            if !unit.is_empty() && rounded >= 1000.0 && exp3 < 4 {
                exp3 += 1;
                continue;
            }
            return format!("{}{}", self.localize(&digits), unit);
        }
    }

    /// Swap in locale separators and insert group separators
    fn localize(&self, digits: &str) -> String {
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits, None),
        };
        let mut out = if self.use_grouping {
            group_digits(int_part, &self.locale)
        } else {
            int_part.to_string()
        };
        if let Some(frac) = frac_part {
            out.push_str(self.locale.decimal());
            out.push_str(frac);
        }
        out
    }
}

/// Round half away from zero at `decimals` places (negative = left of the
/// point); `None` when the scaled value leaves the finite range
fn round_to(x: f64, decimals: i32) -> Option<f64> {
    let f = 10f64.powi(decimals.abs());
    let rounded = if decimals >= 0 {
        (x * f).round() / f
    } else {
        (x / f).round() * f
    };
    rounded.is_finite().then_some(rounded)
}

/// `x` written with `places` fraction digits
fn to_places(x: f64, decimals: i32) -> String {
    let places = decimals.max(0) as usize;
    match round_to(x, decimals) {
        Some(rounded) => format!("{:.*}", places, rounded),
        // Too large or too small to scale; the formatter rounds to nearest
        None => format!("{:.*}", places, x),
    }
}

fn trim_fraction(s: String, min_fraction: usize) -> String {
    let Some(dot) = s.find('.') else {
        return s;
    };
    let mut end = s.len();
    let keep_until = dot + 1 + min_fraction;
    while end > keep_until && s.as_bytes()[end - 1] == b'0' {
        end -= 1;
    }
    if end == dot + 1 {
        end = dot;
    }
    s[..end].to_string()
}

fn fixed(abs: f64, min_fraction: u32, max_fraction: u32) -> String {
    let max_fraction = max_fraction.min(20);
    trim_fraction(to_places(abs, max_fraction as i32), min_fraction as usize)
}

fn significant(abs: f64, sig: u32) -> String {
    if abs == 0.0 {
        return "0".to_string();
    }
    let sig = sig.clamp(1, 21) as i32;
    // Decimal exponent of the leading digit, exact down to subnormals
    let exp: i32 = format!("{:e}", abs)
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);
    trim_fraction(to_places(abs, sig - 1 - exp), 0)
}

/// Group an unsigned digit run with the locale's separators
fn group_digits(int_part: &str, locale: &Locale) -> String {
    match int_part.parse::<u128>() {
        Ok(n) => n.to_formatted_string(&locale.numbers),
        // Beyond u128: format the head, then the low 36 digits in threes
        Err(_) if int_part.len() > 36 && int_part.bytes().all(|b| b.is_ascii_digit()) => {
            let (head, tail) = int_part.split_at(int_part.len() - 36);
            let mut out = group_digits(head, locale);
            for i in (0..tail.len()).step_by(3) {
                out.push_str(locale.group());
                out.push_str(&tail[i..i + 3]);
            }
            out
        }
        Err(_) => int_part.to_string(),
    }
}
