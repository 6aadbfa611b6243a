//! Numeric ranges: `min..max`, `min to max`, `min;max` or `min max`

use crate::data::value::parse_js_number;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RangeValue {
    Single(f64),
    Pair(f64, f64),
}

impl RangeValue {
    /// Both endpoints, a single value standing for both
    pub fn endpoints(&self) -> (f64, f64) {
        match *self {
            RangeValue::Single(v) => (v, v),
            RangeValue::Pair(a, b) => (a, b),
        }
    }

    pub fn is_finite(&self) -> bool {
        let (a, b) = self.endpoints();
        a.is_finite() && b.is_finite()
    }
}

/// Parse a range, underscores standing in for spaces
///
/// Delimiters are tried in order: `..`, ` to `, `;`, then whitespace.
/// Endpoints use `Number()` coercion, so junk yields NaN.
pub fn range(text: &str) -> RangeValue {
    let text = text.replace('_', " ");
    let text = text.trim();

    for delimiter in ["..", " to ", ";"] {
        if let Some((a, b)) = text.split_once(delimiter) {
            return RangeValue::Pair(parse_js_number(a), parse_js_number(b));
        }
    }
    if let Some((a, b)) = text.split_once(char::is_whitespace) {
        return RangeValue::Pair(parse_js_number(a), parse_js_number(b));
    }
    RangeValue::Single(parse_js_number(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiters_agree() {
        for (a, b) in [(0.0, 300.0), (-2.5, 4820.5), (0.5, 1.0)] {
            let expected = RangeValue::Pair(a, b);
            assert_eq!(range(&format!("{}..{}", a, b)), expected);
            assert_eq!(range(&format!("{} to {}", a, b)), expected);
            assert_eq!(range(&format!("{};{}", a, b)), expected);
            assert_eq!(range(&format!("{} {}", a, b)), expected);
        }
    }

    #[test]
    fn test_underscores_are_spaces() {
        assert_eq!(range("0_to_300"), RangeValue::Pair(0.0, 300.0));
        assert_eq!(range("0.5_4820.50"), RangeValue::Pair(0.5, 4820.5));
    }

    #[test]
    fn test_single_value() {
        assert_eq!(range("0.5"), RangeValue::Single(0.5));
        assert_eq!(range("0.5").endpoints(), (0.5, 0.5));
    }

    #[test]
    fn test_junk_is_not_finite() {
        assert!(!range("min").is_finite());
        assert!(!range("a..b").is_finite());
        assert!(range("1..2").is_finite());
    }
}
