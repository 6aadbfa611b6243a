//! Locale conventions for number display
//!
//! The host passes a BCP 47 tag (what a browser reports as `navigator.language`).
//! Separators and digit grouping come from `num-format`'s CLDR tables; the
//! affix conventions below are picked by language subtag. Unknown tags fall
//! back to English.

use num_format::Locale as NumLocale;

/// Separators and affixes used when rendering numbers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Locale {
    /// Decimal mark, group separator and grouping style
    pub numbers: NumLocale,
    /// Currency symbol follows the number ("1.234,00 €") instead of leading it
    pub currency_after: bool,
    pub percent_suffix: &'static str,
    /// Compact suffixes for 10^3, 10^6, 10^9, 10^12; empty means no abbreviation
    pub compact_units: [&'static str; 4],
}

const EN: Locale = Locale {
    numbers: NumLocale::en,
    currency_after: false,
    percent_suffix: "%",
    compact_units: ["K", "M", "B", "T"],
};

const DE: Locale = Locale {
    numbers: NumLocale::de,
    currency_after: true,
    percent_suffix: "\u{a0}%",
    compact_units: ["", "\u{a0}Mio.", "\u{a0}Mrd.", "\u{a0}Bio."],
};

const FR: Locale = Locale {
    numbers: NumLocale::fr,
    currency_after: true,
    percent_suffix: "\u{a0}%",
    compact_units: ["\u{a0}k", "\u{a0}M", "\u{a0}Md", "\u{a0}Bn"],
};

impl Locale {
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let conventions = match language.as_str() {
            "de" => DE,
            "fr" => FR,
            _ => EN,
        };
        // A regional table ("de-CH") refines the language default
        let numbers = NumLocale::from_name(tag.replace('_', "-"))
            .or_else(|_| NumLocale::from_name(&language))
            .unwrap_or(conventions.numbers);
        Locale { numbers, ..conventions }
    }

    pub fn decimal(&self) -> &'static str {
        self.numbers.decimal()
    }

    pub fn group(&self) -> &'static str {
        self.numbers.separator()
    }

    pub fn currency_symbol(&self, code: &str) -> String {
        match code {
            "USD" => "$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            "JPY" => "¥".to_string(),
            "CNY" => "CN¥".to_string(),
            other => other.to_string(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        EN
    }
}
