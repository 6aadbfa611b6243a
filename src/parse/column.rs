//! Column references: labels or typed positional shorthands
//!
//! `@N`, `#N` and `$N` pick the Nth (zero-based) String, Number or Date
//! column; anything else is looked up by label.

use crate::data::{Column, ColumnType, Data};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_COLUMNID: Regex = Regex::new(r"^[@#$][0-9]+$").unwrap();
}

/// Decode a positional shorthand into a column type and index
pub fn column_identifier(id: &str) -> Option<(ColumnType, usize)> {
    if !RE_COLUMNID.is_match(id) {
        return None;
    }
    let column_type = match id.chars().next()? {
        '@' => ColumnType::String,
        '#' => ColumnType::Number,
        '$' => ColumnType::Date,
        _ => return None,
    };
    let index = id[1..].parse().ok()?;
    Some((column_type, index))
}

/// Resolve a column reference against `data`
pub fn column_from_data<'d>(reference: &str, data: &'d Data) -> Option<&'d Column> {
    match column_identifier(reference) {
        Some((column_type, index)) => data.get_column_typed(index, column_type),
        None => data.get_column(reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    #[test]
    fn test_column_identifier() {
        assert_eq!(column_identifier("@0"), Some((ColumnType::String, 0)));
        assert_eq!(column_identifier("#12"), Some((ColumnType::Number, 12)));
        assert_eq!(column_identifier("$3"), Some((ColumnType::Date, 3)));
        assert_eq!(column_identifier("#"), None);
        assert_eq!(column_identifier("Revenue"), None);
        assert_eq!(column_identifier("#1a"), None);
    }

    #[test]
    fn test_column_from_data() {
        let data = Data::new(
            vec![vec![Some(Value::from("Tech")), Some(Value::from(1.0)), Some(Value::from(2.0))]],
            &["Department".to_string(), "Revenue".to_string(), "Expenses".to_string()],
        );
        assert_eq!(column_from_data("#1", &data).unwrap().name, "Expenses");
        assert_eq!(column_from_data("@0", &data).unwrap().name, "Department");
        assert_eq!(column_from_data("Revenue", &data).unwrap().name, "Revenue");
        assert!(column_from_data("#2", &data).is_none());
        assert!(column_from_data("Profit", &data).is_none());
    }
}
