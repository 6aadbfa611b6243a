//! The data table: rows, typed columns, statistics and formatting

use super::column::{Column, ColumnFormat, ColumnType, Stats, StatsUpdate};
use super::formats::{parse_va_formats, Formatter, FORMAT_FAIL_OUTPUT};
use super::locale::Locale;
use super::message::{VaColumnType, VaMessage};
use super::row::{ColumnKey, Row};
use super::value::{parse_js_number, Value};
use std::collections::HashMap;

/// Rows and columns built fresh from each inbound message
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Data {
    rows: Vec<Row>,
    cols: Vec<Column>,
    cols_map: HashMap<String, usize>,
}

impl Data {
    /// Build a table, inferring column types from the first row
    ///
    /// A first-row string cell makes a String column; anything else (numbers,
    /// missing cells) makes a Number column. Stats are computed for every
    /// Number column before returning.
    pub fn new(data: Vec<Vec<Option<Value>>>, columns: &[String]) -> Self {
        let types: Vec<ColumnType> = match data.first() {
            Some(first) => first
                .iter()
                .map(|cell| match cell {
                    Some(Value::Text(_)) => ColumnType::String,
                    _ => ColumnType::Number,
                })
                .collect(),
            None => Vec::new(),
        };

        let rows = data.into_iter().map(|d| Row::new(d, columns)).collect();
        let cols = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Column::new(name.clone(), types.get(i).copied().unwrap_or(ColumnType::Number))
            })
            .collect();
        let cols_map = columns.iter().enumerate().map(|(i, c)| (c.clone(), i)).collect();

        let mut table = Data { rows, cols, cols_map };
        table.calc_column_stats(&[]);
        table
    }

    /// Build a table from a data message: cast declared types, then attach
    /// the standard and compact formatters for each column
    pub fn from_va(message: &VaMessage, locale: &Locale) -> Self {
        let labels = message.labels();
        let mut table = Data::new(message.data.clone(), &labels);

        for column in &message.columns {
            match column.column_type {
                VaColumnType::Number => table.cast_column(&column.label, ColumnType::Number),
                VaColumnType::String => table.cast_column(&column.label, ColumnType::String),
                VaColumnType::Date => table.cast_column(&column.label, ColumnType::Date),
                VaColumnType::Other => {}
            }
        }

        for compact in [false, true] {
            let (labels, formats): (Vec<String>, Vec<Formatter>) =
                parse_va_formats(message, compact, locale).into_iter().unzip();
            table.set_column_formats(&labels, formats, compact);
        }

        log::debug!(
            "Data::from_va: {} rows x {} columns",
            table.row_count(),
            table.columns().len()
        );
        table
    }

    /// Column names in position order
    pub fn cols(&self) -> Vec<String> {
        let mut names: Vec<(&String, &usize)> = self.cols_map.iter().collect();
        names.sort_by_key(|(_, &i)| i);
        names.into_iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.cols
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_index<'a>(&self, column: impl Into<ColumnKey<'a>>) -> Option<usize> {
        match column.into() {
            ColumnKey::Name(name) => self.cols_map.get(name).copied(),
            ColumnKey::Index(i) if i < self.cols.len() => Some(i),
            ColumnKey::Index(_) => None,
        }
    }

    pub fn get_column<'a>(&self, column: impl Into<ColumnKey<'a>>) -> Option<&Column> {
        self.column_index(column).and_then(|i| self.cols.get(i))
    }

    /// The `index`-th column among those of type `column_type`
    pub fn get_column_typed(&self, index: usize, column_type: ColumnType) -> Option<&Column> {
        self.cols.iter().filter(|c| c.column_type == column_type).nth(index)
    }

    pub fn get<'a>(&self, row: usize, column: impl Into<ColumnKey<'a>>) -> Option<&Value> {
        let r = self.rows.get(row)?;
        let col = self.get_column(column)?;
        r.get(&col.name)
    }

    pub fn set<'a>(&mut self, row: usize, column: impl Into<ColumnKey<'a>>, value: Option<Value>) {
        let Some(name) = self.get_column(column).map(|c| c.name.clone()) else {
            return;
        };
        if let Some(r) = self.rows.get_mut(row) {
            r.set(&name, value);
        }
    }

    /// Formatted cell text; unformatted columns fall back to the raw value's
    /// string form and missing values render `???`
    pub fn get_formatted<'a>(
        &self,
        row: usize,
        column: impl Into<ColumnKey<'a>>,
        compact: bool,
    ) -> String {
        let Some(col) = self.get_column(column) else {
            return FORMAT_FAIL_OUTPUT.to_string();
        };
        let Some(value) = self.get(row, &col.name) else {
            return FORMAT_FAIL_OUTPUT.to_string();
        };
        match (&col.format.compact, &col.format.standard) {
            (Some(cmp), _) if compact => cmp.format(value),
            (_, Some(std)) => std.format(value),
            _ => value.to_string(),
        }
    }

    pub fn set_column_format<'a>(
        &mut self,
        column: impl Into<ColumnKey<'a>>,
        format: Formatter,
        compact: bool,
    ) {
        let Some(i) = self.column_index(column) else {
            return;
        };
        let ColumnFormat { standard, compact: cmp } = &mut self.cols[i].format;
        if compact {
            *cmp = Some(format);
        } else {
            *standard = Some(format);
        }
    }

    /// Pairwise assignment; extra columns without a matching format are left alone
    pub fn set_column_formats(&mut self, columns: &[String], formats: Vec<Formatter>, compact: bool) {
        for (column, format) in columns.iter().zip(formats) {
            self.set_column_format(column, format, compact);
        }
    }

    pub fn stats<'a>(&self, column: impl Into<ColumnKey<'a>>) -> Option<Stats> {
        self.get_column(column).and_then(|c| c.stats)
    }

    pub fn min<'a>(&self, column: impl Into<ColumnKey<'a>>) -> Option<f64> {
        self.stats(column).map(|s| s.min)
    }

    pub fn max<'a>(&self, column: impl Into<ColumnKey<'a>>) -> Option<f64> {
        self.stats(column).map(|s| s.max)
    }

    pub fn sum<'a>(&self, column: impl Into<ColumnKey<'a>>) -> Option<f64> {
        self.stats(column).map(|s| s.sum)
    }

    pub fn avg<'a>(&self, column: impl Into<ColumnKey<'a>>) -> Option<f64> {
        self.stats(column).map(|s| s.avg)
    }

    /// Recompute stats for the named Number columns (all when `columns` is
    /// empty), skipping any column whose stats were set manually
    pub fn calc_column_stats(&mut self, columns: &[String]) {
        let selected: Vec<usize> = self
            .cols
            .iter()
            .enumerate()
            .filter(|(_, c)| columns.is_empty() || columns.contains(&c.name))
            .filter(|(_, c)| c.column_type == ColumnType::Number && !c.has_manual_stats())
            .map(|(i, _)| i)
            .collect();

        for &i in &selected {
            let name = &self.cols[i].name;
            let mut stats = Stats::empty();
            for row in &self.rows {
                // Missing cells poison the sum the same way NaN cells do
                let val = row.get(name).map(Value::to_number).unwrap_or(f64::NAN);
                if val < stats.min {
                    stats.min = val;
                }
                if val > stats.max {
                    stats.max = val;
                }
                stats.sum += val;
            }
            stats.avg = stats.sum / self.rows.len() as f64;
            self.cols[i].stats = Some(stats);
        }
    }

    /// Merge a partial override and mark the column's stats as manual
    pub fn set_column_stats<'a>(&mut self, column: impl Into<ColumnKey<'a>>, update: StatsUpdate) {
        let Some(i) = self.column_index(column) else {
            return;
        };
        let stats = self.cols[i].stats.get_or_insert_with(Stats::empty);
        stats.merge(&update);
        stats.manual = true;
    }

    /// Rename a column across the column list, the name map and every row
    ///
    /// Renaming onto a name held by another column is refused.
    pub fn rename_column<'a>(&mut self, column: impl Into<ColumnKey<'a>>, name: &str) {
        let Some(index) = self.column_index(column) else {
            return;
        };
        let old = self.cols[index].name.clone();
        if old == name {
            return;
        }
        if self.cols_map.contains_key(name) {
            log::warn!("rename_column: '{}' already exists, keeping '{}'", name, old);
            return;
        }
        for row in &mut self.rows {
            row.rename_column(old.as_str(), name);
        }
        self.cols_map.remove(&old);
        self.cols_map.insert(name.to_string(), index);
        self.cols[index].name = name.to_string();
    }

    /// Remove a column from every row, the column list and the name map
    pub fn drop_column<'a>(&mut self, column: impl Into<ColumnKey<'a>>) {
        let Some(index) = self.column_index(column) else {
            return;
        };
        let name = self.cols[index].name.clone();
        for row in &mut self.rows {
            row.delete(name.as_str());
        }
        self.cols_map.remove(&name);
        for position in self.cols_map.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }
        self.cols.remove(index);
    }

    /// Change a column's type, converting every cell
    ///
    /// Casting to Number recomputes that column's stats; Date only retypes.
    pub fn cast_column<'a>(&mut self, column: impl Into<ColumnKey<'a>>, column_type: ColumnType) {
        let Some(index) = self.column_index(column) else {
            return;
        };
        self.cols[index].column_type = column_type;
        let name = self.cols[index].name.clone();

        match column_type {
            ColumnType::String => {
                for row in &mut self.rows {
                    let cast = row.get(name.as_str()).map(|v| Value::Text(v.to_string()));
                    if cast.is_some() {
                        row.set(name.as_str(), cast);
                    }
                }
            }
            ColumnType::Number => {
                for row in &mut self.rows {
                    let cast = row.get(name.as_str()).map(|v| match v {
                        Value::Number(n) => Value::Number(*n),
                        Value::Text(s) => Value::Number(parse_js_number(s)),
                    });
                    if cast.is_some() {
                        row.set(name.as_str(), cast);
                    }
                }
                self.calc_column_stats(&[name]);
            }
            ColumnType::Date => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn sample() -> Data {
        Data::new(
            vec![
                vec![Some(Value::from("Technology")), Some(Value::from(180435.0)), Some(Value::from(54400.0))],
                vec![Some(Value::from("Finance")), Some(Value::from(120000.0)), Some(Value::from(0.0))],
                vec![Some(Value::from("Sales")), Some(Value::from(90000.5)), Some(Value::from(300.0))],
            ],
            &names(&["Department", "Revenue", "Expenses"]),
        )
    }

    #[test]
    fn test_type_inference_from_first_row() {
        let data = sample();
        assert_eq!(data.get_column("Department").unwrap().column_type, ColumnType::String);
        assert_eq!(data.get_column("Revenue").unwrap().column_type, ColumnType::Number);
        assert!(data.get_column("Department").unwrap().stats.is_none());
    }

    #[test]
    fn test_stats_match_scan() {
        let data = sample();
        let values = [54400.0, 0.0, 300.0];
        let sum: f64 = values.iter().sum();
        assert_eq!(data.min("Expenses"), Some(0.0));
        assert_eq!(data.max("Expenses"), Some(54400.0));
        assert_eq!(data.sum("Expenses"), Some(sum));
        assert_eq!(data.avg("Expenses"), Some(sum / 3.0));
    }

    #[test]
    fn test_manual_stats_survive_recalc() {
        let mut data = sample();
        data.set_column_stats("Expenses", StatsUpdate { min: Some(5.0), ..Default::default() });
        data.calc_column_stats(&[]);
        let stats = data.stats("Expenses").unwrap();
        assert_eq!(stats.min, 5.0);
        assert_eq!(stats.max, 54400.0);
        assert!(stats.manual);
    }

    #[test]
    fn test_set_stats_on_column_without_stats() {
        let mut data = sample();
        data.set_column_stats("Department", StatsUpdate::range(0.0, 10.0));
        let stats = data.stats("Department").unwrap();
        assert_eq!((stats.min, stats.max), (0.0, 10.0));
        assert_eq!(stats.sum, 0.0);
    }

    #[test]
    fn test_get_and_set() {
        let mut data = sample();
        assert_eq!(data.get(0, "Department"), Some(&Value::from("Technology")));
        assert_eq!(data.get(0, 1usize), Some(&Value::from(180435.0)));
        assert_eq!(data.get(7, "Department"), None);
        assert_eq!(data.get(0, "Nope"), None);

        data.set(1, "Revenue", Some(Value::from(1.0)));
        assert_eq!(data.get(1, "Revenue"), Some(&Value::from(1.0)));
        data.set(9, "Revenue", Some(Value::from(2.0)));
        data.set(0, "Nope", Some(Value::from(2.0)));
        assert_eq!(data.row_count(), 3);
    }

    #[test]
    fn test_get_formatted_fallbacks() {
        let mut data = sample();
        assert_eq!(data.get_formatted(0, "Revenue", false), "180435");
        assert_eq!(data.get_formatted(0, "Department", true), "Technology");
        assert_eq!(data.get_formatted(0, "Missing", false), FORMAT_FAIL_OUTPUT);

        data.set(0, "Revenue", None);
        assert_eq!(data.get_formatted(0, "Revenue", false), FORMAT_FAIL_OUTPUT);
    }

    #[test]
    fn test_compact_falls_back_to_standard() {
        let mut data = sample();
        let mut nf = super::super::number_format::NumberFormat::new(Locale::default());
        nf.max_fraction_digits = Some(0);
        data.set_column_format("Revenue", Formatter::Number { prefix: String::new(), number: nf }, false);
        assert_eq!(data.get_formatted(0, "Revenue", true), "180,435");
    }

    #[test]
    fn test_set_column_formats_pairs_in_order() {
        let mut data = sample();
        data.set_column_formats(
            &names(&["Revenue", "Expenses", "Department"]),
            vec![Formatter::Time, Formatter::MinutesSeconds],
            false,
        );
        assert_eq!(data.get_formatted(0, "Revenue", false), "50:07:15");
        assert_eq!(data.get_formatted(2, "Expenses", false), "05:00");
        // No third format: the column keeps printing raw values
        assert_eq!(data.get_formatted(0, "Department", false), "Technology");
        assert_eq!(data.get_formatted(0, "Revenue", true), "50:07:15");
    }

    #[test]
    fn test_drop_column_keeps_map_in_step() {
        let mut data = sample();
        data.drop_column("Revenue");
        assert_eq!(data.cols(), names(&["Department", "Expenses"]));
        assert_eq!(data.columns().len(), 2);
        assert_eq!(data.get(0, "Expenses"), Some(&Value::from(54400.0)));
        assert_eq!(data.get(0, 1usize), Some(&Value::from(54400.0)));
        assert_eq!(data.rows()[0].len(), 2);
    }

    #[test]
    fn test_rename_column() {
        let mut data = sample();
        data.rename_column("Expenses", "Costs");
        assert_eq!(data.get(2, "Costs"), Some(&Value::from(300.0)));
        assert!(data.get_column("Expenses").is_none());
        assert_eq!(data.cols(), names(&["Department", "Revenue", "Costs"]));

        data.rename_column("Costs", "Revenue");
        assert_eq!(data.get(2, "Costs"), Some(&Value::from(300.0)));
    }

    #[test]
    fn test_cast_to_number_recalcs_stats() {
        let mut data = Data::new(
            vec![vec![Some(Value::from("12"))], vec![Some(Value::from("30"))]],
            &names(&["Count"]),
        );
        assert!(data.stats("Count").is_none());
        data.cast_column("Count", ColumnType::Number);
        assert_eq!(data.get(0, "Count"), Some(&Value::from(12.0)));
        assert_eq!(data.max("Count"), Some(30.0));
        assert_eq!(data.avg("Count"), Some(21.0));
    }

    #[test]
    fn test_typed_column_lookup() {
        let data = sample();
        assert_eq!(data.get_column_typed(0, ColumnType::Number).unwrap().name, "Revenue");
        assert_eq!(data.get_column_typed(1, ColumnType::Number).unwrap().name, "Expenses");
        assert_eq!(data.get_column_typed(0, ColumnType::String).unwrap().name, "Department");
        assert!(data.get_column_typed(0, ColumnType::Date).is_none());
    }
}
