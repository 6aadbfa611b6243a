//! Column metadata: type, formatting and numeric statistics

use super::formats::Formatter;
use serde::{Deserialize, Serialize};

/// Declared or inferred type of a column
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Number,
    Date,
}

/// Numeric statistics for a column
///
/// `manual` marks stats that were supplied from outside (range tags, stats
/// carrier columns); automatic recomputation leaves those columns alone.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub avg: f64,
    #[serde(default)]
    pub manual: bool,
}

impl Stats {
    /// Seed values for a linear min/max scan
    pub fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            avg: 0.0,
            manual: false,
        }
    }

    /// Overwrite only the fields present in `update`
    pub fn merge(&mut self, update: &StatsUpdate) {
        if let Some(min) = update.min {
            self.min = min;
        }
        if let Some(max) = update.max {
            self.max = max;
        }
        if let Some(sum) = update.sum {
            self.sum = sum;
        }
        if let Some(avg) = update.avg {
            self.avg = avg;
        }
    }
}

/// Partial stats override accepted by `Data::set_column_stats`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatsUpdate {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sum: Option<f64>,
    pub avg: Option<f64>,
}

impl StatsUpdate {
    pub fn range(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max), ..Self::default() }
    }
}

/// Standard and compact formatters attached to a column
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnFormat {
    pub standard: Option<Formatter>,
    pub compact: Option<Formatter>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub format: ColumnFormat,
    pub stats: Option<Stats>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            format: ColumnFormat::default(),
            stats: None,
        }
    }

    pub fn has_manual_stats(&self) -> bool {
        self.stats.map(|s| s.manual).unwrap_or(false)
    }
}
