//! Statistics carried in column labels
//!
//! A label such as `Expenses {{0..300}}` names the column `Expenses` and pins
//! its domain to 0..300. A label such as `Revenue {{max}}` marks a carrier
//! column whose own max becomes `Revenue`'s max; the carrier is then dropped.

use super::range::{range, RangeValue};
use super::syntax::{has_directive, strip_directives, syntax};
use crate::data::{Data, StatsUpdate};

/// Rewrite column names and stats from directives found in column labels
pub fn data_stats(data: &mut Data) {
    for name in data.cols() {
        if !has_directive(&name) || data.get_column(&name).is_none() {
            continue;
        }
        let directive = match syntax(&name) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("data_stats: skipping column '{}': {}", name, e);
                continue;
            }
        };
        let base = strip_directives(&name);

        if let RangeValue::Pair(min, max) = range(&directive.name) {
            if min.is_finite() && max.is_finite() {
                apply_range(data, &name, &base, min, max);
                continue;
            }
        }

        if base == name || data.get_column(&base).is_none() {
            continue;
        }
        let carrier = data.stats(&name);
        let update = match directive.name.to_lowercase().as_str() {
            "min" => StatsUpdate { min: carrier.map(|s| s.min), ..Default::default() },
            "max" => StatsUpdate { max: carrier.map(|s| s.max), ..Default::default() },
            "sum" => StatsUpdate { sum: carrier.map(|s| s.sum), ..Default::default() },
            "avg" => StatsUpdate { avg: carrier.map(|s| s.avg), ..Default::default() },
            _ => continue,
        };
        log::debug!("data_stats: '{}' supplies {} for '{}'", name, directive.name, base);
        data.set_column_stats(&base, update);
        data.drop_column(&name);
    }
}

fn apply_range(data: &mut Data, name: &str, base: &str, min: f64, max: f64) {
    let update = StatsUpdate::range(min, max);
    if base.is_empty() {
        data.set_column_stats(name, update);
    } else if data.get_column(base).is_some() {
        data.set_column_stats(base, update);
        data.drop_column(name);
    } else {
        data.rename_column(name, base);
        data.set_column_stats(base, update);
    }
}
