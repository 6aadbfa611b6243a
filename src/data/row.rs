//! A single data row keyed by column name through a position map

use super::value::Value;
use std::collections::HashMap;

/// Column addressing: by label or by position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKey<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for ColumnKey<'a> {
    fn from(name: &'a str) -> Self {
        ColumnKey::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnKey<'a> {
    fn from(name: &'a String) -> Self {
        ColumnKey::Name(name.as_str())
    }
}

impl From<usize> for ColumnKey<'_> {
    fn from(index: usize) -> Self {
        ColumnKey::Index(index)
    }
}

/// Ordered cell values plus a name -> position map kept in lock-step
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    values: Vec<Option<Value>>,
    cols_map: HashMap<String, usize>,
}

impl Row {
    /// Build a row; cells beyond the end of `data` are simply not mapped
    pub fn new(data: Vec<Option<Value>>, columns: &[String]) -> Self {
        let mut row = Row::default();
        for (i, (value, column)) in data.into_iter().zip(columns.iter()).enumerate() {
            row.values.push(value);
            row.cols_map.insert(column.clone(), i);
        }
        row
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn index_of(&self, column: ColumnKey<'_>) -> Option<usize> {
        match column {
            ColumnKey::Name(name) => self.cols_map.get(name).copied(),
            ColumnKey::Index(i) if i < self.values.len() => Some(i),
            ColumnKey::Index(_) => None,
        }
    }

    fn name_at(&self, index: usize) -> Option<String> {
        self.cols_map
            .iter()
            .find(|(_, &i)| i == index)
            .map(|(name, _)| name.clone())
    }

    pub fn get<'a>(&self, column: impl Into<ColumnKey<'a>>) -> Option<&Value> {
        self.index_of(column.into())
            .and_then(|i| self.values.get(i))
            .and_then(|v| v.as_ref())
    }

    pub fn set<'a>(&mut self, column: impl Into<ColumnKey<'a>>, value: Option<Value>) {
        if let Some(i) = self.index_of(column.into()) {
            self.values[i] = value;
        }
    }

    /// Remove a cell, shifting the positions of every later column down by one
    pub fn delete<'a>(&mut self, column: impl Into<ColumnKey<'a>>) {
        let Some(index) = self.index_of(column.into()) else {
            return;
        };
        let name = self.name_at(index);
        self.values.remove(index);
        for position in self.cols_map.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }
        if let Some(name) = name {
            self.cols_map.remove(&name);
        }
    }

    pub fn rename_column<'a>(&mut self, column: impl Into<ColumnKey<'a>>, name: &str) {
        let Some(index) = self.index_of(column.into()) else {
            return;
        };
        if let Some(old) = self.name_at(index) {
            self.cols_map.remove(&old);
        }
        self.cols_map.insert(name.to_string(), index);
    }
}
