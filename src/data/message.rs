//! Inbound data message model
//!
//! The host forwards the data-driven-content message unchanged; only the
//! fields below are read.

use super::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaMessage {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub result_name: String,
    #[serde(default)]
    pub row_count: usize,
    #[serde(default)]
    pub available_row_count: usize,
    #[serde(default)]
    pub data: Vec<Vec<Option<Value>>>,
    #[serde(default)]
    pub columns: Vec<VaColumn>,
}

impl VaMessage {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.clone()).collect()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VaColumnType {
    String,
    Number,
    Date,
    #[serde(other)]
    Other,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VaColumn {
    #[serde(default)]
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub column_type: VaColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<VaFormat>,
}

/// Display format declared for a column (e.g. `COMMA12.`, `DOLLAR15.2`)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaFormat {
    pub name: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub precision: u32,
    #[serde(default)]
    pub format_string: String,
}
