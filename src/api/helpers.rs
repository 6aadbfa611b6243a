//! Shared helpers for the WASM API
//!
//! Conversions between JavaScript values and crate types, with failures
//! logged before they are handed back to JavaScript.

use crate::errors::DynSvgError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log::error!("{}", msg);
        JsValue::from_str(&msg)
    })
}

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log::error!("{}", msg);
        JsValue::from_str(&msg)
    })
}

// ============================================================================
// Error Conversion
// ============================================================================

/// Log a crate error and turn it into a JavaScript string
pub fn to_js_error(error: DynSvgError, error_context: &str) -> JsValue {
    let msg = format!("{}: {}", error_context, error);
    log::error!("{}", msg);
    JsValue::from_str(&msg)
}

/// Host clock in milliseconds: `performance.now()`, or `Date.now()` without a window
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}
