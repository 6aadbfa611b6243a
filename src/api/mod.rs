//! Dynamic SVG WASM API
//!
//! The JavaScript-facing `DynSvg` class. The host fetches the template,
//! forwards data messages and drives animation frames; everything else
//! happens in the controller.
//!
//! # Module Structure
//!
//! - `helpers`: conversions between JavaScript values and crate types

pub mod helpers;

use crate::controller::{ControllerOptions, DynamicSvg};
use crate::data::VaMessage;
use helpers::{deserialize, now_ms, serialize, to_js_error};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct DynSvg {
    inner: DynamicSvg,
}

#[wasm_bindgen]
impl DynSvg {
    /// Create a controller from a plain object of string parameters
    /// (`svg`, `clean`, `dynamics`, `locale`); `undefined` uses defaults
    #[wasm_bindgen(constructor)]
    pub fn new(params: JsValue) -> Result<DynSvg, JsValue> {
        let params: HashMap<String, String> = if params.is_undefined() || params.is_null() {
            HashMap::new()
        } else {
            deserialize(params, "Invalid parameters")?
        };
        let options = ControllerOptions::from_params(params);
        log::info!("DynSvg created for template '{}'", options.svg);
        Ok(DynSvg { inner: DynamicSvg::new(options) })
    }

    /// Template location the host should fetch
    #[wasm_bindgen(getter, js_name = svgUrl)]
    pub fn svg_url(&self) -> String {
        self.inner.options().svg.clone()
    }

    #[wasm_bindgen(js_name = getOptions)]
    pub fn get_options(&self) -> Result<JsValue, JsValue> {
        serialize(self.inner.options(), "Failed to serialize options")
    }

    /// Load fetched template text; returns the number of dynamics found
    #[wasm_bindgen(js_name = loadTemplate)]
    pub fn load_template(&mut self, text: &str) -> Result<usize, JsValue> {
        self.inner
            .load_template(text)
            .map_err(|e| to_js_error(e, "Failed to load template"))
    }

    #[wasm_bindgen(js_name = onDataReceived)]
    pub fn on_data_received(&mut self, message: JsValue) -> Result<(), JsValue> {
        let message: VaMessage = deserialize(message, "Invalid data message")?;
        self.inner.on_data_received(&message);
        Ok(())
    }

    /// Advance animations; call from `requestAnimationFrame` while it returns true
    pub fn tick(&mut self, now: Option<f64>) -> bool {
        let now = now.unwrap_or_else(now_ms);
        self.inner.tick(now)
    }

    pub fn draw(&mut self) {
        self.inner.draw();
    }

    pub fn markup(&self) -> Result<String, JsValue> {
        self.inner
            .markup()
            .map_err(|e| to_js_error(e, "Failed to serialize template"))
    }

    #[wasm_bindgen(js_name = instanceSvg)]
    pub fn instance_svg(&self) -> String {
        self.inner.instance_svg().to_string()
    }

    #[wasm_bindgen(js_name = resultName)]
    pub fn result_name(&self) -> String {
        self.inner.result_name().to_string()
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }
}
