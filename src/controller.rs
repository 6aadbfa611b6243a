//! Template lifecycle and data updates
//!
//! `DynamicSvg` owns the loaded template, the dynamics built from it and the
//! latest data table. It starts out `Loading`; data that arrives before the
//! template is kept and applied once, as soon as the template is ready.

use crate::data::{Data, Locale, VaMessage};
use crate::dynamics::{get_dynamics, ApplyContext, Dynamic, DynamicTypes};
use crate::errors::{DynSvgError, Result, SvgError};
use crate::parse::{data_stats, elements_by_name};
use crate::svg::{clean_svg, NodeId, SvgDocument};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const INSTANCE_CLASS: &str = "__instance__";
pub const INSTANCE_ID: &str = "__instance_0001__";

/// Host supplied settings
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ControllerOptions {
    /// Template location; fetching it is up to the host
    pub svg: String,
    /// Cleanup methods, comma separated: `all`, `text`, `decode`
    pub clean: String,
    /// Dynamic families, comma separated: `all`, `text`, `transforms`, `shapes`, `styles`
    pub dynamics: String,
    pub locale: String,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            svg: "test.svg".to_string(),
            clean: "all".to_string(),
            dynamics: "all".to_string(),
            locale: "en-US".to_string(),
        }
    }
}

impl ControllerOptions {
    /// Defaults overridden by whichever known keys appear in `params`
    pub fn from_params<K, V, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Self::default();
        for (key, value) in params {
            match key.as_ref() {
                "svg" => options.svg = value.into(),
                "clean" => options.clean = value.into(),
                "dynamics" => options.dynamics = value.into(),
                "locale" => options.locale = value.into(),
                other => log::debug!("ignoring parameter '{}'", other),
            }
        }
        options
    }

    pub fn clean_methods(&self) -> Vec<&str> {
        self.clean.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
    }

    pub fn dynamic_types(&self) -> DynamicTypes {
        DynamicTypes::parse(&self.dynamics)
    }

    pub fn locale(&self) -> Locale {
        Locale::from_tag(&self.locale)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Loading,
    Ready,
}

struct Template {
    doc: SvgDocument,
    instance: NodeId,
    refs: HashMap<String, NodeId>,
    dynamics: Vec<Dynamic>,
    instance_svg: String,
}

pub struct DynamicSvg {
    options: ControllerOptions,
    locale: Locale,
    lifecycle: Lifecycle,
    template: Option<Template>,
    data: Data,
    result_name: String,
    pending: bool,
}

impl DynamicSvg {
    pub fn new(options: ControllerOptions) -> Self {
        let locale = options.locale();
        Self {
            options,
            locale,
            lifecycle: Lifecycle::Loading,
            template: None,
            data: Data::default(),
            result_name: String::new(),
            pending: false,
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn result_name(&self) -> &str {
        &self.result_name
    }

    pub fn dynamics(&self) -> &[Dynamic] {
        self.template.as_ref().map(|t| t.dynamics.as_slice()).unwrap_or(&[])
    }

    pub fn document(&self) -> Option<&SvgDocument> {
        self.template.as_ref().map(|t| &t.doc)
    }

    pub fn instance(&self) -> Option<NodeId> {
        self.template.as_ref().map(|t| t.instance)
    }

    /// Instance group body as it was right after dynamics were built
    pub fn instance_svg(&self) -> &str {
        self.template.as_ref().map(|t| t.instance_svg.as_str()).unwrap_or("")
    }

    /// Parse, clean and scan a template, replacing any previous one
    ///
    /// Returns the number of dynamics found. Data received while loading is
    /// applied before returning.
    pub fn load_template(&mut self, text: &str) -> Result<usize> {
        let mut doc = SvgDocument::parse(text.trim()).map_err(|e| {
            log::error!("failed to parse template: {}", e);
            e
        })?;
        let svg = find_svg(&doc).ok_or_else(|| {
            log::error!("template has no <svg> element");
            SvgError::MissingRoot
        })?;

        clean_svg(&mut doc, svg, &self.options.clean_methods());
        let instance = wrap_instance(&mut doc, svg);
        let refs = elements_by_name(&doc, svg);
        let dynamics = get_dynamics(&mut doc, instance, self.options.dynamic_types());
        let instance_svg = doc.inner_markup(instance)?;

        let count = dynamics.len();
        log::info!("template loaded with {} dynamics", count);
        self.template = Some(Template { doc, instance, refs, dynamics, instance_svg });
        self.lifecycle = Lifecycle::Ready;

        if std::mem::take(&mut self.pending) {
            self.apply();
        }
        Ok(count)
    }

    /// Rebuild the table from a data message and apply it once ready
    ///
    /// Updates run to completion one at a time. The exclusive borrow means a
    /// second update cannot start while another holds the controller:
    ///
    /// ```compile_fail,E0499
    /// use dynsvg_wasm::controller::{ControllerOptions, DynamicSvg};
    /// use dynsvg_wasm::data::VaMessage;
    ///
    /// let mut ctl = DynamicSvg::new(ControllerOptions::default());
    /// let message = VaMessage::from_json("{}").unwrap();
    /// let first = &mut ctl;
    /// let second = &mut ctl;
    /// first.on_data_received(&message);
    /// second.on_data_received(&message);
    /// ```
    ///
    /// Back-to-back updates are applied in arrival order:
    ///
    /// ```
    /// use dynsvg_wasm::controller::{ControllerOptions, DynamicSvg};
    /// use dynsvg_wasm::data::VaMessage;
    ///
    /// let mut ctl = DynamicSvg::new(ControllerOptions::default());
    /// ctl.load_template("<svg><text>{{Region}}</text></svg>").unwrap();
    /// for region in ["North", "South"] {
    ///     let json = format!(r#"{{"data": [["{}"]], "columns": [{{"label": "Region", "type": "string"}}]}}"#, region);
    ///     ctl.on_data_received(&VaMessage::from_json(&json).unwrap());
    /// }
    /// assert!(ctl.markup().unwrap().contains(">South</text>"));
    /// ```
    pub fn on_data_received(&mut self, message: &VaMessage) {
        log::debug!(
            "data received: {} rows, {} columns",
            message.data.len(),
            message.columns.len()
        );
        self.result_name = message.result_name.clone();
        let mut data = Data::from_va(message, &self.locale);
        data_stats(&mut data);
        self.data = data;

        match self.lifecycle {
            Lifecycle::Ready => self.apply(),
            Lifecycle::Loading => self.pending = true,
        }
    }

    /// `on_data_received` for a JSON encoded message
    pub fn on_data_json(&mut self, json: &str) -> Result<()> {
        let message = VaMessage::from_json(json).map_err(|e| DynSvgError::Message(e.to_string()))?;
        self.on_data_received(&message);
        Ok(())
    }

    /// Apply the current table to every dynamic in registration order
    pub fn apply(&mut self) {
        let Some(template) = self.template.as_mut() else {
            return;
        };
        let mut ctx = ApplyContext { doc: &mut template.doc, refs: &template.refs };
        for dynamic in template.dynamics.iter_mut() {
            dynamic.apply(&self.data, &mut ctx);
        }
    }

    /// Advance running animations to `now` (milliseconds)
    ///
    /// Returns whether any dynamic wants another frame.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(template) = self.template.as_mut() else {
            return false;
        };
        let mut ctx = ApplyContext { doc: &mut template.doc, refs: &template.refs };
        let mut more = false;
        for dynamic in template.dynamics.iter_mut() {
            more |= dynamic.tick(now, &mut ctx);
        }
        more
    }

    /// Layout change hook; the template scales with its viewBox so there is
    /// nothing to recompute
    pub fn draw(&mut self) {
        log::debug!("draw");
    }

    /// Current markup of the whole template
    pub fn markup(&self) -> Result<String> {
        match &self.template {
            Some(t) => Ok(t.doc.to_markup()?),
            None => Ok(String::new()),
        }
    }
}

fn find_svg(doc: &SvgDocument) -> Option<NodeId> {
    let root = doc.root();
    if doc.tag(root) == Some("svg") {
        Some(root)
    } else {
        doc.find_first(root, "svg")
    }
}

/// Move the template body, minus `<style>`, into the instance group
fn wrap_instance(doc: &mut SvgDocument, svg: NodeId) -> NodeId {
    let group = doc.create_element("g");
    doc.set_attr(group, "class", INSTANCE_CLASS);
    doc.set_attr(group, "id", INSTANCE_ID);
    let body: Vec<NodeId> = doc
        .element_children(svg)
        .into_iter()
        .filter(|&c| doc.tag(c) != Some("style"))
        .collect();
    for child in body {
        doc.append_child(group, child);
    }
    doc.append_child(svg, group);
    group
}
