//! End-to-end tests: data message in, updated template out

use dynsvg_wasm::controller::{ControllerOptions, DynamicSvg};
use dynsvg_wasm::data::{Data, Locale, VaMessage};
use dynsvg_wasm::dynamics::normalize;
use dynsvg_wasm::parse::{data_stats, syntax};

const TEMPLATE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 200">
  <path id="track" d="M0 150 H400" fill="none" stroke="#ccc"/>
  <text id="title" x="10" y="20">{{Department}}</text>
  <text id="revenue" x="10" y="40">{{Revenue}}</text>
  <text id="revenue-short" x="10" y="60">{{Revenue|c:true}}</text>
  <text id="header" x="10" y="80">{{#0|name}}</text>
  <rect id="bar {{sy:Expenses,o:0_1}}" x="100" y="100" width="20" height="50"/>
  <circle id="marker {{p:Expenses,g:track,f:Expenses}}" cx="0" cy="150" r="5"/>
</svg>"##;

fn message(expenses_label: &str) -> VaMessage {
    let json = format!(
        r#"{{
        "version": "1", "resultName": "dd40", "rowCount": 1, "availableRowCount": 1,
        "data": [["Technology", 180435, 150]],
        "columns": [
            {{"name": "bi1", "label": "Department", "type": "string"}},
            {{"name": "bi2", "label": "Revenue", "type": "number",
              "format": {{"name": "COMMA", "width": 12, "precision": 0, "formatString": "COMMA12."}}}},
            {{"name": "bi3", "label": "{}", "type": "number",
              "format": {{"name": "COMMA", "width": 12, "precision": 0, "formatString": "COMMA12."}}}}
        ]
    }}"#,
        expenses_label
    );
    VaMessage::from_json(&json).unwrap()
}

fn loaded() -> DynamicSvg {
    let mut ctl = DynamicSvg::new(ControllerOptions::default());
    ctl.load_template(TEMPLATE).unwrap();
    ctl
}

fn text_of(ctl: &DynamicSvg, id: &str) -> String {
    let doc = ctl.document().unwrap();
    let node = doc
        .descendants(doc.root())
        .into_iter()
        .find(|&n| doc.attr(n, "id") == Some(id))
        .unwrap();
    doc.text_content(node)
}

#[test]
fn test_revenue_renders_grouped_integer() {
    let mut ctl = loaded();
    ctl.on_data_received(&message("Expenses {{0..300}}"));
    assert_eq!(text_of(&ctl, "title"), "Technology");
    assert_eq!(text_of(&ctl, "revenue"), "180,435");
}

#[test]
fn test_compact_tag_uses_compact_formatter() {
    let mut ctl = loaded();
    ctl.on_data_received(&message("Expenses {{0..300}}"));
    assert_eq!(text_of(&ctl, "revenue-short"), "180K");
    assert_eq!(text_of(&ctl, "header"), "Revenue");
}

#[test]
fn test_range_label_pins_stats() {
    let mut data = Data::from_va(&message("Expenses {{0..300}}"), &Locale::default());
    data_stats(&mut data);
    assert_eq!(data.cols(), vec!["Department", "Revenue", "Expenses"]);
    let stats = data.stats("Expenses").unwrap();
    assert_eq!((stats.min, stats.max), (0.0, 300.0));
    assert!(stats.manual);
    assert_eq!(normalize(&data, "Expenses"), Some(0.5));

    let mut ctl = loaded();
    ctl.on_data_received(&message("Expenses {{0..300}}"));
    let markup = ctl.markup().unwrap();
    assert!(markup.contains("scaleY(0.5)"));
    assert!(markup.contains("transform-origin: 100px 150px;"));
    assert!(markup.contains("fill: #800000;"));
}

#[test]
fn test_stats_carrier_is_dropped() {
    let json = r#"{
        "data": [[150, 20], [250, 10]],
        "columns": [
            {"label": "Expenses", "type": "number"},
            {"label": "Expenses {{min}}", "type": "number"}
        ]
    }"#;
    let mut data = Data::from_va(&VaMessage::from_json(json).unwrap(), &Locale::default());
    assert_eq!(data.min("Expenses {{min}}"), Some(10.0));
    data_stats(&mut data);
    assert_eq!(data.cols(), vec!["Expenses"]);
    assert_eq!(data.min("Expenses"), Some(10.0));
    assert_eq!(data.max("Expenses"), Some(250.0));
    assert_eq!(data.row(0).and_then(|r| r.get("Expenses {{min}}")), None);
}

#[test]
fn test_guide_motion_is_eased() {
    let mut ctl = loaded();
    ctl.on_data_received(&message("Expenses {{0..300}}"));
    assert!(ctl.tick(1000.0));
    assert!(ctl.tick(1500.0));
    assert!(!ctl.tick(2000.0));
    // Halfway along the track, minus the marker's top-left pivot (-5, 145)
    assert!(ctl.markup().unwrap().contains("transform: translate(205px,5px);"));

    // A later update starts from where the marker is now
    ctl.on_data_received(&message("Expenses {{0..150}}"));
    assert!(ctl.tick(3000.0));
    assert!(!ctl.tick(4000.0));
    assert!(ctl.markup().unwrap().contains("transform: translate(405px,5px);"));
}

#[test]
fn test_reparsing_a_bare_name_is_a_noop() {
    for text in ["Revenue", "{{Revenue}}", "x {{Revenue|c:true}}"] {
        let name = syntax(text).unwrap().name;
        let again = syntax(&name).unwrap();
        assert_eq!(again.name, name);
        assert!(again.opts.is_empty());
    }
}
