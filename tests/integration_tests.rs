use plotflow::chart::{AdjustKind, Encoding, GeometryTooltip, Legend, Position, StyleAttr};
use plotflow::ir::{Instruction, LabelState};
use plotflow::types::{AttrFn, ContentFn, LabelFn, Record, StyleFn, TooltipFn, TooltipItem};
use plotflow::{Area, GeometryKind, Line, Pie, Plot, PlotOptions, SpecChart};
use serde_json::{json, Map, Value};
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn sales() -> Value {
    json!([
        {"year": "1991", "value": 3, "type": "a"},
        {"year": "1991", "value": 1, "type": "b"},
        {"year": "1992", "value": 4, "type": "a"},
        {"year": "1992", "value": 4, "type": "b"},
    ])
}

fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap()
}

/// Helper function to run the plotflow binary with arguments and stdin
fn run_plotflow(args: &[&str], stdin: &str) -> Result<Value, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_plotflow"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut input) = child.stdin.take() {
        input
            .write_all(stdin.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        serde_json::from_slice(&output.stdout).map_err(|e| format!("Output is not JSON: {}", e))
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

#[test]
fn test_pie_end_to_end() {
    let options = PlotOptions::from_value(json!({
        "data": [{"sex": "男", "sold": 0.45}, {"sex": "女", "sold": 0.55}],
        "angleField": "sold",
        "colorField": "sex",
        "label": {"type": "inner", "offset": "-50%"},
    }));
    let mut plot: Plot<Pie, _> = Plot::new("container", options, SpecChart::new("container"));
    plot.render().unwrap();

    let spec = plot.chart().spec();
    assert_eq!(spec.geometries.len(), 1);
    let slices = &spec.geometries[0];
    assert_eq!(slices.kind, GeometryKind::Interval);
    assert_eq!(slices.position, Some(Position::Angle { field: "sold".to_string() }));
    assert!(matches!(&slices.color, Some(Encoding::Field { field, .. }) if field == "sex"));
    match &slices.label {
        LabelState::Attached(label) => {
            assert_eq!(label.cfg.get("type"), Some(&json!("inner")));
            assert_eq!(label.cfg.get("offset"), Some(&json!("-50%")));
        }
        other => panic!("expected a label descriptor, got {:?}", other),
    }
    assert!(spec.geometry(GeometryKind::Line).is_none());
    assert!(spec.geometry(GeometryKind::Point).is_none());

    // Pie defaults flow through
    assert!(matches!(&slices.style, Some(StyleAttr::Fixed(s)) if s["stroke"] == json!("white")));
    assert!(spec.interactions.contains_key("element-active"));
    assert!(matches!(&spec.legend, Some(Legend::Field { cfg, .. }) if cfg["position"] == json!("right")));
    assert!(spec.rendered);
}

#[test]
fn test_label_false_disables_label() {
    let options = PlotOptions::from_value(json!({
        "data": sales(), "xField": "year", "yField": "value", "label": false,
    }));
    let mut plot: Plot<Area, _> = Plot::new("container", options, SpecChart::new("container"));
    plot.render().unwrap();
    let area = plot.chart().spec().geometry(GeometryKind::Area).unwrap();
    assert!(matches!(area.label, LabelState::Disabled));
}

#[test]
fn test_stack_applies_to_area_line_point_in_order() {
    let options = PlotOptions::from_value(json!({
        "data": sales(), "xField": "year", "yField": "value", "seriesField": "type",
        "isStack": true, "point": {},
    }));
    let mut plot: Plot<Area, _> = Plot::new("container", options, SpecChart::new("container"));
    plot.render().unwrap();

    let geometries = &plot.chart().spec().geometries;
    let kinds: Vec<GeometryKind> = geometries.iter().map(|g| g.kind).collect();
    assert_eq!(kinds, vec![GeometryKind::Area, GeometryKind::Line, GeometryKind::Point]);
    assert!(geometries.iter().all(|g| g.adjust == vec![AdjustKind::Stack]));
}

#[test]
fn test_line_plot_is_not_stacked() {
    let options = PlotOptions::from_value(json!({
        "data": sales(), "xField": "year", "yField": "value", "seriesField": "type",
    }));
    let mut plot: Plot<Line, _> = Plot::new("container", options, SpecChart::new("container"));
    plot.render().unwrap();
    let line = plot.chart().spec().geometry(GeometryKind::Line).unwrap();
    assert!(line.adjust.is_empty());
    assert!(matches!(&plot.chart().spec().legend, Some(Legend::Field { field, .. }) if field == "type"));
}

#[test]
fn test_percent_uses_custom_formatter_verbatim() {
    let options = PlotOptions::from_value(json!({
        "data": sales(), "xField": "year", "yField": "value", "seriesField": "type",
        "isPercent": true,
    }))
    .with_callback(
        "tooltip.formatter",
        TooltipFn::new(|datum: &Record| TooltipItem {
            name: "custom".to_string(),
            value: format!("{}", datum["value"]),
        }),
    );
    let mut plot: Plot<Area, _> = Plot::new("container", options, SpecChart::new("container"));
    plot.render().unwrap();

    let area = plot.chart().spec().geometry(GeometryKind::Area).unwrap();
    let formatter = match &area.tooltip {
        Some(GeometryTooltip::Fields { formatter: Some(f), .. }) => f.clone(),
        other => panic!("expected a formatter, got {:?}", other),
    };
    let item = formatter.call(&record(json!({"year": "1991", "value": 0.75, "type": "a"})));
    assert_eq!(item.name, "custom");
    assert_eq!(item.value, "0.75");
}

#[test]
fn test_percent_default_formatter() {
    let options = PlotOptions::from_value(json!({
        "data": sales(), "xField": "year", "yField": "value", "seriesField": "type",
        "isPercent": true,
    }));
    let mut plot: Plot<Area, _> = Plot::new("container", options, SpecChart::new("container"));
    plot.render().unwrap();

    let spec = plot.chart().spec();
    let values: Vec<f64> = spec.data.iter().filter_map(|r| r["value"].as_f64()).collect();
    assert_eq!(values, vec![0.75, 0.25, 0.5, 0.5]);

    let area = spec.geometry(GeometryKind::Area).unwrap();
    let Some(GeometryTooltip::Fields { formatter: Some(formatter), .. }) = &area.tooltip else {
        panic!("expected the percent formatter");
    };
    let item = formatter.call(&spec.data[1]);
    assert_eq!(item, TooltipItem { name: "b".to_string(), value: "25.00%".to_string() });
}

#[test]
fn test_percent_tooltip_rounds_halfway_up() {
    let options = PlotOptions::from_value(json!({
        "data": [
            {"year": "1991", "value": 1, "type": "a"},
            {"year": "1991", "value": 799, "type": "b"},
        ],
        "xField": "year", "yField": "value", "seriesField": "type",
        "isPercent": true,
    }));
    let mut plot: Plot<Area, _> = Plot::new("container", options, SpecChart::new("container"));
    plot.render().unwrap();

    let spec = plot.chart().spec();
    let area = spec.geometry(GeometryKind::Area).unwrap();
    let Some(GeometryTooltip::Fields { formatter: Some(formatter), .. }) = &area.tooltip else {
        panic!("expected the percent formatter");
    };
    assert_eq!(formatter.call(&spec.data[0]).value, "0.13%");
    let missing = record(json!({"year": "1991", "value": null, "type": "a"}));
    assert_eq!(formatter.call(&missing).value, "0.00%");
}

#[test]
fn test_label_given_only_as_callback() {
    for path in ["label.callback", "label.formatter"] {
        let options = PlotOptions::from_value(json!({
            "data": sales(), "xField": "year", "yField": "value",
        }));
        let options = if path == "label.callback" {
            options.with_callback(path, LabelFn::new(|_| Map::new()))
        } else {
            options.with_callback(path, ContentFn::new(|datum: &Record| format!("{}", datum["value"])))
        };
        let mut plot: Plot<Area, _> = Plot::new("container", options, SpecChart::new("container"));
        plot.render().unwrap();

        let area = plot.chart().spec().geometry(GeometryKind::Area).unwrap();
        match &area.label {
            LabelState::Attached(label) => {
                assert_eq!(label.fields, vec!["value"]);
                assert!(label.callback.is_some() || label.content.is_some());
            }
            other => panic!("{}: expected a label descriptor, got {:?}", path, other),
        }
    }
}

#[test]
fn test_callbacks_are_never_invoked() {
    let calls = Arc::new(AtomicUsize::new(0));
    let style_calls = Arc::clone(&calls);
    let color_calls = Arc::clone(&calls);
    let tooltip_calls = Arc::clone(&calls);
    let label_calls = Arc::clone(&calls);

    let options = PlotOptions::from_value(json!({
        "data": sales(), "xField": "year", "yField": "value", "seriesField": "type",
        "isPercent": true, "point": {}, "label": {"position": "middle"},
    }))
    .with_callback(
        "areaStyle",
        StyleFn::new(move |_| {
            style_calls.fetch_add(1, Ordering::SeqCst);
            Map::new()
        }),
    )
    .with_callback(
        "color",
        AttrFn::new(move |_| {
            color_calls.fetch_add(1, Ordering::SeqCst);
            json!("#000")
        }),
    )
    .with_callback(
        "tooltip.formatter",
        TooltipFn::new(move |_| {
            tooltip_calls.fetch_add(1, Ordering::SeqCst);
            TooltipItem { name: String::new(), value: String::new() }
        }),
    )
    .with_callback(
        "label.callback",
        LabelFn::new(move |_| {
            label_calls.fetch_add(1, Ordering::SeqCst);
            Map::new()
        }),
    );

    let mut plot: Plot<Area, _> = Plot::new("container", options, SpecChart::new("container"));
    plot.render().unwrap();

    let spec = plot.chart().spec();
    let area = spec.geometry(GeometryKind::Area).unwrap();
    assert!(matches!(&area.style, Some(StyleAttr::Callback { .. })));
    assert!(matches!(&area.color, Some(Encoding::Callback { .. })));
    assert!(matches!(&area.label, LabelState::Attached(l) if l.callback.is_some()));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // The serialized spec only carries markers
    let out = serde_json::to_value(spec).unwrap();
    assert_eq!(out["geometries"][0]["style"]["callback"], json!("style"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_render_reports_missing_field() {
    let options = PlotOptions::from_value(json!({
        "data": sales(), "xField": "year", "yField": "sold",
    }));
    let mut plot: Plot<Line, _> = Plot::new("container", options, SpecChart::new("container"));
    let err = plot.render().unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("sold"), "unexpected error: {}", message);
    assert!(message.contains("line"), "unexpected error: {}", message);
}

#[test]
fn test_update_and_change_data() {
    let options = PlotOptions::from_value(json!({
        "data": sales(), "xField": "year", "yField": "value",
    }));
    let mut plot: Plot<Line, _> = Plot::new("container", options, SpecChart::new("container"));
    plot.render().unwrap();

    plot.update(PlotOptions::from_value(json!({"point": {"size": 2}, "theme": "dark"})))
        .unwrap();
    let spec = plot.chart().spec();
    assert_eq!(spec.geometries.len(), 2);
    assert!(spec.theme.is_some());
    assert_eq!(spec.instructions.first(), Some(&Instruction::Clear));
    assert_eq!(spec.instructions.last(), Some(&Instruction::Render));

    plot.change_data(vec![record(json!({"year": "2000", "value": -1}))])
        .unwrap();
    let spec = plot.chart().spec();
    assert_eq!(spec.data.len(), 1);
    assert_eq!(spec.scales["value"].cfg.get("max"), Some(&json!(0)));
}

#[test]
fn test_cli_area_from_csv() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let result = run_plotflow(
        &["area", "--set", "xField=year", "--set", "yField=value", "--set", "seriesField=type"],
        &csv,
    );
    let spec = result.unwrap_or_else(|e| panic!("plotflow failed: {}", e));
    assert_eq!(spec["rendered"], json!(true));
    assert_eq!(spec["data"].as_array().map(Vec::len), Some(6));
    assert_eq!(spec["geometries"][0]["kind"], json!("area"));
    assert_eq!(spec["geometries"][1]["kind"], json!("line"));
}

#[test]
fn test_cli_pie_from_json() {
    let data = fs::read_to_string("test/pie.json").expect("Failed to read test JSON");
    let result = run_plotflow(
        &["pie", "--json", "--options", "test/pie_options.json", "--set", "legend=false"],
        &data,
    );
    let spec = result.unwrap_or_else(|e| panic!("plotflow failed: {}", e));
    assert_eq!(spec["geometries"].as_array().map(Vec::len), Some(1));
    assert_eq!(spec["geometries"][0]["kind"], json!("interval"));
    assert_eq!(spec["geometries"][0]["label"]["cfg"]["type"], json!("inner"));
    assert_eq!(spec["coordinate"]["type"], json!("theta"));
}

#[test]
fn test_cli_rejects_bad_override() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let result = run_plotflow(&["line", "--set", "not an override"], &csv);
    assert!(result.is_err());
}

#[test]
fn test_cli_missing_field_fails() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let result = run_plotflow(&["line", "--set", "xField=year", "--set", "yField=nope"], &csv);
    let err = result.unwrap_err();
    assert!(err.contains("nope"), "unexpected stderr: {}", err);
}
