use crate::adaptor::common::{self, adjust, animation, annotation, interaction, slider, theme, tooltip};
use crate::adaptor::geometries;
use crate::chart::GeometryKind;
use crate::pipeline::{flow, Params};
use crate::plots::line::adaptor::{axis, fixed, legend, meta, percent_tooltip};
use crate::transform::maybe_percent;

/// Data (percent-transformed when `isPercent`), the area, then the optional
/// line and point layers. All layers share the plot color and tooltip.
pub fn geometry(mut params: Params<'_>) -> Params<'_> {
    let options = &params.options;
    let x = options.field("xField").unwrap_or_default().to_string();
    let y = options.field("yField").unwrap_or_default().to_string();
    let data = maybe_percent(options.data(), options.flag("isPercent"), &y, &x, &y);
    params.chart.data(data);

    let mut derived = params.options.clone();
    percent_tooltip(&mut derived);
    let smooth = derived.flag("smooth");
    derived.resolve_shorthand(
        "area",
        Some("areaStyle"),
        fixed("shape", if smooth { "smooth" } else { "area" }),
        false,
    );
    derived.resolve_shorthand(
        "line",
        None,
        fixed("shape", if smooth { "smooth" } else { "line" }),
        true,
    );
    derived.resolve_shorthand("point", None, fixed("shape", "circle"), true);

    geometries::area(params.derive(derived.clone()));
    geometries::line(params.derive(derived.clone()));
    geometries::point(params.derive(derived));
    params
}

fn label(params: Params<'_>) -> Params<'_> {
    let fields = params.options.field("yField").map(str::to_string).into_iter().collect();
    common::label(params, GeometryKind::Area, fields)
}

/// Area chart adaptor
pub fn adaptor(params: Params<'_>) -> Params<'_> {
    flow(
        params,
        &[
            &geometry,
            &meta,
            &adjust,
            &theme,
            &axis,
            &legend,
            &tooltip,
            &label,
            &slider,
            &annotation(Vec::new()),
            &interaction,
            &animation,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{AdjustKind, Encoding, GeometryTooltip, StyleAttr};
    use crate::ir::LabelState;
    use crate::options::PlotOptions;
    use crate::spec_chart::SpecChart;
    use crate::types::StyleFn;
    use serde_json::{json, Map, Value};

    fn sales() -> Value {
        json!([
            {"year": "1991", "value": 3, "type": "a"},
            {"year": "1991", "value": 1, "type": "b"},
            {"year": "1992", "value": 0, "type": "a"},
            {"year": "1992", "value": 0, "type": "b"},
        ])
    }

    fn run(options: PlotOptions) -> SpecChart {
        let mut chart = SpecChart::new("container");
        adaptor(Params::new(&mut chart, options));
        chart
    }

    #[test]
    fn test_area_only_by_default() {
        let chart = run(PlotOptions::from_value(json!({
            "data": sales(), "xField": "year", "yField": "value",
        })));
        let kinds: Vec<GeometryKind> = chart.spec().geometries.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![GeometryKind::Area]);
    }

    #[test]
    fn test_stack_applies_to_every_layer() {
        let chart = run(PlotOptions::from_value(json!({
            "data": sales(), "xField": "year", "yField": "value", "seriesField": "type",
            "isStack": true, "line": {}, "point": {},
        })));
        let geometries = &chart.spec().geometries;
        let kinds: Vec<GeometryKind> = geometries.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![GeometryKind::Area, GeometryKind::Line, GeometryKind::Point]);
        for g in geometries {
            assert_eq!(g.adjust, vec![AdjustKind::Stack]);
        }
        for g in geometries {
            assert!(matches!(&g.tooltip, Some(GeometryTooltip::Fields { fields, .. }) if fields == &["year", "value", "type"]));
        }
    }

    #[test]
    fn test_percent_formatter_on_every_layer() {
        let chart = run(PlotOptions::from_value(json!({
            "data": sales(), "xField": "year", "yField": "value", "seriesField": "type",
            "isPercent": true, "line": {}, "point": {},
        })));
        let geometries = &chart.spec().geometries;
        assert_eq!(geometries.len(), 3);
        for g in geometries {
            assert!(matches!(&g.tooltip, Some(GeometryTooltip::Fields { formatter: Some(_), .. })));
        }
    }

    #[test]
    fn test_tooltip_off_on_every_layer() {
        let chart = run(PlotOptions::from_value(json!({
            "data": sales(), "xField": "year", "yField": "value",
            "tooltip": false, "line": {},
        })));
        for g in &chart.spec().geometries {
            assert!(matches!(g.tooltip, Some(GeometryTooltip::Disabled)));
        }
    }

    #[test]
    fn test_percent_rewrites_data() {
        let chart = run(PlotOptions::from_value(json!({
            "data": sales(), "xField": "year", "yField": "value", "seriesField": "type",
            "isPercent": true,
        })));
        let values: Vec<Value> = chart.spec().data.iter().map(|r| r["value"].clone()).collect();
        assert_eq!(values, vec![json!(0.75), json!(0.25), json!(0.0), json!(0.0)]);
        let area = chart.spec().geometry(GeometryKind::Area).unwrap();
        assert!(matches!(&area.tooltip, Some(GeometryTooltip::Fields { formatter: Some(_), .. })));
        assert_eq!(area.adjust, vec![AdjustKind::Stack]);
    }

    #[test]
    fn test_area_style_and_color_shorthand() {
        let options = PlotOptions::from_value(json!({
            "data": sales(), "xField": "year", "yField": "value", "seriesField": "type",
            "color": ["#f00", "#0f0"], "line": {},
        }))
        .with_callback("areaStyle", StyleFn::new(|_| Map::new()));
        let chart = run(options);
        let area = chart.spec().geometry(GeometryKind::Area).unwrap();
        assert!(matches!(&area.style, Some(StyleAttr::Callback { .. })));
        assert!(matches!(&area.color, Some(Encoding::Field { field, values: Some(_) }) if field == "type"));
        let line = chart.spec().geometry(GeometryKind::Line).unwrap();
        assert!(line.style.is_none());
        assert!(matches!(&line.color, Some(Encoding::Field { values: Some(_), .. })));
    }

    #[test]
    fn test_label_on_area() {
        let chart = run(PlotOptions::from_value(json!({
            "data": sales(), "xField": "year", "yField": "value", "label": false, "line": {},
        })));
        let area = chart.spec().geometry(GeometryKind::Area).unwrap();
        assert!(matches!(area.label, LabelState::Disabled));
        let line = chart.spec().geometry(GeometryKind::Line).unwrap();
        assert!(matches!(line.label, LabelState::Unset));
    }
}
