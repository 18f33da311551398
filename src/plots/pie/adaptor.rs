use crate::adaptor::common::{self, animation, annotation, interaction, scale, theme, tooltip};
use crate::adaptor::geometries;
use crate::chart::{AdjustKind, Coordinate, GeometryKind, Legend};
use crate::pipeline::{flow, Params};
use crate::types::Record;
use crate::utils::find_geometry;
use serde_json::{json, Map, Value};
use tracing::warn;

/// Records whose angle value is a number or `null`; the rest cannot be drawn
fn legal_data(data: Vec<Record>, angle: &str) -> Vec<Record> {
    let total = data.len();
    let legal: Vec<Record> = data
        .into_iter()
        .filter(|record| matches!(record.get(angle), Some(Value::Number(_)) | Some(Value::Null)))
        .collect();
    if legal.len() != total {
        warn!(
            field = angle,
            dropped = total - legal.len(),
            "illegal angle values in pie data"
        );
    }
    legal
}

/// Data, then one stacked interval per slice
pub fn geometry(mut params: Params<'_>) -> Params<'_> {
    let data = match params.options.field("angleField") {
        Some(angle) => legal_data(params.options.data(), angle),
        None => params.options.data(),
    };
    params.chart.data(data);

    let mut derived = params.options.clone();
    derived.resolve_shorthand("interval", Some("pieStyle"), Map::new(), false);
    geometries::interval(params.derive(derived));

    if let Some(slices) = find_geometry(params.chart, GeometryKind::Interval) {
        slices.adjust(AdjustKind::Stack);
    }
    params
}

/// The color field is categorical
pub fn meta(params: Params<'_>) -> Params<'_> {
    let mut defaults = Map::new();
    if let Some(color) = params.options.field("colorField") {
        defaults.insert(color.to_string(), json!({"type": "cat"}));
    }
    scale(params, &[], defaults)
}

pub fn coordinate(params: Params<'_>) -> Params<'_> {
    let radius = params.options.number("radius");
    let inner_radius = params.options.number("innerRadius");
    params.chart.coordinate(Coordinate::Theta {
        radius,
        inner_radius,
    });
    params
}

/// `legend: false` removes the legend; otherwise it is bound to `colorField`
pub fn legend(params: Params<'_>) -> Params<'_> {
    match (params.options.get("legend"), params.options.field("colorField")) {
        (Some(Value::Bool(false)), _) => params.chart.legend(Legend::Disabled),
        (cfg, Some(field)) => params.chart.legend(Legend::Field {
            field: field.to_string(),
            cfg: cfg.and_then(Value::as_object).cloned().unwrap_or_default(),
        }),
        (_, None) => {}
    }
    params
}

fn label(params: Params<'_>) -> Params<'_> {
    let fields = ["angleField", "colorField"]
        .iter()
        .filter_map(|key| params.options.field(key).map(str::to_string))
        .collect();
    common::label(params, GeometryKind::Interval, fields)
}

/// Pie chart adaptor
pub fn adaptor(params: Params<'_>) -> Params<'_> {
    flow(
        params,
        &[
            &geometry,
            &meta,
            &theme,
            &coordinate,
            &legend,
            &tooltip,
            &label,
            &annotation(Vec::new()),
            &interaction,
            &animation,
        ],
    )
}
