// Small helpers shared by the adaptor stages

use crate::chart::{Chart, Geometry, GeometryKind};
use crate::types::Record;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{json, Map, Value};

/// First registered geometry of `kind`
pub fn find_geometry(chart: &mut dyn Chart, kind: GeometryKind) -> Option<&mut dyn Geometry> {
    chart.geometries_mut().into_iter().find(|g| g.kind() == kind)
}

/// Copy the listed keys that are present in `source`
pub fn pick(source: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|key| source.get(*key).map(|v| (key.to_string(), v.clone())))
        .collect()
}

/// Label config normalization: a `formatter` becomes the `content` unless
/// content is already given.
pub fn transform_label(cfg: &Map<String, Value>) -> Map<String, Value> {
    let mut label = cfg.clone();
    if !label.contains_key("content") {
        if let Some(formatter) = label.remove("formatter") {
            label.insert("content".to_string(), formatter);
        }
    }
    label
}

/// Fixed-point text with `digits` decimals. Halfway cases of the exact binary
/// value round away from zero, so `0.125` gives `0.13`.
pub fn to_fixed(value: f64, digits: u32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    // -0 prints as 0
    let value = if value == 0.0 { 0.0 } else { value };
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let rounded = exact.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", digits as usize, rounded)
        }
        None => format!("{:.*}", digits as usize, value),
    }
}

/// Numeric reading of a record value: `null`, `false` and blank strings are
/// `0`, `true` is `1`, numeric strings parse, anything else is NaN.
pub fn number_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) if s.trim().is_empty() => 0.0,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        Some(Value::Array(_)) | Some(Value::Object(_)) | None => f64::NAN,
    }
}

/// Pin the y scale at zero when all values sit on one side of it
pub fn adjust_y_meta_by_zero(data: &[Record], field: &str) -> Map<String, Value> {
    let values: Vec<f64> = data
        .iter()
        .filter_map(|r| r.get(field).and_then(Value::as_f64))
        .collect();
    let mut meta = Map::new();
    if values.is_empty() {
        return meta;
    }
    if values.iter().all(|v| *v >= 0.0) {
        meta.insert("min".to_string(), json!(0));
    } else if values.iter().all(|v| *v <= 0.0) {
        meta.insert("max".to_string(), json!(0));
    }
    meta
}
