use crate::types::Record;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Percent transform: rewrite `as_field` of every record to its share of the
/// `measure` total among records with the same `group_field` value.
///
/// Records missing the group field form one ungrouped bucket. A zero total
/// yields `0`, as does a non-numeric measure. Record order is preserved.
pub fn percent(data: &[Record], measure: &str, group_field: &str, as_field: &str) -> Vec<Record> {
    let mut sums: HashMap<String, f64> = HashMap::new();
    for record in data {
        let sum = sums.entry(group_key(record, group_field)).or_insert(0.0);
        if let Some(value) = record.get(measure).and_then(Value::as_f64) {
            *sum += value;
        }
    }

    data.iter()
        .map(|record| {
            let sum = sums.get(&group_key(record, group_field)).copied().unwrap_or(0.0);
            let ratio = match record.get(measure).and_then(Value::as_f64) {
                Some(value) if sum != 0.0 => value / sum,
                _ => 0.0,
            };
            let mut out = record.clone();
            out.insert(as_field.to_string(), json!(ratio));
            out
        })
        .collect()
}

/// The data transform stage: percent when enabled, identity otherwise
pub fn maybe_percent(
    data: Vec<Record>,
    is_percent: bool,
    measure: &str,
    group_field: &str,
    as_field: &str,
) -> Vec<Record> {
    if is_percent {
        percent(&data, measure, group_field, as_field)
    } else {
        data
    }
}

/// Category key as a display string: `1`, `1.0` and `"1"` share a group
fn group_key(record: &Record, group_field: &str) -> String {
    match record.get(group_field) {
        Some(Value::Number(n)) => n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string()),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::from("\u{0}ungrouped"),
    }
}
