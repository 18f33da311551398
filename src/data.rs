use crate::types::Record;
use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use std::io::Read;

/// Read CSV with a header row into records. Numeric cells become numbers,
/// empty cells become `null`, everything else stays a string.
pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("Failed to read CSV row {}", index + 1))?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.to_string(), cell_value(cell)))
            .collect();
        records.push(record);
    }
    Ok(records)
}

fn cell_value(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = cell.parse::<i64>() {
        return json!(int);
    }
    match cell.parse::<f64>() {
        Ok(float) if float.is_finite() => json!(float),
        _ => Value::String(cell.to_string()),
    }
}

/// Records from a JSON array of objects
pub fn records_from_json(value: &Value) -> Result<Vec<Record>> {
    let array = value
        .as_array()
        .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

    array
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object()
                .cloned()
                .ok_or_else(|| anyhow!("Item {} in data array is not an object", index))
        })
        .collect()
}
