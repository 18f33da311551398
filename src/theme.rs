//! Named theme presets.
//!
//! A string `theme` option is resolved here into a full theme object before
//! it reaches the engine. Unknown names fall back to `default`.

use serde_json::{json, Map, Value};
use tracing::warn;

/// Preset names known to the registry
pub const THEME_NAMES: &[&str] = &["default", "dark"];

const DEFAULT_COLORS: &[&str] = &[
    "#5B8FF9", "#5AD8A6", "#5D7092", "#F6BD16", "#E8684A", "#6DC8EC", "#9270CA", "#FF9D4D",
    "#269A99", "#FF99C3",
];

/// Look up a preset by name (case-insensitive)
pub fn get_theme(name: &str) -> Map<String, Value> {
    match name.to_ascii_lowercase().as_str() {
        "default" => default_theme(),
        "dark" => dark_theme(),
        other => {
            warn!(theme = other, "unknown theme preset, using default");
            default_theme()
        }
    }
}

fn default_theme() -> Map<String, Value> {
    theme_object(json!({
        "defaultColor": DEFAULT_COLORS[0],
        "background": "transparent",
        "colors10": DEFAULT_COLORS,
        "styleSheet": {
            "axisLineBorderColor": "#BFBFBF",
            "axisLabelFillColor": "#595959",
            "legendItemNameFillColor": "#595959",
            "labelFillColor": "#595959",
        },
    }))
}

fn dark_theme() -> Map<String, Value> {
    theme_object(json!({
        "defaultColor": DEFAULT_COLORS[0],
        "background": "#141414",
        "colors10": DEFAULT_COLORS,
        "styleSheet": {
            "axisLineBorderColor": "#404040",
            "axisLabelFillColor": "#A6A6A6",
            "legendItemNameFillColor": "#A6A6A6",
            "labelFillColor": "#A6A6A6",
        },
    }))
}

fn theme_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_presets() {
        assert_eq!(get_theme("dark")["background"], json!("#141414"));
        assert_eq!(get_theme("DARK")["background"], json!("#141414"));
        assert_eq!(get_theme("default")["background"], json!("transparent"));
    }

    #[test]
    fn test_unknown_falls_back_to_default() {
        assert_eq!(get_theme("neon"), get_theme("default"));
    }

    #[test]
    fn test_presets_carry_palette() {
        for name in THEME_NAMES {
            let theme = get_theme(name);
            assert_eq!(theme["colors10"].as_array().map(|c| c.len()), Some(10));
        }
    }
}
