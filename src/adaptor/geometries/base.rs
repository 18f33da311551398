// Generic geometry builder shared by every visual primitive

use crate::chart::{Encoding, GeometryKind, GeometryTooltip, Position, StyleAttr};
use crate::options::{PlotOptions, Toggle};
use crate::pipeline::Params;
use crate::types::{AttrFn, StyleFn};
use serde_json::{Map, Value};

/// Value or callback for a color / shape / size channel
#[derive(Debug, Clone)]
pub enum AttrSource {
    Value(Value),
    Callback(AttrFn),
}

/// Fixed style object or per-record style callback
#[derive(Debug, Clone)]
pub enum StyleSource {
    Fixed(Map<String, Value>),
    Callback(StyleFn),
}

/// Visual mapping for one geometry, read from the options key of that geometry
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    pub color: Option<AttrSource>,
    pub shape: Option<AttrSource>,
    pub size: Option<AttrSource>,
    pub style: Option<StyleSource>,
}

impl Mapping {
    /// Mapping stored at `key`; `None` when unset or disabled
    pub fn from_options(options: &PlotOptions, key: &str) -> Option<Mapping> {
        let cfg = match options.toggle(key) {
            Toggle::On(cfg) => cfg,
            Toggle::Off => return None,
            Toggle::Unset if options.callbacks_under(key).is_empty() => return None,
            Toggle::Unset => Map::new(),
        };
        let callbacks = options.callbacks_under(key);

        let attr = |name: &str| -> Option<AttrSource> {
            if let Some(cb) = callbacks.get(name).and_then(|c| c.as_attr()) {
                return Some(AttrSource::Callback(cb.clone()));
            }
            match cfg.get(name) {
                None | Some(Value::Null) => None,
                Some(v) => Some(AttrSource::Value(v.clone())),
            }
        };

        let style = match callbacks.get("style").and_then(|c| c.as_style()) {
            Some(cb) => Some(StyleSource::Callback(cb.clone())),
            None => cfg
                .get("style")
                .and_then(Value::as_object)
                .map(|s| StyleSource::Fixed(s.clone())),
        };

        Some(Mapping {
            color: attr("color"),
            shape: attr("shape"),
            size: attr("size"),
            style,
        })
    }
}

/// Everything the generic builder needs to emit one geometry
#[derive(Debug, Clone)]
pub struct GeometryOptions {
    pub kind: GeometryKind,
    pub position: Position,
    pub color_field: Option<String>,
    pub shape_field: Option<String>,
    pub size_field: Option<String>,
    pub tooltip: GeometryTooltip,
    /// `None` means the geometry is not wanted
    pub mapping: Option<Mapping>,
}

impl GeometryOptions {
    /// Fields a callback may read: position plus any bound channel fields
    pub fn mapping_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = self.position.fields().into_iter().map(str::to_string).collect();
        for field in [&self.color_field, &self.shape_field, &self.size_field]
            .into_iter()
            .flatten()
        {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }
        fields
    }
}

/// Tooltip binding for a geometry: disabled when the chart tooltip is off,
/// otherwise `tooltip.fields` (or `default_fields`) plus any registered
/// `tooltip.formatter`.
pub fn tooltip_mapping(options: &PlotOptions, default_fields: &[Option<&str>]) -> GeometryTooltip {
    if options.toggle("tooltip").is_off() {
        return GeometryTooltip::Disabled;
    }
    let fields = match options.get_path("tooltip.fields").and_then(Value::as_array) {
        Some(fields) => fields
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        None => default_fields.iter().flatten().map(|f| f.to_string()).collect(),
    };
    let formatter = options
        .callback("tooltip.formatter")
        .and_then(|c| c.as_tooltip())
        .cloned();
    GeometryTooltip::Fields { fields, formatter }
}

/// Build the channel encoding for one attribute
fn encoding(source: Option<&AttrSource>, field: Option<&str>, fallback_fields: &[String]) -> Option<Encoding> {
    match (source, field) {
        (Some(AttrSource::Callback(cb)), _) => Some(Encoding::Callback {
            fields: field
                .map(|f| vec![f.to_string()])
                .unwrap_or_else(|| fallback_fields.to_vec()),
            callback: cb.clone(),
        }),
        (Some(AttrSource::Value(v)), Some(f)) => Some(Encoding::Field {
            field: f.to_string(),
            values: Some(v.clone()),
        }),
        // A palette without a field has nothing to map over
        (Some(AttrSource::Value(Value::Array(_))), None) => None,
        (Some(AttrSource::Value(v)), None) => Some(Encoding::Constant(v.clone())),
        (None, Some(f)) => Some(Encoding::Field {
            field: f.to_string(),
            values: None,
        }),
        (None, None) => None,
    }
}

/// Emit exactly one geometry when a mapping is present, nothing otherwise
pub fn geometry<'a>(params: Params<'a>, cfg: &GeometryOptions) -> Params<'a> {
    let Some(mapping) = &cfg.mapping else {
        return params;
    };
    let fields = cfg.mapping_fields();

    let geometry = params.chart.add_geometry(cfg.kind);
    geometry.position(cfg.position.clone());

    if let Some(color) = encoding(mapping.color.as_ref(), cfg.color_field.as_deref(), &fields) {
        geometry.color(color);
    }
    if let Some(shape) = encoding(mapping.shape.as_ref(), cfg.shape_field.as_deref(), &fields) {
        geometry.shape(shape);
    }
    if let Some(size) = encoding(mapping.size.as_ref(), cfg.size_field.as_deref(), &fields) {
        geometry.size(size);
    }

    match &mapping.style {
        Some(StyleSource::Fixed(style)) => geometry.style(StyleAttr::Fixed(style.clone())),
        Some(StyleSource::Callback(cb)) => geometry.style(StyleAttr::Callback {
            fields: fields.clone(),
            callback: cb.clone(),
        }),
        None => {}
    }

    match &cfg.tooltip {
        GeometryTooltip::Fields { fields, formatter: None } if fields.is_empty() => {}
        tooltip => geometry.tooltip(tooltip.clone()),
    }

    params
}
