//! Decorator stages shared by every plot type.
//!
//! Each stage handles one concern and forwards its option block to the chart
//! handle. None of them can fail; a falsy or missing option only turns the
//! feature off (or leaves it alone, see each stage).

use crate::chart::{AdjustKind, GeometryKind, LabelDescriptor, ScaleDef};
use crate::options::{deep_assign, Toggle};
use crate::pipeline::{Params, Stage};
use crate::theme::get_theme;
use crate::utils::{find_geometry, pick, transform_label};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Axis option keys that configure the underlying scale
pub const AXIS_META_CONFIG_KEYS: &[&str] = &[
    "type",
    "tickCount",
    "tickInterval",
    "min",
    "max",
    "nice",
    "minLimit",
    "maxLimit",
    "range",
    "tickMethod",
    "base",
    "exponent",
    "mask",
    "sync",
];

/// Chart tooltip: unset leaves the engine default, falsy disables it,
/// anything else is forwarded.
pub fn tooltip(params: Params<'_>) -> Params<'_> {
    match params.options.toggle("tooltip") {
        Toggle::Unset => {}
        Toggle::Off => params.chart.tooltip(None),
        Toggle::On(cfg) => params.chart.tooltip(Some(cfg)),
    }
    params
}

/// `interactions: [{type, cfg?, enable?}]`; `enable: false` removes one
pub fn interaction(params: Params<'_>) -> Params<'_> {
    let Some(Value::Array(items)) = params.options.get("interactions") else {
        return params;
    };
    for item in items {
        let Some(name) = item.get("type").and_then(Value::as_str) else {
            debug!(?item, "interaction without type skipped");
            continue;
        };
        if item.get("enable") == Some(&Value::Bool(false)) {
            params.chart.remove_interaction(name);
        } else {
            params.chart.interaction(name, item.get("cfg").cloned());
        }
    }
    params
}

/// `animation: bool` toggles the chart; an object enables it and is handed to
/// every registered geometry.
pub fn animation(params: Params<'_>) -> Params<'_> {
    match params.options.get("animation") {
        Some(Value::Bool(enabled)) => {
            params.chart.animate(*enabled);
            for geometry in params.chart.geometries_mut() {
                geometry.animate(Value::Bool(*enabled));
            }
        }
        Some(cfg @ Value::Object(_)) => {
            params.chart.animate(true);
            for geometry in params.chart.geometries_mut() {
                geometry.animate(cfg.clone());
            }
        }
        _ => params.chart.animate(true),
    }
    params
}

/// A theme name resolves through the preset registry; an object is forwarded
pub fn theme(params: Params<'_>) -> Params<'_> {
    match params.options.get("theme") {
        Some(Value::String(name)) => params.chart.theme(get_theme(name)),
        Some(Value::Object(cfg)) => params.chart.theme(cfg.clone()),
        _ => {}
    }
    params
}

/// Slider config is passed through verbatim
pub fn slider(params: Params<'_>) -> Params<'_> {
    if let Some(cfg) = params.options.get("slider") {
        params.chart.option("slider", cfg.clone());
    }
    params
}

/// Annotation stage: `options.annotations` followed by adaptor-supplied extras
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    extra: Vec<Value>,
}

/// Annotation stage with extra annotations the adaptor always adds
pub fn annotation(extra: Vec<Value>) -> Annotation {
    Annotation { extra }
}

impl Stage for Annotation {
    fn apply<'a>(&self, params: Params<'a>) -> Params<'a> {
        let user = match params.options.get("annotations") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        for cfg in user.into_iter().chain(self.extra.iter().cloned()) {
            params.chart.annotation(cfg);
        }
        params
    }

    fn name(&self) -> &str {
        "annotation"
    }
}

/// Stack every registered geometry, in registration order, when `isStack` or
/// `isPercent` is set.
pub fn adjust(params: Params<'_>) -> Params<'_> {
    if params.options.flag("isStack") || params.options.flag("isPercent") {
        for geometry in params.chart.geometries_mut() {
            geometry.adjust(AdjustKind::Stack);
        }
    }
    params
}

/// Scale config per field: `meta` defaults, then `options.meta`, then scale
/// keys picked from the axis options. `meta.<field>.formatter` callbacks are
/// attached to their field.
pub fn scale<'a>(params: Params<'a>, axes: &[(&str, Option<&Value>)], meta: Map<String, Value>) -> Params<'a> {
    let mut scales = meta;
    if let Some(Value::Object(user_meta)) = params.options.get("meta") {
        deep_assign(&mut scales, user_meta);
    }
    for (field, axis) in axes {
        if let Some(Value::Object(axis)) = axis {
            let picked = pick(axis, AXIS_META_CONFIG_KEYS);
            if picked.is_empty() {
                continue;
            }
            let mut patch = Map::new();
            patch.insert(field.to_string(), Value::Object(picked));
            deep_assign(&mut scales, &patch);
        }
    }

    let mut defs: BTreeMap<String, ScaleDef> = scales
        .into_iter()
        .filter_map(|(field, cfg)| match cfg {
            Value::Object(cfg) => Some((field, ScaleDef { cfg, formatter: None })),
            _ => None,
        })
        .collect();
    for (path, cb) in params.options.callbacks_under("meta") {
        let Some((field, "formatter")) = path.split_once('.') else {
            continue;
        };
        if let Some(formatter) = cb.as_format() {
            defs.entry(field.to_string()).or_default().formatter = Some(formatter.clone());
        }
    }

    if !defs.is_empty() {
        params.chart.scale(defs);
    }
    params
}

/// Attach (or disable) the label on the first geometry of `kind`.
///
/// Any falsy `label` option, including a missing one, disables labels. A
/// label given only through callbacks (`label.callback`, `label.formatter`)
/// counts as set. Otherwise the descriptor carries `fields`, the
/// `label.callback` callback, and the label config with `formatter` renamed
/// to `content`.
pub fn label<'a>(params: Params<'a>, kind: GeometryKind, fields: Vec<String>) -> Params<'a> {
    let toggle = match params.options.toggle("label") {
        Toggle::Unset if !params.options.callbacks_under("label").is_empty() => Toggle::On(Map::new()),
        toggle => toggle,
    };
    let descriptor = match toggle {
        Toggle::On(mut cfg) => {
            cfg.remove("callback");
            let callback = params
                .options
                .callback("label.callback")
                .and_then(|c| c.as_label())
                .cloned();
            let content = ["label.content", "label.formatter"]
                .iter()
                .find_map(|path| params.options.callback(path).and_then(|c| c.as_content()))
                .cloned();
            Some(LabelDescriptor {
                fields,
                callback,
                content,
                cfg: transform_label(&cfg),
            })
        }
        Toggle::Off | Toggle::Unset => None,
    };
    match find_geometry(params.chart, kind) {
        Some(geometry) => geometry.label(descriptor),
        None => debug!(%kind, "no geometry to attach label to"),
    }
    params
}
