//! Options normalization.
//!
//! User options are deep-assigned over per-plot defaults. Every user slot is
//! classified before it is merged:
//!
//! ```text
//! missing key        -> Slot::Absent      (default kept)
//! false / null       -> Slot::Suppressed  (default replaced entirely)
//! object             -> Slot::Present     (merged key by key)
//! array / scalar     -> Slot::Present     (replaced wholesale)
//! ```
//!
//! Callbacks live beside the JSON values, keyed by dotted option path, and
//! follow the same precedence rules.

use crate::types::{is_truthy, Callback, Record};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Objects nested deeper than this are replaced instead of merged
pub const MAX_MIX_LEVEL: usize = 5;

/// Classification of a user-supplied option slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Absent,
    Suppressed(&'a Value),
    Present(&'a Value),
}

impl<'a> Slot<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            None => Slot::Absent,
            Some(v @ (Value::Null | Value::Bool(false))) => Slot::Suppressed(v),
            Some(v) => Slot::Present(v),
        }
    }
}

/// Three-state view of a feature option such as `label`, `legend` or `xAxis`
#[derive(Debug, Clone, PartialEq)]
pub enum Toggle<T> {
    /// Key not supplied
    Unset,
    /// Falsy value (`false`, `null`, `0`, `""`)
    Off,
    /// Enabled, with its config object (empty for `true` and other scalars)
    On(T),
}

impl<T> Toggle<T> {
    pub fn is_on(&self) -> bool {
        matches!(self, Toggle::On(_))
    }

    pub fn is_off(&self) -> bool {
        matches!(self, Toggle::Off)
    }

    pub fn on(self) -> Option<T> {
        match self {
            Toggle::On(v) => Some(v),
            _ => None,
        }
    }
}

impl Toggle<Map<String, Value>> {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None => Toggle::Unset,
            Some(Value::Object(map)) => Toggle::On(map.clone()),
            Some(v) if is_truthy(v) => Toggle::On(Map::new()),
            Some(_) => Toggle::Off,
        }
    }
}

/// Deep-assign `source` into `target`.
///
/// Arrays are replaced, never concatenated. `false` and `null` overwrite
/// whatever the target held.
pub fn deep_assign(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    deep_assign_level(target, source, 0);
}

fn deep_assign_level(target: &mut Map<String, Value>, source: &Map<String, Value>, level: usize) {
    for (key, value) in source {
        match Slot::classify(Some(value)) {
            Slot::Absent => {}
            Slot::Suppressed(v) => {
                target.insert(key.clone(), v.clone());
            }
            Slot::Present(Value::Object(obj)) => {
                if level >= MAX_MIX_LEVEL {
                    target.insert(key.clone(), value.clone());
                    continue;
                }
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(inner) = slot {
                    deep_assign_level(inner, obj, level + 1);
                }
            }
            Slot::Present(v) => {
                target.insert(key.clone(), v.clone());
            }
        }
    }
}

/// Look up a dotted path (`label.style.fill`) in an options object
pub fn get_path<'a>(values: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = values.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Set a dotted path, creating (or replacing non-object) intermediate objects
pub fn set_path(values: &mut Map<String, Value>, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return,
    };
    let mut current = values;
    for segment in parents {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert(last.to_string(), value);
}

fn remove_path(values: &mut Map<String, Value>, path: &str) {
    match path.rsplit_once('.') {
        None => {
            values.remove(path);
        }
        Some((parent, last)) => {
            let mut current = values;
            for segment in parent.split('.') {
                current = match current.get_mut(segment) {
                    Some(Value::Object(map)) => map,
                    _ => return,
                };
            }
            current.remove(last);
        }
    }
}

/// True when `values` overrides whatever a callback registered at `path`
/// would have provided: a value sits at the path itself, or an ancestor was
/// replaced by a non-object.
fn shadows(values: &Map<String, Value>, path: &str) -> bool {
    let mut current = values;
    let segments: Vec<&str> = path.split('.').collect();
    for (idx, segment) in segments.iter().enumerate() {
        match current.get(*segment) {
            None => return false,
            Some(_) if idx + 1 == segments.len() => return true,
            Some(Value::Object(map)) => current = map,
            Some(_) => return true,
        }
    }
    false
}

/// Resolved plot configuration: JSON option values plus registered callbacks
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    values: Map<String, Value>,
    callbacks: BTreeMap<String, Callback>,
}

impl PlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a JSON document. Anything but an object is ignored.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(values) => Self {
                values,
                callbacks: BTreeMap::new(),
            },
            other => {
                warn!(kind = json_kind(&other), "options document is not an object, ignoring");
                Self::default()
            }
        }
    }

    /// Builder: set a dotted option path
    pub fn with(mut self, path: &str, value: Value) -> Self {
        self.set(path, value);
        self
    }

    /// Builder: register a callback on a dotted option path
    pub fn with_callback(mut self, path: &str, callback: impl Into<Callback>) -> Self {
        self.set_callback(path, callback);
        self
    }

    pub fn set(&mut self, path: &str, value: Value) {
        set_path(&mut self.values, path, value);
        self.callbacks.remove(path);
    }

    /// Register a callback. A JSON value at the same path is dropped.
    pub fn set_callback(&mut self, path: &str, callback: impl Into<Callback>) {
        remove_path(&mut self.values, path);
        self.callbacks.insert(path.to_string(), callback.into());
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn callbacks(&self) -> &BTreeMap<String, Callback> {
        &self.callbacks
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_path(&self, path: &str) -> Option<&Value> {
        get_path(&self.values, path)
    }

    pub fn callback(&self, path: &str) -> Option<&Callback> {
        self.callbacks.get(path)
    }

    /// Callbacks registered under `prefix.`, keyed by the remaining path
    pub fn callbacks_under(&self, prefix: &str) -> BTreeMap<String, Callback> {
        let lead = format!("{}.", prefix);
        self.callbacks
            .iter()
            .filter_map(|(path, cb)| path.strip_prefix(&lead).map(|rest| (rest.to_string(), cb.clone())))
            .collect()
    }

    /// String-valued option, typically a field name reference
    pub fn field(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Boolean flag; anything falsy or missing is `false`
    pub fn flag(&self, key: &str) -> bool {
        self.values.get(key).map(is_truthy).unwrap_or(false)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    pub fn toggle(&self, key: &str) -> Toggle<Map<String, Value>> {
        Toggle::from_value(self.values.get(key))
    }

    /// The `data` option as records; non-object entries are skipped
    pub fn data(&self) -> Vec<Record> {
        match self.values.get("data") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn set_data(&mut self, records: Vec<Record>) {
        self.values.insert(
            "data".to_string(),
            Value::Array(records.into_iter().map(Value::Object).collect()),
        );
    }

    /// Deep-assign `patch` into these options (values and callbacks)
    pub fn assign(&mut self, patch: &PlotOptions) {
        deep_assign(&mut self.values, &patch.values);
        self.callbacks.retain(|path, _| !shadows(&patch.values, path));
        for (path, cb) in &patch.callbacks {
            remove_path(&mut self.values, path);
            self.callbacks.insert(path.clone(), cb.clone());
        }
    }

    /// Merge user options over plot defaults
    pub fn merged(defaults: &PlotOptions, user: &PlotOptions) -> PlotOptions {
        let mut options = defaults.clone();
        options.assign(user);
        options
    }

    /// Resolve the plot-level `color` and `<style_key>` shorthands into the
    /// geometry mapping stored at `key`.
    ///
    /// Precedence, lowest first: shorthand color, `fixed` entries, shorthand
    /// style, then the user's own mapping at `key`. With `optional`, the mapping
    /// only exists when the user enabled it; otherwise `key` is set to `false`.
    pub fn resolve_shorthand(
        &mut self,
        key: &str,
        style_key: Option<&str>,
        fixed: Map<String, Value>,
        optional: bool,
    ) {
        let user = match self.toggle(key) {
            Toggle::On(cfg) => Some(cfg),
            Toggle::Off => None,
            Toggle::Unset if optional => None,
            Toggle::Unset => Some(Map::new()),
        };
        let Some(user) = user else {
            self.set(key, Value::Bool(false));
            return;
        };

        let mut mapping = Map::new();
        if let Some(color) = self.values.get("color") {
            mapping.insert("color".to_string(), color.clone());
        }
        mapping.extend(fixed);
        if let Some(style) = style_key.and_then(|k| self.values.get(k)) {
            mapping.insert("style".to_string(), style.clone());
        }
        mapping.extend(user.clone());
        self.values.insert(key.to_string(), Value::Object(mapping));

        let color_path = format!("{}.color", key);
        let color_cb = self.callbacks.get("color").cloned();
        if !user.contains_key("color") && !self.callbacks.contains_key(&color_path) {
            if let Some(cb) = color_cb {
                self.set_callback(&color_path, cb);
            }
        }
        let style_path = format!("{}.style", key);
        let style_cb = style_key.and_then(|k| self.callbacks.get(k).cloned());
        if !user.contains_key("style") && !self.callbacks.contains_key(&style_path) {
            if let Some(cb) = style_cb {
                self.set_callback(&style_path, cb);
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
