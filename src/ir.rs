use crate::chart::{
    AdjustKind, Coordinate, Encoding, GeometryKind, GeometryTooltip, LabelDescriptor, Legend,
    Position, ScaleDef, StyleAttr,
};
use crate::types::Record;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

// =============================================================================
// Chart specification captured by the recording engine
// =============================================================================

/// Everything the pipeline told the engine, in a serializable form.
/// Callbacks appear as `{"callback": <kind>, "fields": [...]}` markers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartSpec {
    pub container: String,
    pub data: Vec<Record>,
    pub geometries: Vec<GeometrySpec>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub scales: BTreeMap<String, ScaleDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub axes: BTreeMap<String, AxisSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<TooltipSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub interactions: BTreeMap<String, InteractionSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animate: Option<bool>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
    /// Chart-level instruction log, in call order
    pub instructions: Vec<Instruction>,
    pub rendered: bool,
}

impl ChartSpec {
    pub fn geometry(&self, kind: GeometryKind) -> Option<&GeometrySpec> {
        self.geometries.iter().find(|g| g.kind == kind)
    }
}

/// A single geometry and its channel bindings
#[derive(Debug, Clone, Serialize)]
pub struct GeometrySpec {
    pub kind: GeometryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Encoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Encoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Encoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleAttr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<GeometryTooltip>,
    pub label: LabelState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjust: Vec<AdjustKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Value>,
}

impl GeometrySpec {
    pub fn new(kind: GeometryKind) -> Self {
        Self {
            kind,
            position: None,
            color: None,
            shape: None,
            size: None,
            style: None,
            tooltip: None,
            label: LabelState::Unset,
            adjust: Vec::new(),
            animation: None,
        }
    }

    /// Every data field this geometry reads
    pub fn referenced_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        if let Some(position) = &self.position {
            fields.extend(position.fields().into_iter().map(str::to_string));
        }
        for encoding in [&self.color, &self.shape, &self.size].into_iter().flatten() {
            match encoding {
                Encoding::Constant(_) => {}
                Encoding::Field { field, .. } => fields.push(field.clone()),
                Encoding::Callback { fields: f, .. } => fields.extend(f.iter().cloned()),
            }
        }
        if let LabelState::Attached(label) = &self.label {
            fields.extend(label.fields.iter().cloned());
        }
        fields.dedup();
        fields
    }
}

/// Label state of a geometry
#[derive(Debug, Clone, Default)]
pub enum LabelState {
    #[default]
    Unset,
    Disabled,
    Attached(LabelDescriptor),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisSpec {
    Hidden(bool),
    Config(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TooltipSpec {
    Disabled(bool),
    Config(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionSpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg: Option<Value>,
}

/// Chart-level calls, recorded in order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum Instruction {
    Clear,
    Data { records: usize },
    AddGeometry { kind: GeometryKind },
    Scale { fields: Vec<String> },
    Coordinate,
    Axis { field: String, visible: bool },
    Legend { visible: bool },
    Tooltip { visible: bool },
    Theme,
    Annotation,
    Interaction { name: String },
    RemoveInteraction { name: String },
    Animate { enabled: bool },
    Option { name: String },
    Render,
}

// =============================================================================
// Serialization of engine types that carry callbacks
// =============================================================================

fn callback_marker(kind: &str, fields: &[String]) -> Value {
    json!({ "callback": kind, "fields": fields })
}

impl Serialize for Encoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match self {
            Encoding::Constant(v) => json!({ "value": v }),
            Encoding::Field { field, values } => match values {
                Some(values) => json!({ "field": field, "values": values }),
                None => json!({ "field": field }),
            },
            Encoding::Callback { fields, .. } => callback_marker("attr", fields),
        };
        value.serialize(serializer)
    }
}

impl Serialize for StyleAttr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StyleAttr::Fixed(cfg) => cfg.serialize(serializer),
            StyleAttr::Callback { fields, .. } => callback_marker("style", fields).serialize(serializer),
        }
    }
}

impl Serialize for GeometryTooltip {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match self {
            GeometryTooltip::Disabled => Value::Bool(false),
            GeometryTooltip::Fields { fields, formatter } => json!({
                "fields": fields,
                "formatter": formatter.is_some(),
            }),
        };
        value.serialize(serializer)
    }
}

impl Serialize for LabelState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match self {
            LabelState::Unset => Value::Null,
            LabelState::Disabled => Value::Bool(false),
            LabelState::Attached(label) => json!({
                "fields": label.fields,
                "callback": label.callback.is_some(),
                "content": label.content.is_some(),
                "cfg": label.cfg,
            }),
        };
        value.serialize(serializer)
    }
}

impl Serialize for ScaleDef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut cfg = self.cfg.clone();
        if self.formatter.is_some() {
            cfg.insert("formatter".to_string(), json!({ "callback": "format" }));
        }
        cfg.serialize(serializer)
    }
}

impl Serialize for Legend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match self {
            Legend::Disabled => Value::Bool(false),
            Legend::Field { field, cfg } => json!({ "field": field, "cfg": cfg }),
        };
        value.serialize(serializer)
    }
}
