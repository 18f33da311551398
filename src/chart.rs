// Rendering engine interface consumed by the adaptor pipeline

use crate::types::{AttrFn, ContentFn, FormatFn, LabelFn, Record, StyleFn, TooltipFn};
use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Visual primitive kinds the engine can create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Area,
    Line,
    Point,
    Interval,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryKind::Area => "area",
            GeometryKind::Line => "line",
            GeometryKind::Point => "point",
            GeometryKind::Interval => "interval",
        };
        f.write_str(name)
    }
}

/// Position channel binding
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Position {
    /// `x*y` on a cartesian coordinate
    Cartesian { x: String, y: String },
    /// `1*field` on a theta coordinate; the field drives the slice angle
    Angle { field: String },
}

impl Position {
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Position::Cartesian { x, y } => vec![x.as_str(), y.as_str()],
            Position::Angle { field } => vec![field.as_str()],
        }
    }
}

/// Color / shape / size channel binding
#[derive(Debug, Clone)]
pub enum Encoding {
    /// Same value for every element: `color('#5B8FF9')`
    Constant(Value),
    /// Bound to a field, with an optional value range: `color('type', ['#a', '#b'])`
    Field { field: String, values: Option<Value> },
    /// Bound to fields through a callback evaluated per record by the engine
    Callback { fields: Vec<String>, callback: AttrFn },
}

/// Geometry style: a fixed property object or a per-record callback
#[derive(Debug, Clone)]
pub enum StyleAttr {
    Fixed(Map<String, Value>),
    Callback { fields: Vec<String>, callback: StyleFn },
}

/// Geometry-level tooltip binding
#[derive(Debug, Clone)]
pub enum GeometryTooltip {
    Disabled,
    Fields {
        fields: Vec<String>,
        formatter: Option<TooltipFn>,
    },
}

/// Label attached to a geometry
#[derive(Debug, Clone, Default)]
pub struct LabelDescriptor {
    pub fields: Vec<String>,
    pub callback: Option<LabelFn>,
    pub content: Option<ContentFn>,
    pub cfg: Map<String, Value>,
}

/// Stacking and other position adjustments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustKind {
    Stack,
    Dodge,
}

/// Per-field scale configuration passed to `Chart::scale`
#[derive(Debug, Clone, Default)]
pub struct ScaleDef {
    pub cfg: Map<String, Value>,
    pub formatter: Option<FormatFn>,
}

/// Coordinate system for the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Coordinate {
    Rect,
    Theta {
        #[serde(skip_serializing_if = "Option::is_none")]
        radius: Option<f64>,
        #[serde(rename = "innerRadius", skip_serializing_if = "Option::is_none")]
        inner_radius: Option<f64>,
    },
}

/// Legend instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Legend {
    Disabled,
    Field { field: String, cfg: Map<String, Value> },
}

/// A geometry handle owned by the chart
pub trait Geometry {
    fn kind(&self) -> GeometryKind;
    fn position(&mut self, position: Position);
    fn color(&mut self, encoding: Encoding);
    fn shape(&mut self, encoding: Encoding);
    fn size(&mut self, encoding: Encoding);
    fn style(&mut self, style: StyleAttr);
    fn tooltip(&mut self, tooltip: GeometryTooltip);
    /// `None` disables labels on this geometry
    fn label(&mut self, label: Option<LabelDescriptor>);
    fn adjust(&mut self, kind: AdjustKind);
    fn animate(&mut self, cfg: Value);
}

/// The in-progress chart. Owned by the caller; borrowed by the pipeline.
pub trait Chart {
    fn data(&mut self, records: Vec<Record>);
    fn add_geometry(&mut self, kind: GeometryKind) -> &mut dyn Geometry;
    /// Registered geometries, in registration order
    fn geometries_mut(&mut self) -> Vec<&mut dyn Geometry>;
    fn scale(&mut self, scales: BTreeMap<String, ScaleDef>);
    fn coordinate(&mut self, coordinate: Coordinate);
    /// `None` hides the axis bound to `field`
    fn axis(&mut self, field: &str, cfg: Option<Map<String, Value>>);
    fn legend(&mut self, legend: Legend);
    /// `None` disables the chart tooltip
    fn tooltip(&mut self, cfg: Option<Map<String, Value>>);
    fn theme(&mut self, theme: Map<String, Value>);
    fn annotation(&mut self, cfg: Value);
    fn interaction(&mut self, name: &str, cfg: Option<Value>);
    fn remove_interaction(&mut self, name: &str);
    fn animate(&mut self, enabled: bool);
    /// Generic component option (`slider`, `scrollbar`, ...)
    fn option(&mut self, name: &str, cfg: Value);
    /// Drop all geometries and chart-level config, keeping the container
    fn clear(&mut self);
    /// Draw. The only step allowed to fail.
    fn render(&mut self) -> Result<()>;
}
