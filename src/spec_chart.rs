// Recording rendering engine: captures every instruction as a ChartSpec

use crate::chart::{
    AdjustKind, Chart, Coordinate, Encoding, Geometry, GeometryKind, GeometryTooltip,
    LabelDescriptor, Legend, Position, ScaleDef, StyleAttr,
};
use crate::ir::{AxisSpec, ChartSpec, GeometrySpec, Instruction, InteractionSpec, LabelState, TooltipSpec};
use crate::types::Record;
use anyhow::{bail, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::trace;

impl Geometry for GeometrySpec {
    fn kind(&self) -> GeometryKind {
        self.kind
    }

    fn position(&mut self, position: Position) {
        trace!(kind = %self.kind, ?position, "position");
        self.position = Some(position);
    }

    fn color(&mut self, encoding: Encoding) {
        self.color = Some(encoding);
    }

    fn shape(&mut self, encoding: Encoding) {
        self.shape = Some(encoding);
    }

    fn size(&mut self, encoding: Encoding) {
        self.size = Some(encoding);
    }

    fn style(&mut self, style: StyleAttr) {
        self.style = Some(style);
    }

    fn tooltip(&mut self, tooltip: GeometryTooltip) {
        self.tooltip = Some(tooltip);
    }

    fn label(&mut self, label: Option<LabelDescriptor>) {
        trace!(kind = %self.kind, enabled = label.is_some(), "label");
        self.label = match label {
            Some(descriptor) => LabelState::Attached(descriptor),
            None => LabelState::Disabled,
        };
    }

    fn adjust(&mut self, kind: AdjustKind) {
        trace!(kind = %self.kind, adjust = ?kind, "adjust");
        self.adjust.push(kind);
    }

    fn animate(&mut self, cfg: Value) {
        self.animation = Some(cfg);
    }
}

/// Chart handle that records instructions instead of drawing.
///
/// `render` performs the validation a real engine would do lazily: the
/// container must be named and every field a geometry reads must exist in the
/// data.
#[derive(Debug, Clone, Default)]
pub struct SpecChart {
    spec: ChartSpec,
}

impl SpecChart {
    pub fn new(container: &str) -> Self {
        Self {
            spec: ChartSpec {
                container: container.to_string(),
                ..ChartSpec::default()
            },
        }
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn into_spec(self) -> ChartSpec {
        self.spec
    }

    fn record(&mut self, instruction: Instruction) {
        trace!(?instruction, "chart instruction");
        self.spec.instructions.push(instruction);
    }

    fn validate(&self) -> Result<()> {
        if self.spec.container.trim().is_empty() {
            bail!("Chart container is not specified");
        }
        if self.spec.data.is_empty() {
            return Ok(());
        }
        for geometry in &self.spec.geometries {
            for field in geometry.referenced_fields() {
                if !self.spec.data.iter().any(|record| record.contains_key(&field)) {
                    bail!(
                        "Field '{}' used by {} geometry not found in data",
                        field,
                        geometry.kind
                    );
                }
            }
        }
        Ok(())
    }
}

impl Chart for SpecChart {
    fn data(&mut self, records: Vec<Record>) {
        self.record(Instruction::Data {
            records: records.len(),
        });
        self.spec.data = records;
    }

    fn add_geometry(&mut self, kind: GeometryKind) -> &mut dyn Geometry {
        self.record(Instruction::AddGeometry { kind });
        self.spec.geometries.push(GeometrySpec::new(kind));
        let idx = self.spec.geometries.len() - 1;
        &mut self.spec.geometries[idx]
    }

    fn geometries_mut(&mut self) -> Vec<&mut dyn Geometry> {
        self.spec
            .geometries
            .iter_mut()
            .map(|g| g as &mut dyn Geometry)
            .collect()
    }

    fn scale(&mut self, scales: BTreeMap<String, ScaleDef>) {
        self.record(Instruction::Scale {
            fields: scales.keys().cloned().collect(),
        });
        for (field, def) in scales {
            self.spec.scales.insert(field, def);
        }
    }

    fn coordinate(&mut self, coordinate: Coordinate) {
        self.record(Instruction::Coordinate);
        self.spec.coordinate = Some(coordinate);
    }

    fn axis(&mut self, field: &str, cfg: Option<Map<String, Value>>) {
        self.record(Instruction::Axis {
            field: field.to_string(),
            visible: cfg.is_some(),
        });
        let axis = match cfg {
            Some(cfg) => AxisSpec::Config(cfg),
            None => AxisSpec::Hidden(false),
        };
        self.spec.axes.insert(field.to_string(), axis);
    }

    fn legend(&mut self, legend: Legend) {
        self.record(Instruction::Legend {
            visible: legend != Legend::Disabled,
        });
        self.spec.legend = Some(legend);
    }

    fn tooltip(&mut self, cfg: Option<Map<String, Value>>) {
        self.record(Instruction::Tooltip {
            visible: cfg.is_some(),
        });
        self.spec.tooltip = Some(match cfg {
            Some(cfg) => TooltipSpec::Config(cfg),
            None => TooltipSpec::Disabled(false),
        });
    }

    fn theme(&mut self, theme: Map<String, Value>) {
        self.record(Instruction::Theme);
        self.spec.theme = Some(theme);
    }

    fn annotation(&mut self, cfg: Value) {
        self.record(Instruction::Annotation);
        self.spec.annotations.push(cfg);
    }

    fn interaction(&mut self, name: &str, cfg: Option<Value>) {
        self.record(Instruction::Interaction {
            name: name.to_string(),
        });
        self.spec
            .interactions
            .insert(name.to_string(), InteractionSpec { enabled: true, cfg });
    }

    fn remove_interaction(&mut self, name: &str) {
        self.record(Instruction::RemoveInteraction {
            name: name.to_string(),
        });
        self.spec.interactions.insert(
            name.to_string(),
            InteractionSpec {
                enabled: false,
                cfg: None,
            },
        );
    }

    fn animate(&mut self, enabled: bool) {
        self.record(Instruction::Animate { enabled });
        self.spec.animate = Some(enabled);
    }

    fn option(&mut self, name: &str, cfg: Value) {
        self.record(Instruction::Option {
            name: name.to_string(),
        });
        self.spec.options.insert(name.to_string(), cfg);
    }

    fn clear(&mut self) {
        let container = std::mem::take(&mut self.spec.container);
        self.spec = ChartSpec {
            container,
            ..ChartSpec::default()
        };
        self.record(Instruction::Clear);
    }

    fn render(&mut self) -> Result<()> {
        self.validate()?;
        self.record(Instruction::Render);
        self.spec.rendered = true;
        Ok(())
    }
}
