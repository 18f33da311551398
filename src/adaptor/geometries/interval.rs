use super::base::{geometry, tooltip_mapping, GeometryOptions, Mapping};
use crate::chart::{GeometryKind, Position};
use crate::pipeline::Params;

/// Pie slices: an interval whose angle is driven by `angleField` and whose
/// color is bound to `colorField`, built from `options.interval`.
pub fn interval(params: Params<'_>) -> Params<'_> {
    let options = &params.options;
    let Some(angle) = options.field("angleField") else {
        return params;
    };
    let color = options.field("colorField");
    let cfg = GeometryOptions {
        kind: GeometryKind::Interval,
        position: Position::Angle {
            field: angle.to_string(),
        },
        color_field: color.map(str::to_string),
        shape_field: None,
        size_field: None,
        tooltip: tooltip_mapping(options, &[color, Some(angle)]),
        mapping: Mapping::from_options(options, "interval"),
    };
    geometry(params, &cfg)
}
