use super::base::{geometry, tooltip_mapping, GeometryOptions, Mapping};
use crate::chart::{GeometryKind, Position};
use crate::pipeline::Params;

/// Area geometry from `options.area`, colored by `seriesField`
pub fn area(params: Params<'_>) -> Params<'_> {
    let Some(cfg) = cartesian_options(&params, GeometryKind::Area, "area") else {
        return params;
    };
    geometry(params, &cfg)
}

/// Shared shape of the cartesian builders: `xField*yField`, colored by
/// `seriesField`, tooltip over x, y and series.
pub(super) fn cartesian_options(params: &Params<'_>, kind: GeometryKind, key: &str) -> Option<GeometryOptions> {
    let options = &params.options;
    let x = options.field("xField")?;
    let y = options.field("yField")?;
    let series = options.field("seriesField");
    Some(GeometryOptions {
        kind,
        position: Position::Cartesian {
            x: x.to_string(),
            y: y.to_string(),
        },
        color_field: series.map(str::to_string),
        shape_field: None,
        size_field: None,
        tooltip: tooltip_mapping(options, &[Some(x), Some(y), series]),
        mapping: Mapping::from_options(options, key),
    })
}
