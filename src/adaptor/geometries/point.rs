use super::area::cartesian_options;
use super::base::geometry;
use crate::chart::GeometryKind;
use crate::pipeline::Params;

/// Point markers from `options.point`; nothing when that mapping is absent.
/// `shapeField` and `sizeField` bind the marker shape and size.
pub fn point(params: Params<'_>) -> Params<'_> {
    let Some(mut cfg) = cartesian_options(&params, GeometryKind::Point, "point") else {
        return params;
    };
    cfg.shape_field = params.options.field("shapeField").map(str::to_string);
    cfg.size_field = params.options.field("sizeField").map(str::to_string);
    geometry(params, &cfg)
}
