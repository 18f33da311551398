use super::area::cartesian_options;
use super::base::geometry;
use crate::chart::GeometryKind;
use crate::pipeline::Params;

/// Line geometry from `options.line`; nothing when that mapping is absent
pub fn line(params: Params<'_>) -> Params<'_> {
    let Some(cfg) = cartesian_options(&params, GeometryKind::Line, "line") else {
        return params;
    };
    geometry(params, &cfg)
}
