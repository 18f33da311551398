pub mod adaptor;

use crate::options::PlotOptions;
use crate::pipeline::Params;
use crate::plot::{base_defaults, PlotType};
use serde_json::json;

/// Area chart, stacked by default
pub struct Area;

impl PlotType for Area {
    const NAME: &'static str = "area";

    fn default_options() -> PlotOptions {
        let mut options = base_defaults();
        options.assign(&PlotOptions::from_value(json!({
            "tooltip": {
                "shared": true,
                "showMarkers": true,
                "showCrosshairs": true,
                "crosshairs": {"type": "x"},
            },
            "isStack": true,
            "line": {},
            "legend": {"position": "top-left"},
        })));
        options
    }

    fn adaptor(params: Params<'_>) -> Params<'_> {
        adaptor::adaptor(params)
    }
}
