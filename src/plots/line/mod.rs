pub mod adaptor;

use crate::options::PlotOptions;
use crate::pipeline::Params;
use crate::plot::{base_defaults, PlotType};
use serde_json::json;

/// Line chart: `xField` / `yField`, one line per `seriesField` value
pub struct Line;

impl PlotType for Line {
    const NAME: &'static str = "line";

    fn default_options() -> PlotOptions {
        let mut options = base_defaults();
        options.assign(&PlotOptions::from_value(json!({
            "tooltip": {
                "shared": true,
                "showMarkers": true,
                "showCrosshairs": true,
                "crosshairs": {"type": "x"},
            },
            "legend": {"position": "top-left"},
            "isStack": false,
        })));
        options
    }

    fn adaptor(params: Params<'_>) -> Params<'_> {
        adaptor::adaptor(params)
    }
}
