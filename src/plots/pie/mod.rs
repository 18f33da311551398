pub mod adaptor;

use crate::options::PlotOptions;
use crate::pipeline::Params;
use crate::plot::{base_defaults, PlotType};
use serde_json::json;

/// Pie chart: slice angle from `angleField`, slice color from `colorField`
pub struct Pie;

impl PlotType for Pie {
    const NAME: &'static str = "pie";

    fn default_options() -> PlotOptions {
        let mut options = base_defaults();
        options.assign(&PlotOptions::from_value(json!({
            "legend": {"position": "right"},
            "tooltip": {
                "shared": false,
                "showTitle": false,
                "showMarkers": false,
            },
            "label": {"layout": {"type": "limit-in-plot"}},
            "radius": 0.9,
            "pieStyle": {"stroke": "white", "lineWidth": 1},
            "interactions": [{"type": "element-active"}],
        })));
        options
    }

    fn adaptor(params: Params<'_>) -> Params<'_> {
        adaptor::adaptor(params)
    }
}
