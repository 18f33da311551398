// Library exports for plotflow

pub mod adaptor;
pub mod chart;
pub mod data;
pub mod ir;
pub mod options;
pub mod parser;
pub mod pipeline;
pub mod plot;
pub mod plots;
pub mod spec_chart;
pub mod theme;
pub mod transform;
pub mod types;
pub mod utils;

pub use chart::{Chart, Geometry, GeometryKind};
pub use ir::ChartSpec;
pub use options::PlotOptions;
pub use pipeline::{flow, Flow, Params, Stage};
pub use plot::{Plot, PlotType};
pub use plots::{Area, Line, Pie};
pub use spec_chart::SpecChart;
