// Geometry builders: one per visual primitive, all on top of `base::geometry`

pub mod area;
pub mod base;
pub mod interval;
pub mod line;
pub mod point;

pub use area::area;
pub use base::{geometry, tooltip_mapping, GeometryOptions, Mapping};
pub use interval::interval;
pub use line::line;
pub use point::point;
