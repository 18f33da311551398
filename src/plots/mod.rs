// Plot types: default options plus a fixed adaptor pipeline each

pub mod area;
pub mod line;
pub mod pie;

pub use area::Area;
pub use line::Line;
pub use pie::Pie;
