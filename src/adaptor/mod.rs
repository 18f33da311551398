// Building blocks shared by the plot adaptors

pub mod common;
pub mod geometries;
