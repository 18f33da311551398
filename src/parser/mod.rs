// Override expression parser: `path.to.option=<json>`

pub mod lexer;
pub mod overrides;

// Public API re-exports
pub use overrides::{parse_override, parse_overrides, Override};
