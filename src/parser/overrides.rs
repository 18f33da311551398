// `--set` expressions: a dotted option path, `=`, then a JSON value.
// Anything that is not valid JSON is taken as a bare string.

use super::lexer::{identifier, ws};
use crate::options::PlotOptions;
use anyhow::{anyhow, Result};
use nom::{
    character::complete::char,
    combinator::rest,
    multi::separated_list1,
    IResult,
};
use serde_json::Value;

/// A single `path=value` override
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub path: Vec<String>,
    pub value: Value,
}

impl Override {
    /// Dotted form of the path, as accepted by `PlotOptions::set`
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parse `label.offset=-10`, `legend=false`, `color=["#a","#b"]`, `xField=year`
pub fn parse_override(input: &str) -> IResult<&str, Override> {
    let (input, path) = ws(separated_list1(char('.'), identifier))(input)?;
    let (input, _) = char('=')(input)?;
    let (input, raw) = rest(input)?;
    Ok((
        input,
        Override {
            path,
            value: parse_value(raw),
        },
    ))
}

/// Fold a list of override expressions into one options patch, later
/// expressions winning.
pub fn parse_overrides<S: AsRef<str>>(exprs: &[S]) -> Result<PlotOptions> {
    let mut options = PlotOptions::new();
    for expr in exprs {
        let expr = expr.as_ref();
        let (_, parsed) =
            parse_override(expr).map_err(|e| anyhow!("Invalid override '{}': {}", expr, e))?;
        options.set(&parsed.dotted_path(), parsed.value);
    }
    Ok(options)
}
