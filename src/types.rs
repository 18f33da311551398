// Shared value types: data records and the callbacks carried through options

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A single data row: ordered field name -> primitive value
pub type Record = Map<String, Value>;

/// Style properties returned by style callbacks (fill, stroke, lineWidth, ...)
pub type StyleProps = Map<String, Value>;

/// Display pair produced by a tooltip formatter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipItem {
    pub name: String,
    pub value: String,
}

macro_rules! callback_type {
    ($(#[$meta:meta])* $name:ident, $arg:ty => $ret:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Arc<dyn Fn($arg) -> $ret + Send + Sync>);

        impl $name {
            pub fn new<F>(f: F) -> Self
            where
                F: Fn($arg) -> $ret + Send + Sync + 'static,
            {
                Self(Arc::new(f))
            }

            /// Invoked by the rendering engine only
            pub fn call(&self, arg: $arg) -> $ret {
                (self.0)(arg)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(..)"))
            }
        }

        impl From<$name> for Callback {
            fn from(cb: $name) -> Self {
                Callback::$name(cb)
            }
        }
    };
}

callback_type!(
    /// Per-record style callback (`areaStyle`, `lineStyle`, `pieStyle`, `<geom>.style`)
    StyleFn, &Record => StyleProps
);
callback_type!(
    /// Per-record visual attribute callback (`color`, `<geom>.shape`, `<geom>.size`)
    AttrFn, &Record => Value
);
callback_type!(
    /// Tooltip formatter (`tooltip.formatter`)
    TooltipFn, &Record => TooltipItem
);
callback_type!(
    /// Label config callback (`label.callback`)
    LabelFn, &Record => Map<String, Value>
);
callback_type!(
    /// Label text callback (`label.formatter` / `label.content`)
    ContentFn, &Record => String
);
callback_type!(
    /// Scale value formatter (`meta.<field>.formatter`)
    FormatFn, &Value => String
);

/// Any callback that can be registered on an options path
#[derive(Debug, Clone)]
#[allow(clippy::enum_variant_names)]
pub enum Callback {
    StyleFn(StyleFn),
    AttrFn(AttrFn),
    TooltipFn(TooltipFn),
    LabelFn(LabelFn),
    ContentFn(ContentFn),
    FormatFn(FormatFn),
}

impl Callback {
    pub fn as_style(&self) -> Option<&StyleFn> {
        match self {
            Callback::StyleFn(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_attr(&self) -> Option<&AttrFn> {
        match self {
            Callback::AttrFn(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_tooltip(&self) -> Option<&TooltipFn> {
        match self {
            Callback::TooltipFn(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&LabelFn> {
        match self {
            Callback::LabelFn(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_content(&self) -> Option<&ContentFn> {
        match self {
            Callback::ContentFn(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_format(&self) -> Option<&FormatFn> {
        match self {
            Callback::FormatFn(f) => Some(f),
            _ => None,
        }
    }

    /// Short kind name, used when serializing a registered callback
    pub fn kind(&self) -> &'static str {
        match self {
            Callback::StyleFn(_) => "style",
            Callback::AttrFn(_) => "attr",
            Callback::TooltipFn(_) => "tooltip",
            Callback::LabelFn(_) => "label",
            Callback::ContentFn(_) => "content",
            Callback::FormatFn(_) => "format",
        }
    }
}

/// Render a record value the way a display string would show it
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// JS-style truthiness for option values
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
