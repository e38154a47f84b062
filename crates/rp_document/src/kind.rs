use core::fmt;

/// The kind of a [`Value`](crate::Value).
///
/// Its display form is what error messages show as the "got" part,
/// e.g. `expected enumerable, got null`.
///
/// ```
/// use rp_document::{Kind, Value};
///
/// assert_eq!(Value::Nil.kind(), Kind::Nil);
/// assert_eq!(Kind::Text.to_string(), "text");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Bool,
    Int,
    Float,
    Text,
    List,
    Map,
    Node,
}

impl Kind {
    /// Returns the lowercase name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Nil => "null",
            Kind::Bool => "bool",
            Kind::Int => "integer",
            Kind::Float => "float",
            Kind::Text => "text",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Node => "node",
        }
    }
}

impl fmt::Display for Kind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
