use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::{Element, Kind, Map};

// -----------------------------------------------------------------------------
// Value

/// A single document fragment.
///
/// Associative documents are trees of [`Value::Map`]; markup documents are
/// trees of [`Value::Node`]. The representer engine only ever sees values that
/// a format collaborator already parsed.
///
/// # Examples
///
/// ```
/// use rp_document::{Kind, Value};
///
/// let songs = Value::from(vec![Value::from("Two Kevins"), Value::from("Wright and Rong")]);
///
/// assert_eq!(songs.kind(), Kind::List);
/// assert_eq!(songs.as_list().map(<[Value]>::len), Some(2));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    /// An unsigned integer above `i64::MAX`. Smaller ones are [`Value::Int`].
    UInt(u64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Map(Map),
    Node(Element),
}

impl Value {
    /// Returns the [`Kind`] of this value.
    pub const fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) | Value::UInt(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Text(_) => Kind::Text,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Node(_) => Kind::Node,
        }
    }

    #[inline]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns `true` for booleans, numbers and text.
    #[inline]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::UInt(_) | Value::Float(_) | Value::Text(_)
        )
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `f64`, widening integers.
    #[inline]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_node(&self) -> Option<&Element> {
        match self {
            Value::Node(v) => Some(v),
            _ => None,
        }
    }

    /// Renders a scalar as markup text.
    ///
    /// Returns `None` for nil, lists, maps and nodes.
    ///
    /// ```
    /// use rp_document::Value;
    ///
    /// assert_eq!(Value::Int(2).scalar_text().as_deref(), Some("2"));
    /// assert_eq!(Value::Nil.scalar_text(), None);
    /// ```
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Bool(v) => Some(v.to_string()),
            Value::Int(v) => Some(v.to_string()),
            Value::UInt(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Scalars print bare, everything else prints its [`Kind`] in angle brackets.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => fmt::Display::fmt(v, f),
            Value::Int(v) => fmt::Display::fmt(v, f),
            Value::UInt(v) => fmt::Display::fmt(v, f),
            Value::Float(v) => fmt::Display::fmt(v, f),
            Value::Text(v) => f.write_str(v),
            other => write!(f, "<{}>", other.kind()),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    #[inline]
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u64> for Value {
    /// Stays a [`Value::Int`] whenever the value fits.
    #[inline]
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::UInt(value),
        }
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Map> for Value {
    #[inline]
    fn from(value: Map) -> Self {
        Value::Map(value)
    }
}

impl From<Element> for Value {
    #[inline]
    fn from(value: Element) -> Self {
        Value::Node(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Nil,
        }
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::Value;
    use crate::{Kind, Map};

    #[test]
    fn kinds() {
        assert_eq!(Value::Nil.kind(), Kind::Nil);
        assert_eq!(Value::from(true).kind(), Kind::Bool);
        assert_eq!(Value::from(2).kind(), Kind::Int);
        assert_eq!(Value::from(2.5).kind(), Kind::Float);
        assert_eq!(Value::from("x").kind(), Kind::Text);
        assert_eq!(Value::from(vec![Value::Nil]).kind(), Kind::List);
        assert_eq!(Value::from(Map::new()).kind(), Kind::Map);
    }

    #[test]
    fn unsigned_stays_int_when_it_fits() {
        assert_eq!(Value::from(7u64), Value::Int(7));
        assert_eq!(Value::from(1u64 << 63), Value::UInt(1 << 63));
        assert_eq!(Value::UInt(u64::MAX).kind(), Kind::Int);
        assert_eq!(Value::UInt(u64::MAX).scalar_text().as_deref(), Some("18446744073709551615"));
    }

    #[test]
    fn option_into_nil() {
        let none: Option<&str> = None;
        assert!(Value::from(none).is_nil());
        assert_eq!(Value::from(Some("Nofx")), Value::from("Nofx"));
    }

    #[test]
    fn collect_into_list() {
        let list: Value = ["a", "b"].into_iter().collect();
        assert_eq!(list, Value::List(vec![Value::from("a"), Value::from("b")]));
    }

    #[test]
    fn display() {
        assert_eq!(alloc::format!("{}", Value::from("Fat")), "Fat");
        assert_eq!(alloc::format!("{}", Value::Nil), "<null>");
    }
}
