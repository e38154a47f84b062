use rp_document::{Map, Value};

use super::Format;
use crate::{Definition, Lookup, RepresentError, Representer};

// -----------------------------------------------------------------------------
// HashFormat

/// Associative documents: every level is a [`Map`].
///
/// The wrap nests the whole document under one key.
pub struct HashFormat;

impl Format for HashFormat {
    type Document = Map;

    #[inline]
    fn new_document() -> Map {
        Map::new()
    }

    fn read(doc: &Map, key: &str, _: &Definition) -> Lookup<Value> {
        match doc.get(key) {
            None => Lookup::Absent,
            Some(Value::Nil) => Lookup::Nil,
            Some(value) => Lookup::Present(value.clone()),
        }
    }

    #[inline]
    fn write(doc: &mut Map, key: &str, _: &Definition, fragment: Value) -> Result<(), RepresentError> {
        doc.insert(key, fragment);
        Ok(())
    }

    fn wrap(doc: Map, wrap: Option<&str>, _: &Representer) -> Map {
        match wrap {
            Some(key) => Map::from([(key, doc)]),
            None => doc,
        }
    }

    fn unwrap<'d>(doc: &'d Map, wrap: Option<&str>) -> Result<&'d Map, RepresentError> {
        let Some(key) = wrap else {
            return Ok(doc);
        };
        match doc.get(key) {
            None => Err(RepresentError::mismatch("map", "null")),
            Some(Value::Map(inner)) => Ok(inner),
            Some(other) => Err(RepresentError::mismatch("map", other.kind().as_str())),
        }
    }

    #[inline]
    fn into_fragment(doc: Map) -> Value {
        Value::Map(doc)
    }

    fn from_fragment(fragment: Value) -> Result<Map, RepresentError> {
        match fragment {
            Value::Map(map) => Ok(map),
            other => Err(RepresentError::mismatch("map", other.kind().as_str())),
        }
    }
}
