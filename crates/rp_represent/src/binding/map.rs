use alloc::vec::Vec;

use rp_document::{Map, Value};

use super::Binding;
use crate::format::Format;
use crate::{Context, Definition, RepresentError, Slot};

// -----------------------------------------------------------------------------
// MapBinding

/// Converts a key/value map entry by entry, keeping keys and their order.
///
/// Both directions build a new mapping; the fragment handed to
/// `deserialize_from` is consumed, never updated in place.
#[derive(Clone, Copy, Debug)]
pub struct MapBinding<'d> {
    item: Binding<'d>,
}

impl<'d> MapBinding<'d> {
    #[inline]
    pub const fn new(def: &'d Definition) -> Self {
        Self {
            item: Binding::new(def),
        }
    }

    #[inline]
    pub const fn definition(&self) -> &'d Definition {
        self.item.definition()
    }

    pub fn serialize_for<F: Format>(&self, value: Slot, ctx: &Context<'_>) -> Result<Value, RepresentError> {
        if value.is_nil() {
            return Ok(Value::Nil);
        }
        let entries = value.into_entries()?;
        let mut map = Map::with_capacity(entries.len());
        for (key, item) in entries {
            map.insert(key, self.item.serialize::<F>(item, ctx)?);
        }
        Ok(Value::Map(map))
    }

    pub fn deserialize_from<F: Format>(
        &self,
        fragment: Value,
        ctx: &Context<'_>,
    ) -> Result<Slot, RepresentError> {
        let map = match fragment {
            Value::Map(map) => map,
            other => return Err(RepresentError::mismatch("map", other.kind().as_str())),
        };
        map.into_iter()
            .map(|(key, item)| self.item.deserialize::<F>(item, ctx).map(|slot| (key, slot)))
            .collect::<Result<Vec<_>, _>>()
            .map(Slot::Map)
    }
}
