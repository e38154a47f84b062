use alloc::vec::Vec;

use rp_document::Value;

use super::Binding;
use crate::format::Format;
use crate::{Context, Definition, RepresentError, Slot};

// -----------------------------------------------------------------------------
// CollectionBinding

/// Converts an ordered collection member by member.
///
/// Order and cardinality are kept exactly. Rendering first runs the
/// property's transform, if any, over the whole collection; a property
/// listed in [`Options::use_as_is`](crate::Options::use_as_is) is then
/// rendered as one opaque fragment instead.
#[derive(Clone, Copy, Debug)]
pub struct CollectionBinding<'d> {
    item: Binding<'d>,
}

impl<'d> CollectionBinding<'d> {
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
        let def = self.definition();

        let mut items = value.into_items()?;
        if let Some(transform) = def.transformer() {
            items = transform(items, ctx.options);
        }

        if ctx.options.is_as_is(def.name()) {
            return Slot::List(items).into_value();
        }

        items
            .into_iter()
            .map(|item| self.item.serialize::<F>(item, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }

    /// Builds a new collection from the fragment's members.
    pub fn deserialize_from<F: Format>(
        &self,
        fragment: Value,
        ctx: &Context<'_>,
    ) -> Result<Slot, RepresentError> {
        match fragment {
            Value::List(items) => items
                .into_iter()
                .map(|item| self.item.deserialize::<F>(item, ctx))
                .collect::<Result<Vec<_>, _>>()
                .map(Slot::List),
            other => Err(RepresentError::mismatch("enumerable", other.kind().as_str())),
        }
    }
}
