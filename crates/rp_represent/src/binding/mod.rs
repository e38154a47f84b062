//! Bindings connect one [`Definition`] to one document shape.
//!
//! - [`Binding`] converts a single value: identity for untyped properties,
//!   a nested representer for typed ones.
//! - [`CollectionBinding`] and [`MapBinding`] apply it member-wise.
//! - [`PropertyBinding`] picks the variant from the definition's
//!   [`Classification`] and talks to the document through a [`Format`].
//!
//! Bindings hold nothing but a reference to their definition, so they are
//! created per pass and thrown away afterwards.

use rp_document::Value;

use crate::format::Format;
use crate::{Classification, Context, Definition, RepresentError, Slot};

// -----------------------------------------------------------------------------
// Modules

mod collection;
mod element;
mod map;

// -----------------------------------------------------------------------------
// Exports

pub use collection::CollectionBinding;
pub use element::Binding;
pub use map::MapBinding;

// -----------------------------------------------------------------------------
// Lookup

/// The result of reading one key from a document.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup<T> {
    /// The document has no such key.
    Absent,
    /// The key is present and holds nil.
    Nil,
    Present(T),
}

impl<T> Lookup<T> {
    #[inline]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Absent => Lookup::Absent,
            Lookup::Nil => Lookup::Nil,
            Lookup::Present(v) => Lookup::Present(f(v)),
        }
    }
}

impl From<Value> for Lookup<Value> {
    #[inline]
    fn from(value: Value) -> Self {
        match value {
            Value::Nil => Lookup::Nil,
            value => Lookup::Present(value),
        }
    }
}

// -----------------------------------------------------------------------------
// PropertyBinding

/// A document-bound binding, chosen by classification.
#[derive(Clone, Copy, Debug)]
pub enum PropertyBinding<'d> {
    Property(Binding<'d>),
    Collection(CollectionBinding<'d>),
    Map(MapBinding<'d>),
}

impl<'d> PropertyBinding<'d> {
    pub fn for_definition(def: &'d Definition) -> Self {
        match def.classification() {
            Classification::Scalar | Classification::Object => {
                PropertyBinding::Property(Binding::new(def))
            }
            Classification::Collection => PropertyBinding::Collection(CollectionBinding::new(def)),
            Classification::Map => PropertyBinding::Map(MapBinding::new(def)),
        }
    }

    #[inline]
    pub fn definition(&self) -> &'d Definition {
        match self {
            PropertyBinding::Property(binding) => binding.definition(),
            PropertyBinding::Collection(binding) => binding.definition(),
            PropertyBinding::Map(binding) => binding.definition(),
        }
    }

    /// Reads the property from `doc` and converts it to a native value.
    ///
    /// A nil under a collection or map key still goes through conversion, and
    /// fails there as not enumerable.
    pub fn read<F: Format>(
        &self,
        doc: &F::Document,
        key: &str,
        ctx: &Context<'_>,
    ) -> Result<Lookup<Slot>, RepresentError> {
        match F::read(doc, key, self.definition()) {
            Lookup::Absent => Ok(Lookup::Absent),
            Lookup::Nil if matches!(self, PropertyBinding::Property(_)) => Ok(Lookup::Nil),
            Lookup::Nil => self.deserialize_from::<F>(Value::Nil, ctx).map(Lookup::Present),
            Lookup::Present(fragment) => self
                .deserialize_from::<F>(fragment, ctx)
                .map(Lookup::Present),
        }
    }

    /// Converts `value` and stores it in `doc`, unless it is a nil to skip.
    pub fn write<F: Format>(
        &self,
        doc: &mut F::Document,
        key: &str,
        value: Slot,
        ctx: &Context<'_>,
    ) -> Result<(), RepresentError> {
        let def = self.definition();
        if def.skip_on_nil(&value) {
            return Ok(());
        }
        let fragment = self.serialize_for::<F>(value, ctx)?;
        F::write(doc, key, def, fragment)
    }

    pub fn serialize_for<F: Format>(&self, value: Slot, ctx: &Context<'_>) -> Result<Value, RepresentError> {
        match self {
            PropertyBinding::Property(binding) => binding.serialize::<F>(value, ctx),
            PropertyBinding::Collection(binding) => binding.serialize_for::<F>(value, ctx),
            PropertyBinding::Map(binding) => binding.serialize_for::<F>(value, ctx),
        }
    }

    pub fn deserialize_from<F: Format>(
        &self,
        fragment: Value,
        ctx: &Context<'_>,
    ) -> Result<Slot, RepresentError> {
        match self {
            PropertyBinding::Property(binding) => binding.deserialize::<F>(fragment, ctx),
            PropertyBinding::Collection(binding) => binding.deserialize_from::<F>(fragment, ctx),
            PropertyBinding::Map(binding) => binding.deserialize_from::<F>(fragment, ctx),
        }
    }
}
