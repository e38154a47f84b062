//! Document formats.
//!
//! A [`Format`] knows how one kind of document stores a property: where the
//! key lives, how a nested document becomes a fragment and back, and how
//! the whole document is wrapped. Bindings are written once against this
//! trait and work for every format.
//!
//! - [`HashFormat`]: associative documents, [`Map`](rp_document::Map) at every level.
//! - [`XmlFormat`]: markup documents, [`Element`](rp_document::Element) at every level.

use core::fmt;

use rp_document::Value;

use crate::{Definition, Lookup, RepresentError, Representer};

// -----------------------------------------------------------------------------
// Modules

mod hash;
mod xml;

// -----------------------------------------------------------------------------
// Exports

pub use hash::HashFormat;
pub use xml::XmlFormat;

// -----------------------------------------------------------------------------
// Format

/// The document-bound half of a binding.
///
/// `read` and `write` see already converted fragments; conversion between
/// native values and fragments is the binding's job.
pub trait Format {
    type Document: fmt::Debug;

    /// An empty document to render into.
    fn new_document() -> Self::Document;

    /// Looks up the fragment stored under `key`.
    ///
    /// [`Lookup::Absent`] means the document has no such key, which is not
    /// the same as a key holding nil.
    fn read(doc: &Self::Document, key: &str, def: &Definition) -> Lookup<Value>;

    /// Stores a fragment under `key`.
    fn write(
        doc: &mut Self::Document,
        key: &str,
        def: &Definition,
        fragment: Value,
    ) -> Result<(), RepresentError>;

    /// Finishes a rendered document under the resolved wrap.
    fn wrap(doc: Self::Document, wrap: Option<&str>, representer: &Representer) -> Self::Document;

    /// Finds the document to apply under the resolved wrap.
    ///
    /// A wrap key that is missing from the document is a [`RepresentError::TypeMismatch`].
    fn unwrap<'d>(
        doc: &'d Self::Document,
        wrap: Option<&str>,
    ) -> Result<&'d Self::Document, RepresentError>;

    /// Turns a nested rendered document into a fragment of its parent.
    fn into_fragment(doc: Self::Document) -> Value;

    /// Reads a fragment as a nested document to apply.
    fn from_fragment(fragment: Value) -> Result<Self::Document, RepresentError>;
}
