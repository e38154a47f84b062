#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Lets doc tests and the exported macros name the crate the same way.
extern crate self as rp_represent;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod definition;
mod error;
mod model;
mod naming;
mod options;
mod slot;

pub mod binding;
pub mod format;
pub mod registry;
pub mod representer;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use binding::{Binding, CollectionBinding, Lookup, MapBinding, PropertyBinding};
pub use definition::{Classification, Definition, RepresenterRef, Target, Transform, TypeRef};
pub use error::RepresentError;
pub use format::{Format, HashFormat, XmlFormat};
pub use model::Model;
pub use naming::{NamingFn, NamingStrategy};
pub use options::{Context, Filter, Options, WrapOption};
pub use registry::{Registry, TypeEntry};
pub use representer::{CollectionRepresenter, Representer, RepresenterBuilder, Wrap};
pub use slot::{FromSlot, IntoSlot, Slot};

/// Does nothing without the `auto_register` feature.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register {
    ($func:path) => {};
}
