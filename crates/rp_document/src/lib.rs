#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod element;
mod kind;
mod map;
mod serde;
mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use element::Element;
pub use kind::Kind;
pub use map::Map;
pub use value::Value;
