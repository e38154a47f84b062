//! Paths used by the exported macros. Not public API.

#![doc(hidden)]

pub use alloc::boxed::Box;
pub use alloc::string::String;

#[cfg(feature = "auto_register")]
pub use crate::registry::AutoRegistration;
#[cfg(feature = "auto_register")]
pub use inventory;
