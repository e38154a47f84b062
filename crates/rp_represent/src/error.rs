use alloc::borrow::Cow;
use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// An error raised while rendering or applying a document.
///
/// Errors are raised at the point of failure and nothing is rolled back: a
/// failed apply leaves the properties bound before the failing one assigned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RepresentError {
    /// A declared type or representer name is not registered.
    #[error("cannot resolve `{name}`: no type or representer registered under that name")]
    TypeResolution { name: String },

    /// A value does not support the capability a binding needs.
    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
    },

    /// The configured naming strategy has nothing callable behind it.
    #[error("naming strategy `{name}` is not callable")]
    InvalidStrategy { name: String },

    /// The model has no property with this name.
    #[error("`{type_name}` has no property `{property}`")]
    UnknownProperty { type_name: String, property: String },

    /// A typed property declares a representer but no type to construct.
    #[error("property `{property}` declares no type to instantiate")]
    NotInstantiable { property: String },
}

impl RepresentError {
    #[inline]
    pub(crate) fn mismatch(
        expected: impl Into<Cow<'static, str>>,
        found: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
