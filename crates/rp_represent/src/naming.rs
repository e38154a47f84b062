use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use rp_utils::case::{lower_camel_case, snake_case};

use crate::RepresentError;
use crate::registry::Registry;

/// A callable naming strategy.
pub type NamingFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

// -----------------------------------------------------------------------------
// NamingStrategy

/// Maps a property name to its document key.
///
/// A strategy only applies to properties without an explicit `from`.
/// [`NamingStrategy::Named`] is looked up in the [`Registry`] the first time a
/// key is computed; a name with nothing callable behind it fails then with
/// [`RepresentError::InvalidStrategy`], not when the representer is built.
#[derive(Clone, Default)]
pub enum NamingStrategy {
    #[default]
    Identity,
    Callable(NamingFn),
    Named(Cow<'static, str>),
}

impl NamingStrategy {
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        NamingStrategy::Callable(Arc::new(f))
    }

    #[inline]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        NamingStrategy::Named(name.into())
    }

    /// Finds the function behind the strategy. `None` means identity.
    pub(crate) fn resolve(&self, registry: &Registry) -> Result<Option<NamingFn>, RepresentError> {
        match self {
            NamingStrategy::Identity => Ok(None),
            NamingStrategy::Callable(f) => Ok(Some(f.clone())),
            NamingStrategy::Named(name) => registry
                .strategy(name)
                .cloned()
                .map(Some)
                .ok_or_else(|| RepresentError::InvalidStrategy {
                    name: String::from(&**name),
                }),
        }
    }
}

impl fmt::Debug for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingStrategy::Identity => f.write_str("Identity"),
            NamingStrategy::Callable(_) => f.write_str("Callable(..)"),
            NamingStrategy::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Built-ins

pub(crate) fn builtin_strategies() -> [(&'static str, NamingFn); 5] {
    [
        ("identity", Arc::new(|name: &str| String::from(name))),
        ("upcase", Arc::new(|name: &str| name.to_uppercase())),
        ("downcase", Arc::new(|name: &str| name.to_lowercase())),
        ("lower_camel", Arc::new(lower_camel_case)),
        ("snake", Arc::new(snake_case)),
    ]
}
