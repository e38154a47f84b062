use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use rp_document::Value;
use rp_utils::hash::{HashMap, HashSet};

use crate::Definition;
use crate::registry::Registry;

// -----------------------------------------------------------------------------
// Options

/// A per-call wrap override.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WrapOption {
    /// Render and apply without any wrap, whatever the representer declares.
    Off,
    Key(Cow<'static, str>),
}

/// Decides per property whether it takes part in a call.
pub type Filter = Arc<dyn Fn(&Definition) -> bool + Send + Sync>;

/// Per-call configuration of a render or apply pass.
///
/// # Examples
///
/// ```
/// use rp_represent::Options;
///
/// let options = Options::new()
///     .wrap("band")
///     .use_as_is("songs")
///     .value("locale", "de")
///     .filter(|def| def.name() == "name");
///
/// assert!(options.is_as_is("songs"));
/// assert_eq!(options.get("locale").and_then(|v| v.as_str()), Some("de"));
/// ```
#[derive(Clone, Default)]
pub struct Options {
    wrap: Option<WrapOption>,
    use_as_is: HashSet<String>,
    values: HashMap<String, Value>,
    filter: Option<Filter>,
}

impl Options {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nests the document under `key`, overriding the representer's wrap.
    pub fn wrap(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.wrap = Some(WrapOption::Key(key.into()));
        self
    }

    /// Disables wrapping for this call.
    pub fn unwrapped(mut self) -> Self {
        self.wrap = Some(WrapOption::Off);
        self
    }

    /// Renders the named collection as one opaque fragment.
    pub fn use_as_is(mut self, property: impl Into<String>) -> Self {
        self.use_as_is.insert(property.into());
        self
    }

    /// Passes an arbitrary value through to transforms.
    pub fn value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Definition) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    #[inline]
    pub fn wrap_option(&self) -> Option<&WrapOption> {
        self.wrap.as_ref()
    }

    #[inline]
    pub fn is_as_is(&self, property: &str) -> bool {
        self.use_as_is.contains(property)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns `true` unless the filter rejects the property.
    #[inline]
    pub fn admits(&self, def: &Definition) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter(def))
    }

    /// Options for a nested representer: never wrapped, never filtered.
    ///
    /// `use_as_is` and the passed-through values carry over.
    pub fn nested(&self) -> Self {
        Self {
            wrap: Some(WrapOption::Off),
            use_as_is: self.use_as_is.clone(),
            values: self.values.clone(),
            filter: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("wrap", &self.wrap)
            .field("use_as_is", &self.use_as_is)
            .field("values", &self.values)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Context

/// Everything a binding needs besides the value itself.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub registry: &'a Registry,
    pub options: &'a Options,
}

impl<'a> Context<'a> {
    #[inline]
    pub const fn new(registry: &'a Registry, options: &'a Options) -> Self {
        Self { registry, options }
    }
}
