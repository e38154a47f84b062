use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use std::sync::OnceLock;

use crate::registry::{Registry, TypeEntry};
use crate::{Options, RepresentError, Representer, Slot};

// -----------------------------------------------------------------------------
// References

/// A nested type, either by registered name or already resolved.
#[derive(Clone)]
pub enum TypeRef {
    Name(String),
    Resolved(Arc<TypeEntry>),
}

impl From<&str> for TypeRef {
    #[inline]
    fn from(name: &str) -> Self {
        TypeRef::Name(name.to_owned())
    }
}

impl From<String> for TypeRef {
    #[inline]
    fn from(name: String) -> Self {
        TypeRef::Name(name)
    }
}

impl From<Arc<TypeEntry>> for TypeRef {
    #[inline]
    fn from(entry: Arc<TypeEntry>) -> Self {
        TypeRef::Resolved(entry)
    }
}

/// A representer attached to nested values, by registered name or directly.
#[derive(Clone)]
pub enum RepresenterRef {
    Name(String),
    Resolved(Arc<Representer>),
}

impl From<&str> for RepresenterRef {
    #[inline]
    fn from(name: &str) -> Self {
        RepresenterRef::Name(name.to_owned())
    }
}

impl From<String> for RepresenterRef {
    #[inline]
    fn from(name: String) -> Self {
        RepresenterRef::Name(name)
    }
}

impl From<Arc<Representer>> for RepresenterRef {
    #[inline]
    fn from(representer: Arc<Representer>) -> Self {
        RepresenterRef::Resolved(representer)
    }
}

impl From<Representer> for RepresenterRef {
    #[inline]
    fn from(representer: Representer) -> Self {
        RepresenterRef::Resolved(Arc::new(representer))
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Name(name) => write!(f, "{name:?}"),
            TypeRef::Resolved(entry) => write!(f, "<{}>", entry.name()),
        }
    }
}

impl fmt::Debug for RepresenterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepresenterRef::Name(name) => write!(f, "{name:?}"),
            RepresenterRef::Resolved(representer) => write!(f, "<{}>", representer.name()),
        }
    }
}

/// Strips a leading `::`, so `"::Band"` and `"Band"` name the same type.
#[inline]
pub(crate) fn normalize_name(name: &str) -> &str {
    name.strip_prefix("::").unwrap_or(name)
}

// -----------------------------------------------------------------------------
// Target

/// What a typed property converts nested values with, once resolved.
///
/// `entry` constructs new instances on apply; `representer` renders and
/// applies them. An `instance`-only property has neither, and looks the
/// representer up by the value's own type name.
#[derive(Clone, Default)]
pub struct Target {
    pub entry: Option<Arc<TypeEntry>>,
    pub representer: Option<Arc<Representer>>,
}

// -----------------------------------------------------------------------------
// Classification

/// How a property is bound, computed from its configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Scalar,
    Object,
    Collection,
    Map,
}

// -----------------------------------------------------------------------------
// Definition

/// Rewrites a whole collection before it is rendered.
pub type Transform = Arc<dyn Fn(Vec<Slot>, &Options) -> Vec<Slot> + Send + Sync>;

/// The metadata of one mapped property.
///
/// Built once while a [`Representer`] is declared and read-only afterwards,
/// except for the lazily resolved nested type, which is cached the first
/// time it is needed.
///
/// # Examples
///
/// ```
/// use rp_represent::{Classification, Definition};
///
/// let songs = Definition::collection("songs").from("songList");
///
/// assert_eq!(songs.document_key(), "songList");
/// assert_eq!(songs.classification(), Classification::Collection);
/// assert!(!songs.is_typed());
/// ```
#[derive(Clone)]
pub struct Definition {
    name: String,
    from: Option<String>,
    class: Option<TypeRef>,
    extend: Vec<RepresenterRef>,
    collection: bool,
    hash: bool,
    render_nil: bool,
    default: Option<Slot>,
    instance: bool,
    wrap: Option<String>,
    attribute: bool,
    transform: Option<Transform>,
    resolved: OnceLock<Target>,
}

impl Definition {
    /// A plain property.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: None,
            class: None,
            extend: Vec::new(),
            collection: false,
            hash: false,
            render_nil: false,
            default: None,
            instance: false,
            wrap: None,
            attribute: false,
            transform: None,
            resolved: OnceLock::new(),
        }
    }

    /// An ordered collection, defaulting to an empty one.
    pub fn collection(name: impl Into<String>) -> Self {
        let mut def = Self::new(name);
        def.collection = true;
        def.default = Some(Slot::List(Vec::new()));
        def
    }

    /// A key/value map.
    pub fn hash(name: impl Into<String>) -> Self {
        let mut def = Self::new(name);
        def.hash = true;
        def
    }

    #[inline]
    fn invalidate(&mut self) {
        self.resolved = OnceLock::new();
    }

    /// Overrides the document key.
    pub fn from(mut self, key: impl Into<String>) -> Self {
        self.from = Some(key.into());
        self
    }

    /// Declares the nested type, instantiated on apply.
    pub fn class(mut self, class: impl Into<TypeRef>) -> Self {
        self.class = Some(class.into());
        self.invalidate();
        self
    }

    /// Attaches a representer to nested values. May be given several times.
    pub fn extend(mut self, representer: impl Into<RepresenterRef>) -> Self {
        self.extend.push(representer.into());
        self.invalidate();
        self
    }

    /// Forces typed dispatch without declaring a type or representer.
    pub fn instance(mut self, instance: bool) -> Self {
        self.instance = instance;
        self
    }

    pub fn render_nil(mut self, render_nil: bool) -> Self {
        self.render_nil = render_nil;
        self
    }

    pub fn default(mut self, default: impl Into<Slot>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Groups the rendered fragment under an element of its own. Markup only.
    pub fn wrap(mut self, wrap: impl Into<String>) -> Self {
        self.wrap = Some(wrap.into());
        self
    }

    /// Binds the property to a markup attribute.
    pub fn attribute(mut self, attribute: bool) -> Self {
        self.attribute = attribute;
        self
    }

    /// Rewrites a collection before rendering. Collections only.
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<Slot>, &Options) -> Vec<Slot> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    // -------------------------------------------------------------------------
    // Queries

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key this property lives under in a document: `from`, else the name.
    #[inline]
    pub fn document_key(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.name)
    }

    /// Returns `true` when `from` overrides the document key.
    #[inline]
    pub fn has_from(&self) -> bool {
        self.from.is_some()
    }

    /// Returns `true` if nested values are converted with a representer.
    #[inline]
    pub fn is_typed(&self) -> bool {
        self.class.is_some() || !self.extend.is_empty() || self.instance
    }

    #[inline]
    pub fn is_collection(&self) -> bool {
        self.collection
    }

    #[inline]
    pub fn is_hash(&self) -> bool {
        self.hash
    }

    #[inline]
    pub fn is_attribute(&self) -> bool {
        self.attribute
    }

    #[inline]
    pub fn wrap_key(&self) -> Option<&str> {
        self.wrap.as_deref()
    }

    #[inline]
    pub(crate) fn transformer(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    #[inline]
    pub fn default_slot(&self) -> Option<&Slot> {
        self.default.as_ref()
    }

    /// Collections win over maps; typing only matters for single values.
    pub fn classification(&self) -> Classification {
        if self.collection {
            Classification::Collection
        } else if self.hash {
            Classification::Map
        } else if self.is_typed() {
            Classification::Object
        } else {
            Classification::Scalar
        }
    }

    /// Replaces a skippable nil with the configured default.
    pub fn default_value(&self, candidate: Slot) -> Slot {
        if self.skip_on_nil(&candidate)
            && let Some(default) = &self.default
        {
            return default.clone();
        }
        candidate
    }

    /// Returns `true` if `value` is nil and nil values are not rendered.
    #[inline]
    pub fn skip_on_nil(&self, value: &Slot) -> bool {
        value.is_nil() && !self.render_nil
    }

    // -------------------------------------------------------------------------
    // Resolution

    /// Resolves the nested type and representers, once.
    ///
    /// Fails with [`RepresentError::TypeResolution`] the first time a name
    /// is missing from the registry; nothing is cached on failure. Once
    /// resolved, the target is kept even if a different registry is passed.
    pub fn resolve(&self, registry: &Registry) -> Result<&Target, RepresentError> {
        if let Some(target) = self.resolved.get() {
            return Ok(target);
        }
        let target = self.resolve_uncached(registry)?;
        Ok(self.resolved.get_or_init(|| target))
    }

    fn resolve_uncached(&self, registry: &Registry) -> Result<Target, RepresentError> {
        let entry = match &self.class {
            Some(TypeRef::Resolved(entry)) => Some(entry.clone()),
            Some(TypeRef::Name(name)) => Some(registry.resolve_type(normalize_name(name))?),
            None => None,
        };

        let mut attached: Vec<Arc<Representer>> = Vec::with_capacity(self.extend.len());
        for reference in &self.extend {
            let representer = match reference {
                RepresenterRef::Resolved(representer) => representer.clone(),
                RepresenterRef::Name(name) => registry.resolve_representer(normalize_name(name))?,
            };
            // Attaching the same representer twice is a no-op.
            let present = attached
                .iter()
                .any(|r| Arc::ptr_eq(r, &representer) || r.name() == representer.name());
            if !present {
                attached.push(representer);
            }
        }

        let representer = match attached.len() {
            0 => entry.as_ref().map(|entry| entry.representer().clone()),
            1 => attached.pop(),
            _ => Some(Arc::new(Representer::compose(&attached))),
        };

        Ok(Target { entry, representer })
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("from", &self.from)
            .field("class", &self.class)
            .field("extend", &self.extend)
            .field("classification", &self.classification())
            .field("render_nil", &self.render_nil)
            .field("default", &self.default)
            .field("wrap", &self.wrap)
            .field("attribute", &self.attribute)
            .finish_non_exhaustive()
    }
}
