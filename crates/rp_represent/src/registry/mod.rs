//! The process-wide store of types, representers and naming strategies.
//!
//! A [`Registry`] is filled once at startup and only read afterwards; it is
//! `Send + Sync` and needs no locking when shared.
//!
//! ## Name resolution
//!
//! Definitions refer to nested types and representers by name. Names are
//! resolved the first time a definition is used and cached in the
//! definition, so declaration order does not matter.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, registration functions can be
//! submitted from anywhere with [`auto_register!`](crate::auto_register)
//! and collected by [`Registry::auto_register`].

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use rp_document::{Element, Map};
use rp_utils::hash::HashMap;

use crate::format::{HashFormat, XmlFormat};
use crate::naming::{NamingFn, builtin_strategies};
use crate::{Context, Model, Options, RepresentError, Representer};

// -----------------------------------------------------------------------------
// Modules

#[cfg(feature = "auto_register")]
mod auto_register;

// -----------------------------------------------------------------------------
// Exports

#[cfg(feature = "auto_register")]
pub use auto_register::AutoRegistration;

// -----------------------------------------------------------------------------
// TypeEntry

/// A constructible type and the representer its instances use.
pub struct TypeEntry {
    name: String,
    factory: fn() -> Box<dyn Model>,
    representer: Arc<Representer>,
}

impl TypeEntry {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn representer(&self) -> &Arc<Representer> {
        &self.representer
    }

    /// Creates a default instance.
    #[inline]
    pub fn instantiate(&self) -> Box<dyn Model> {
        (self.factory)()
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("representer", &self.representer.name())
            .finish_non_exhaustive()
    }
}

fn default_model<T: Model + Default>() -> Box<dyn Model> {
    Box::new(T::default())
}

// -----------------------------------------------------------------------------
// Registry

/// Maps names to types, representers and naming strategies.
///
/// # Examples
///
/// ```
/// use rp_document::Map;
/// use rp_represent::{impl_model, Definition, Options, Registry, Representer};
///
/// #[derive(Clone, Default)]
/// struct Song {
///     name: Option<String>,
/// }
/// impl_model!(Song { name });
///
/// let mut registry = Registry::new();
/// registry.register::<Song>(
///     Representer::builder("Song").property(Definition::new("name").from("songName")).build(),
/// );
///
/// let doc = Map::from([("songName", "Run To The Hills")]);
/// let song: Song = registry.from_hash(&doc, &Options::new()).unwrap();
///
/// assert_eq!(song.name.as_deref(), Some("Run To The Hills"));
/// assert_eq!(registry.to_hash(&song, &Options::new()).unwrap(), doc);
/// ```
pub struct Registry {
    types: HashMap<String, Arc<TypeEntry>>,
    representers: HashMap<String, Arc<Representer>>,
    strategies: HashMap<String, NamingFn>,
    auto_available: bool,
}

impl Default for Registry {
    /// See [`Registry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a registry without any entry, not even the built-in strategies.
    pub fn empty() -> Self {
        Self {
            types: HashMap::default(),
            representers: HashMap::default(),
            strategies: HashMap::default(),
            auto_available: false,
        }
    }

    /// Creates a registry with the built-in naming strategies.
    ///
    /// - `identity`
    /// - `upcase` `downcase`
    /// - `lower_camel` `snake`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, strategy) in builtin_strategies() {
            registry.strategies.insert(String::from(name), strategy);
        }
        registry
    }

    /// Registers `T` with the representer its instances use.
    ///
    /// The type is stored under its [`Model::type_name`], the representer
    /// under its own name. Registering a name again replaces the old entry.
    pub fn register<T: Model + Default>(&mut self, representer: Representer) -> Arc<TypeEntry> {
        let name = String::from(T::default().type_name());
        let representer = self.register_representer(representer);
        let entry = Arc::new(TypeEntry {
            name: name.clone(),
            factory: default_model::<T>,
            representer,
        });
        log::debug!("registered type `{name}`");
        self.types.insert(name, entry.clone());
        entry
    }

    /// Registers a representer on its own, e.g. one only attached with `extend`.
    pub fn register_representer(&mut self, representer: Representer) -> Arc<Representer> {
        let representer = Arc::new(representer);
        self.representers
            .insert(String::from(representer.name()), representer.clone());
        representer
    }

    pub fn register_strategy<F>(&mut self, name: impl Into<String>, strategy: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.strategies.insert(name.into(), Arc::new(strategy));
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Arc<TypeEntry>> {
        self.types.get(name)
    }

    #[inline]
    pub(crate) fn strategy(&self, name: &str) -> Option<&NamingFn> {
        self.strategies.get(name)
    }

    /// Finds a registered type.
    pub fn resolve_type(&self, name: &str) -> Result<Arc<TypeEntry>, RepresentError> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| RepresentError::TypeResolution {
                name: String::from(name),
            })
    }

    /// Finds a representer by its own name, else by the name of its type.
    pub fn resolve_representer(&self, name: &str) -> Result<Arc<Representer>, RepresentError> {
        if let Some(representer) = self.representers.get(name) {
            return Ok(representer.clone());
        }
        match self.types.get(name) {
            Some(entry) => Ok(entry.representer.clone()),
            None => Err(RepresentError::TypeResolution {
                name: String::from(name),
            }),
        }
    }

    /// The representer registered for the model's type.
    #[inline]
    pub fn representer_for(&self, model: &dyn Model) -> Result<Arc<Representer>, RepresentError> {
        self.resolve_representer(model.type_name())
    }

    // -------------------------------------------------------------------------
    // Conveniences

    pub fn to_hash(&self, model: &dyn Model, options: &Options) -> Result<Map, RepresentError> {
        self.representer_for(model)?
            .render_with::<HashFormat>(model, &Context::new(self, options))
    }

    /// Builds a new `T` from an associative document with its registered representer.
    pub fn from_hash<T: Model + Default>(&self, doc: &Map, options: &Options) -> Result<T, RepresentError> {
        let mut model = T::default();
        self.representer_for(&model)?
            .apply_with::<HashFormat>(doc, &mut model, &Context::new(self, options))?;
        Ok(model)
    }

    pub fn to_node(&self, model: &dyn Model, options: &Options) -> Result<Element, RepresentError> {
        self.representer_for(model)?
            .render_with::<XmlFormat>(model, &Context::new(self, options))
    }

    pub fn from_node<T: Model + Default>(&self, doc: &Element, options: &Options) -> Result<T, RepresentError> {
        let mut model = T::default();
        self.representer_for(&model)?
            .apply_with::<XmlFormat>(doc, &mut model, &Context::new(self, options))?;
        Ok(model)
    }

    // -------------------------------------------------------------------------
    // auto_register

    /// Runs every registration function submitted with
    /// [`auto_register!`](crate::auto_register).
    ///
    /// Returns `true` if automatic registration works on this platform.
    /// Repeated calls are cheap and run nothing again.
    ///
    /// Without the `auto_register` feature this does nothing and returns `false`.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            if self.auto_available {
                return true;
            }
            auto_register::register_all(self);
            self.auto_available
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.types.keys())
            .field("representers", &self.representers.keys())
            .field("strategies", &self.strategies.keys())
            .finish()
    }
}
