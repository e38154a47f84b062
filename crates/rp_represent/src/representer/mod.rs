use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::mem;
use std::sync::OnceLock;

use rp_document::{Element, Map};
use rp_utils::case::{last_segment, snake_case};

use crate::format::{HashFormat, XmlFormat};
use crate::naming::NamingFn;
use crate::registry::Registry;
use crate::{Context, Definition, Model, NamingStrategy, Options, RepresentError, WrapOption};

// -----------------------------------------------------------------------------
// Modules

mod collection;
mod engine;

// -----------------------------------------------------------------------------
// Exports

pub use collection::CollectionRepresenter;

// -----------------------------------------------------------------------------
// Wrap

/// The type-level wrap of a representer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Wrap {
    #[default]
    None,
    /// Wrap under the representer's own name in snake case.
    Infer,
    Key(Cow<'static, str>),
}

impl From<&'static str> for Wrap {
    #[inline]
    fn from(key: &'static str) -> Self {
        Wrap::Key(Cow::Borrowed(key))
    }
}

impl From<String> for Wrap {
    #[inline]
    fn from(key: String) -> Self {
        Wrap::Key(Cow::Owned(key))
    }
}

impl From<bool> for Wrap {
    #[inline]
    fn from(infer: bool) -> Self {
        if infer { Wrap::Infer } else { Wrap::None }
    }
}

// -----------------------------------------------------------------------------
// Representer

/// The ordered list of property definitions of one type, plus its wrap and
/// naming policy.
///
/// A representer is frozen once built. It renders any [`Model`] to a
/// document and applies documents back onto models; see the `engine`
/// methods [`render_with`](Self::render_with) and [`apply_with`](Self::apply_with).
///
/// A [`NamingStrategy::Named`] strategy and the nested types of its
/// definitions are looked up in the [`Registry`] of the first call and cached
/// in the representer. Later calls with another registry reuse them, so a
/// representer belongs to one registry. Clones keep the cache, so build a
/// new one for another registry.
///
/// # Examples
///
/// ```
/// use rp_document::{Map, Value};
/// use rp_represent::{impl_model, Definition, Options, Registry, Representer};
///
/// #[derive(Clone, Default)]
/// struct Band {
///     name: Option<String>,
///     label: Option<String>,
/// }
/// impl_model!(Band { name, label });
///
/// let representer = Representer::builder("Band")
///     .property(Definition::new("name"))
///     .property(Definition::new("label").from("label"))
///     .build();
/// let registry = Registry::new();
///
/// let band = Band { name: Some("Nofx".into()), label: Some("NOFX".into()) };
/// let doc = representer.to_hash(&band, &registry, &Options::new().wrap("band")).unwrap();
///
/// let inner = doc.get("band").and_then(Value::as_map).unwrap();
/// assert_eq!(inner, &Map::from([("name", "Nofx"), ("label", "NOFX")]));
/// ```
#[derive(Clone)]
pub struct Representer {
    name: String,
    definitions: Arc<[Definition]>,
    wrap: Wrap,
    naming: NamingStrategy,
    naming_fn: OnceLock<Option<NamingFn>>,
}

impl Representer {
    #[inline]
    pub fn builder(name: impl Into<String>) -> RepresenterBuilder {
        RepresenterBuilder::new(name)
    }

    /// Concatenates several representers into one, in order.
    ///
    /// The first representer gives the name, wrap and naming policy.
    pub(crate) fn compose(parts: &[Arc<Representer>]) -> Self {
        let name = parts
            .iter()
            .map(|part| part.name.as_str())
            .collect::<Vec<_>>()
            .join("+");
        let definitions: Vec<Definition> = parts
            .iter()
            .flat_map(|part| part.definitions.iter().cloned())
            .collect();
        let (wrap, naming) = match parts.first() {
            Some(first) => (first.wrap.clone(), first.naming.clone()),
            None => (Wrap::None, NamingStrategy::Identity),
        };
        Self {
            name,
            definitions: definitions.into(),
            wrap,
            naming,
            naming_fn: OnceLock::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|def| def.name() == name)
    }

    #[inline]
    pub fn wrap(&self) -> &Wrap {
        &self.wrap
    }

    #[inline]
    pub fn naming_strategy(&self) -> &NamingStrategy {
        &self.naming
    }

    /// The wrap of a call: the per-call option, else the type-level wrap.
    pub fn resolve_wrap(&self, options: &Options) -> Option<Cow<'static, str>> {
        match options.wrap_option() {
            Some(WrapOption::Off) => None,
            Some(WrapOption::Key(key)) => Some(key.clone()),
            None => match &self.wrap {
                Wrap::None => None,
                Wrap::Infer => Some(Cow::Owned(snake_case(last_segment(&self.name)))),
                Wrap::Key(key) => Some(key.clone()),
            },
        }
    }

    /// The document key of `def`: its `from`, else the naming strategy applied to its name.
    pub fn key_for<'d>(
        &self,
        def: &'d Definition,
        registry: &Registry,
    ) -> Result<Cow<'d, str>, RepresentError> {
        if def.has_from() {
            return Ok(Cow::Borrowed(def.document_key()));
        }
        let naming = match self.naming_fn.get() {
            Some(naming) => naming,
            None => {
                let resolved = self.naming.resolve(registry)?;
                self.naming_fn.get_or_init(|| resolved)
            }
        };
        Ok(match naming {
            Some(naming) => Cow::Owned(naming(def.name())),
            None => Cow::Borrowed(def.name()),
        })
    }

    pub fn for_collection(self: &Arc<Self>) -> CollectionRepresenter {
        CollectionRepresenter::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Entry points

    #[inline]
    pub fn to_hash(
        &self,
        model: &dyn Model,
        registry: &Registry,
        options: &Options,
    ) -> Result<Map, RepresentError> {
        self.render_with::<HashFormat>(model, &Context::new(registry, options))
    }

    #[inline]
    pub fn from_hash(
        &self,
        doc: &Map,
        model: &mut dyn Model,
        registry: &Registry,
        options: &Options,
    ) -> Result<(), RepresentError> {
        self.apply_with::<HashFormat>(doc, model, &Context::new(registry, options))
    }

    /// Builds a fresh `T` from an associative document.
    pub fn parse_hash<T: Model + Default>(
        &self,
        doc: &Map,
        registry: &Registry,
        options: &Options,
    ) -> Result<T, RepresentError> {
        let mut model = T::default();
        self.from_hash(doc, &mut model, registry, options)?;
        Ok(model)
    }

    #[inline]
    pub fn to_node(
        &self,
        model: &dyn Model,
        registry: &Registry,
        options: &Options,
    ) -> Result<Element, RepresentError> {
        self.render_with::<XmlFormat>(model, &Context::new(registry, options))
    }

    #[inline]
    pub fn from_node(
        &self,
        doc: &Element,
        model: &mut dyn Model,
        registry: &Registry,
        options: &Options,
    ) -> Result<(), RepresentError> {
        self.apply_with::<XmlFormat>(doc, model, &Context::new(registry, options))
    }

    /// Builds a fresh `T` from a markup document.
    pub fn parse_node<T: Model + Default>(
        &self,
        doc: &Element,
        registry: &Registry,
        options: &Options,
    ) -> Result<T, RepresentError> {
        let mut model = T::default();
        self.from_node(doc, &mut model, registry, options)?;
        Ok(model)
    }
}

impl fmt::Debug for Representer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Representer")
            .field("name", &self.name)
            .field("definitions", &self.definitions)
            .field("wrap", &self.wrap)
            .field("naming", &self.naming)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// RepresenterBuilder

/// Declares a [`Representer`].
///
/// Inherited definitions always come first, in the parent's order.
/// Definitions are never deduplicated by name.
pub struct RepresenterBuilder {
    name: String,
    parent: Vec<Definition>,
    definitions: Vec<Definition>,
    wrap: Option<Wrap>,
    naming: Option<NamingStrategy>,
}

impl RepresenterBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Vec::new(),
            definitions: Vec::new(),
            wrap: None,
            naming: None,
        }
    }

    /// Copies the parent's definitions, wrap and naming strategy.
    ///
    /// Definitions are cloned; editing them never reaches the parent.
    /// Wrap and naming set on this builder win over the parent's.
    pub fn inherit(mut self, parent: &Representer) -> Self {
        self.parent.extend(parent.definitions.iter().cloned());
        if self.wrap.is_none() {
            self.wrap = Some(parent.wrap.clone());
        }
        if self.naming.is_none() {
            self.naming = Some(parent.naming.clone());
        }
        self
    }

    pub fn property(mut self, def: Definition) -> Self {
        self.definitions.push(def);
        self
    }

    /// Declares an untyped collection.
    pub fn collection(self, name: impl Into<String>) -> Self {
        self.property(Definition::collection(name))
    }

    /// Declares an untyped key/value map.
    pub fn hash(self, name: impl Into<String>) -> Self {
        self.property(Definition::hash(name))
    }

    /// Edits the last definition called `name`, inherited ones included.
    pub fn definition_mut(mut self, name: &str, edit: impl FnOnce(Definition) -> Definition) -> Self {
        let found = self
            .definitions
            .iter_mut()
            .rev()
            .chain(self.parent.iter_mut().rev())
            .find(|def| def.name() == name);
        if let Some(def) = found {
            let taken = mem::replace(def, Definition::new(name));
            *def = edit(taken);
        }
        self
    }

    pub fn wrap(mut self, wrap: impl Into<Wrap>) -> Self {
        self.wrap = Some(wrap.into());
        self
    }

    pub fn naming_strategy(mut self, naming: NamingStrategy) -> Self {
        self.naming = Some(naming);
        self
    }

    pub fn build(self) -> Representer {
        let mut definitions = self.parent;
        definitions.extend(self.definitions);
        Representer {
            name: self.name,
            definitions: definitions.into(),
            wrap: self.wrap.unwrap_or_default(),
            naming: self.naming.unwrap_or_default(),
            naming_fn: OnceLock::new(),
        }
    }
}
