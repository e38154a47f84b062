use alloc::sync::Arc;
use alloc::vec::Vec;

use rp_document::{Map, Value};

use super::Representer;
use crate::binding::CollectionBinding;
use crate::format::HashFormat;
use crate::registry::Registry;
use crate::{Context, Definition, FromSlot, IntoSlot, Options, RepresentError, Slot, TypeRef, WrapOption};

// -----------------------------------------------------------------------------
// CollectionRepresenter

/// Represents a whole sequence of models as a top-level list document.
///
/// Rendering works with the item representer alone. Parsing also needs the
/// item type, given with [`class`](Self::class).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use rp_document::{Map, Value};
/// use rp_represent::{impl_model, Definition, Options, Registry, Representer};
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Song {
///     name: Option<String>,
/// }
/// impl_model!(Song { name });
///
/// let song = Arc::new(Representer::builder("Song").property(Definition::new("name")).build());
/// let mut registry = Registry::new();
/// registry.register::<Song>((*song).clone());
///
/// let songs = song.for_collection().class("Song");
/// let input = Value::from(vec![Value::from(Map::from([("name", "Days Go By")]))]);
///
/// let parsed: Vec<Song> = songs.from_hash(input, &registry, &Options::new()).unwrap();
/// assert_eq!(parsed, [Song { name: Some("Days Go By".into()) }]);
/// ```
#[derive(Clone, Debug)]
pub struct CollectionRepresenter {
    item: Definition,
}

impl CollectionRepresenter {
    pub(super) fn new(representer: Arc<Representer>) -> Self {
        Self {
            item: Definition::collection("items").extend(representer),
        }
    }

    /// Sets the item type constructed on parse.
    pub fn class(mut self, class: impl Into<TypeRef>) -> Self {
        self.item = self.item.class(class);
        self
    }

    /// Renders `items` as a list, nested under the per-call wrap if there is one.
    pub fn to_hash<T: IntoSlot>(
        &self,
        items: &[T],
        registry: &Registry,
        options: &Options,
    ) -> Result<Value, RepresentError> {
        let slot = Slot::List(items.iter().map(IntoSlot::to_slot).collect());
        let list = CollectionBinding::new(&self.item)
            .serialize_for::<HashFormat>(slot, &Context::new(registry, options))?;

        Ok(match options.wrap_option() {
            Some(WrapOption::Key(key)) => Value::Map(Map::from([(&**key, list)])),
            _ => list,
        })
    }

    /// Parses a list document into new items.
    ///
    /// A map is taken as a list of one item. Anything else that is not a
    /// list fails with [`RepresentError::TypeMismatch`].
    pub fn from_hash<T: FromSlot>(
        &self,
        doc: Value,
        registry: &Registry,
        options: &Options,
    ) -> Result<Vec<T>, RepresentError> {
        let doc = match (options.wrap_option(), doc) {
            (Some(WrapOption::Key(key)), Value::Map(mut map)) => map.remove(key).unwrap_or_default(),
            (_, doc) => doc,
        };
        let doc = match doc {
            Value::Map(map) => Value::List(alloc::vec![Value::Map(map)]),
            other => other,
        };

        let items = CollectionBinding::new(&self.item)
            .deserialize_from::<HashFormat>(doc, &Context::new(registry, options))?;
        Vec::<T>::from_slot(items)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use rp_document::{Map, Value};

    use crate::{Definition, Options, Registry, RepresentError, Representer, impl_model};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Song {
        name: Option<String>,
    }

    impl_model!(Song { name });

    fn song(name: &str) -> Song {
        Song {
            name: Some(name.into()),
        }
    }

    fn setup() -> (Arc<Representer>, Registry) {
        let representer = Arc::new(
            Representer::builder("Song")
                .property(Definition::new("name"))
                .build(),
        );
        let mut registry = Registry::new();
        registry.register::<Song>((*representer).clone());
        (representer, registry)
    }

    fn document() -> Value {
        Value::from(vec![
            Value::from(Map::from([("name", "Days Go By")])),
            Value::from(Map::from([("name", "Can't Take Them All")])),
        ])
    }

    #[test]
    fn render_without_class() {
        let (representer, registry) = setup();
        let songs = [song("Days Go By"), song("Can't Take Them All")];

        let doc = representer
            .for_collection()
            .to_hash(&songs, &registry, &Options::new())
            .unwrap();
        assert_eq!(doc, document());

        let wrapped = representer
            .for_collection()
            .to_hash(&songs, &registry, &Options::new().wrap("songs"))
            .unwrap();
        assert_eq!(wrapped, Value::from(Map::from([("songs", document())])));
    }

    #[test]
    fn parse_needs_class() {
        let (representer, registry) = setup();

        let parsed: Vec<Song> = representer
            .for_collection()
            .class("Song")
            .from_hash(document(), &registry, &Options::new())
            .unwrap();
        assert_eq!(parsed, [song("Days Go By"), song("Can't Take Them All")]);

        let err = representer
            .for_collection()
            .from_hash::<Song>(document(), &registry, &Options::new())
            .unwrap_err();
        assert!(matches!(err, RepresentError::NotInstantiable { .. }));
    }

    #[test]
    fn map_is_one_item() {
        let (representer, registry) = setup();
        let parsed: Vec<Song> = representer
            .for_collection()
            .class("Song")
            .from_hash(
                Value::from(Map::from([("name", "Mother North")])),
                &registry,
                &Options::new(),
            )
            .unwrap();
        assert_eq!(parsed, [song("Mother North")]);
    }

    #[test]
    fn bad_collections() {
        let (representer, registry) = setup();
        let songs = representer.for_collection().class("Song");

        let err = songs
            .from_hash::<Song>(Value::Nil, &registry, &Options::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "expected enumerable, got null");

        let err = songs
            .from_hash::<Song>(Value::from(""), &registry, &Options::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "expected enumerable, got text");
    }
}
