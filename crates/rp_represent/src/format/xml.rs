use alloc::string::String;
use alloc::vec::Vec;

use rp_document::{Element, Map, Value};
use rp_utils::case::{last_segment, snake_case};

use super::Format;
use crate::{Classification, Definition, Lookup, RepresentError, Representer};

// -----------------------------------------------------------------------------
// XmlFormat

/// Markup documents: every level is an [`Element`].
///
/// - A key starting with `@`, or a property marked `attribute`, is an attribute.
/// - Scalars are child elements holding text.
/// - Nested objects are child elements named by the key.
/// - Collections are repeated child elements, grouped under the property's
///   own `wrap` element when it has one.
/// - Maps are one element with a child per entry.
///
/// The root element is named by the wrap, or by the representer's name in
/// snake case when there is none.
pub struct XmlFormat;

#[inline]
fn attribute_name<'k>(key: &'k str, def: &Definition) -> Option<&'k str> {
    match key.strip_prefix('@') {
        Some(name) => Some(name),
        None if def.is_attribute() => Some(key),
        None => None,
    }
}

/// Appends `fragment` to `parent` as element(s) named `name`.
///
/// A list becomes one element per member.
fn push_fragment(parent: &mut Element, name: &str, fragment: Value) {
    match fragment {
        Value::List(items) => {
            for item in items {
                push_fragment(parent, name, item);
            }
        }
        Value::Node(mut element) => {
            element.set_name(name);
            parent.push_child(element);
        }
        Value::Map(map) => {
            let mut element = Element::new(name);
            for (key, value) in map {
                push_fragment(&mut element, &key, value);
            }
            parent.push_child(element);
        }
        Value::Nil => parent.push_child(Element::new(name)),
        scalar => {
            let mut element = Element::new(name);
            if let Some(text) = scalar.scalar_text() {
                element.set_text(text);
            }
            parent.push_child(element);
        }
    }
}

/// The fragment an element stands for.
///
/// Typed properties get the element itself; untyped ones get its text, or
/// nil for an empty element.
fn fragment_of(element: &Element, typed: bool) -> Value {
    if typed {
        return Value::Node(element.clone());
    }
    match element.text() {
        Some(text) => Value::Text(String::from(text)),
        None if element.children().is_empty() => Value::Nil,
        None => Value::Node(element.clone()),
    }
}

impl Format for XmlFormat {
    type Document = Element;

    #[inline]
    fn new_document() -> Element {
        Element::default()
    }

    fn read(doc: &Element, key: &str, def: &Definition) -> Lookup<Value> {
        if let Some(name) = attribute_name(key, def) {
            return match doc.attribute(name) {
                Some(text) => Lookup::Present(Value::Text(String::from(text))),
                None => Lookup::Absent,
            };
        }

        let typed = def.is_typed();
        match def.classification() {
            Classification::Collection => {
                let parent = match def.wrap_key() {
                    Some(group) => match doc.child(group) {
                        Some(parent) => parent,
                        None => return Lookup::Absent,
                    },
                    None => doc,
                };
                let items: Vec<Value> = parent
                    .children_named(key)
                    .map(|element| fragment_of(element, typed))
                    .collect();
                if items.is_empty() && def.wrap_key().is_none() {
                    Lookup::Absent
                } else {
                    Lookup::Present(Value::List(items))
                }
            }
            Classification::Map => match doc.child(key) {
                Some(element) => Lookup::Present(Value::Map(
                    element
                        .children()
                        .iter()
                        .map(|child| (String::from(child.name()), fragment_of(child, typed)))
                        .collect::<Map>(),
                )),
                None => Lookup::Absent,
            },
            Classification::Object | Classification::Scalar => match doc.child(key) {
                Some(element) => Lookup::from(fragment_of(element, typed)),
                None => Lookup::Absent,
            },
        }
    }

    fn write(
        doc: &mut Element,
        key: &str,
        def: &Definition,
        fragment: Value,
    ) -> Result<(), RepresentError> {
        if let Some(name) = attribute_name(key, def) {
            if let Some(text) = fragment.scalar_text() {
                doc.set_attribute(name, text);
            } else if !fragment.is_nil() {
                return Err(RepresentError::mismatch("scalar", fragment.kind().as_str()));
            }
            return Ok(());
        }

        match (def.classification(), def.wrap_key()) {
            (Classification::Collection, Some(group)) => {
                push_fragment(doc.child_or_insert(group), key, fragment);
            }
            _ => push_fragment(doc, key, fragment),
        }
        Ok(())
    }

    fn wrap(mut doc: Element, wrap: Option<&str>, representer: &Representer) -> Element {
        match wrap {
            Some(name) => doc.set_name(name),
            None => doc.set_name(snake_case(last_segment(representer.name()))),
        }
        doc
    }

    #[inline]
    fn unwrap<'d>(doc: &'d Element, _: Option<&str>) -> Result<&'d Element, RepresentError> {
        Ok(doc)
    }

    #[inline]
    fn into_fragment(doc: Element) -> Value {
        Value::Node(doc)
    }

    fn from_fragment(fragment: Value) -> Result<Element, RepresentError> {
        match fragment {
            Value::Node(element) => Ok(element),
            other => Err(RepresentError::mismatch("node", other.kind().as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use rp_document::{Element, Value};

    use super::XmlFormat;
    use crate::format::Format;
    use crate::{Definition, Lookup};

    #[test]
    fn attributes_by_key_prefix() {
        let def = Definition::new("href").from("@href");
        let mut link = Element::new("link");
        XmlFormat::write(&mut link, "@href", &def, Value::from("http://apotomo.de/")).unwrap();

        assert_eq!(link.attribute("href"), Some("http://apotomo.de/"));
        assert!(link.children().is_empty());
        assert_eq!(
            XmlFormat::read(&link, "@href", &def),
            Lookup::Present(Value::from("http://apotomo.de/"))
        );
        assert_eq!(XmlFormat::read(&link, "@title", &def), Lookup::Absent);
    }

    #[test]
    fn collections_repeat() {
        let def = Definition::collection("songs").from("song");
        let mut album = Element::new("album");
        let songs = Value::from(vec![Value::from("Two Kevins"), Value::from("Laundry Basket")]);
        XmlFormat::write(&mut album, "song", &def, songs.clone()).unwrap();

        assert_eq!(album.children_named("song").count(), 2);
        assert_eq!(XmlFormat::read(&album, "song", &def), Lookup::Present(songs));
        assert_eq!(XmlFormat::read(&Element::new("album"), "song", &def), Lookup::Absent);
    }

    #[test]
    fn grouped_collection() {
        let def = Definition::collection("songs").from("song").wrap("songs");
        let mut album = Element::new("album");
        XmlFormat::write(&mut album, "song", &def, Value::from(vec![Value::from("Microphone")])).unwrap();

        let group = album.child("songs").unwrap();
        assert_eq!(group.child("song").and_then(Element::text), Some("Microphone"));
    }

    #[test]
    fn typed_child_is_renamed() {
        let def = Definition::new("seller").class("Label");
        let mut album = Element::new("album");
        let label = Element::new("label").with_child(Element::new("name").with_text("Fat Wreck"));
        XmlFormat::write(&mut album, "seller", &def, Value::Node(label)).unwrap();

        let seller = album.child("seller").unwrap();
        assert_eq!(seller.child("name").and_then(Element::text), Some("Fat Wreck"));
        assert!(matches!(XmlFormat::read(&album, "seller", &def), Lookup::Present(Value::Node(_))));
    }
}
