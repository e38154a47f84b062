use alloc::string::String;

use super::Representer;
use crate::format::Format;
use crate::{Context, Lookup, Model, PropertyBinding, RepresentError, Slot};

// -----------------------------------------------------------------------------
// Engine

impl Representer {
    /// Renders `model` into a new document of format `F`.
    ///
    /// Definitions are visited in order; each one is independent of the
    /// others. A nil value is left out unless its definition renders nil,
    /// after the definition's default has been applied.
    pub fn render_with<F: Format>(
        &self,
        model: &dyn Model,
        ctx: &Context<'_>,
    ) -> Result<F::Document, RepresentError> {
        log::debug!("[Serialize] `{}` with `{}`", model.type_name(), self.name());

        let mut doc = F::new_document();
        for def in self.definitions() {
            if !ctx.options.admits(def) {
                log::trace!("[Serialize] `{}` filtered out", def.name());
                continue;
            }

            let key = self.key_for(def, ctx.registry)?;
            let binding = PropertyBinding::for_definition(def);
            log::trace!(
                "[Serialize] `{}` as `{}` ({:?})",
                def.name(),
                key,
                def.classification()
            );

            let value = model
                .get_property(def.name())
                .ok_or_else(|| RepresentError::UnknownProperty {
                    type_name: String::from(model.type_name()),
                    property: String::from(def.name()),
                })?;
            binding.write::<F>(&mut doc, &key, def.default_value(value), ctx)?;
        }

        let wrap = self.resolve_wrap(ctx.options);
        let doc = F::wrap(doc, wrap.as_deref(), self);

        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!("[Serialize] document {doc:?}");

        Ok(doc)
    }

    /// Applies a document of format `F` onto `model`.
    ///
    /// A key missing from the document leaves its property untouched; a key
    /// holding nil assigns nil. The first failure is returned as is, and
    /// properties assigned before it keep their new values.
    pub fn apply_with<F: Format>(
        &self,
        doc: &F::Document,
        model: &mut dyn Model,
        ctx: &Context<'_>,
    ) -> Result<(), RepresentError> {
        log::debug!("[Deserialize] `{}` with `{}`", model.type_name(), self.name());

        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!("[Deserialize] document {doc:?}");

        let wrap = self.resolve_wrap(ctx.options);
        let doc = F::unwrap(doc, wrap.as_deref())?;

        for def in self.definitions() {
            if !ctx.options.admits(def) {
                log::trace!("[Deserialize] `{}` filtered out", def.name());
                continue;
            }

            let key = self.key_for(def, ctx.registry)?;
            let binding = PropertyBinding::for_definition(def);

            match binding.read::<F>(doc, &key, ctx)? {
                Lookup::Absent => {
                    log::trace!("[Deserialize] `{}` absent under `{}`", def.name(), key);
                }
                Lookup::Nil => model.set_property(def.name(), Slot::Nil)?,
                Lookup::Present(value) => {
                    log::trace!("[Deserialize] `{}` from `{}`", def.name(), key);
                    model.set_property(def.name(), value)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use rp_document::{Element, Map, Value};

    use crate::{
        Definition, Model, NamingStrategy, Options, Registry, RepresentError, Representer, Slot,
        impl_model,
    };

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Band {
        name: Option<String>,
        label: Option<String>,
        groupies: Option<i64>,
    }

    impl_model!(Band { name, label, groupies });

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Album {
        title: Option<String>,
        band: Option<Band>,
        songs: Vec<String>,
    }

    impl_model!(Album { title, band, songs });

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Compilation {
        bands: Vec<Band>,
    }

    impl_model!(Compilation { bands });

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Counter {
        hits: Option<u64>,
    }

    impl_model!(Counter { hits });

    fn band_representer() -> Representer {
        Representer::builder("Band")
            .property(Definition::new("name"))
            .property(Definition::new("label").from("label"))
            .property(Definition::new("groupies"))
            .build()
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register::<Band>(band_representer());
        registry.register::<Album>(
            Representer::builder("Album")
                .property(Definition::new("title"))
                .property(Definition::new("band").class("Band"))
                .property(Definition::collection("songs"))
                .build(),
        );
        registry.register::<Compilation>(
            Representer::builder("Compilation")
                .property(Definition::collection("bands").class("Band"))
                .build(),
        );
        registry
    }

    fn nofx() -> Band {
        Band {
            name: Some("Nofx".into()),
            label: Some("NOFX".into()),
            groupies: None,
        }
    }

    #[test]
    fn flat_and_wrapped() {
        let registry = registry();
        let representer = band_representer();

        let flat = representer.to_hash(&nofx(), &registry, &Options::new()).unwrap();
        assert_eq!(flat, Map::from([("name", "Nofx"), ("label", "NOFX")]));
        assert_eq!(flat.keys().collect::<Vec<_>>(), ["name", "label"]);

        let wrapped = representer
            .to_hash(&nofx(), &registry, &Options::new().wrap("band"))
            .unwrap();
        assert_eq!(wrapped, Map::from([("band", flat)]));
    }

    #[test]
    fn wrap_precedence() {
        let registry = registry();
        let group = Representer::builder("Band")
            .property(Definition::new("label"))
            .wrap("group")
            .build();
        let band = Band {
            label: Some("Fat".into()),
            ..Band::default()
        };
        let inner = Map::from([("label", "Fat")]);

        let explicit = group.to_hash(&band, &registry, &Options::new().wrap("band")).unwrap();
        assert_eq!(explicit, Map::from([("band", inner.clone())]));

        let configured = group.to_hash(&band, &registry, &Options::new()).unwrap();
        assert_eq!(configured, Map::from([("group", inner.clone())]));

        let off = group.to_hash(&band, &registry, &Options::new().unwrapped()).unwrap();
        assert_eq!(off, inner);

        let mut parsed = Band::default();
        let doc = Map::from([("band", Map::from([("label", "This Is A Standoff")]))]);
        group
            .from_hash(&doc, &mut parsed, &registry, &Options::new().wrap("band"))
            .unwrap();
        assert_eq!(parsed.label.as_deref(), Some("This Is A Standoff"));
    }

    #[test]
    fn inferred_wrap() {
        let registry = registry();
        let hardcore = Representer::builder("music::HardcoreBand")
            .property(Definition::new("name"))
            .wrap(true)
            .build();
        assert_eq!(
            hardcore.resolve_wrap(&Options::new()).as_deref(),
            Some("hardcore_band")
        );

        let doc = hardcore.to_hash(&nofx(), &registry, &Options::new()).unwrap();
        assert!(doc.contains_key("hardcore_band"));
    }

    #[test]
    fn naming_is_kept_across_registries() {
        let mut upper = Registry::new();
        upper.register_strategy("shout", |name: &str| name.to_uppercase());
        let mut lower = Registry::new();
        lower.register_strategy("shout", |name: &str| name.to_lowercase());

        let representer = Representer::builder("Band")
            .property(Definition::new("name"))
            .naming_strategy(NamingStrategy::named("shout"))
            .build();
        let band = nofx();

        let first = representer.to_hash(&band, &upper, &Options::new()).unwrap();
        let second = representer.to_hash(&band, &lower, &Options::new()).unwrap();
        assert!(first.contains_key("NAME"));
        assert_eq!(first, second);

        let fresh = representer.clone();
        assert!(fresh.to_hash(&band, &lower, &Options::new()).unwrap().contains_key("NAME"));
    }

    #[test]
    fn large_unsigned_fields_are_exact() {
        let representer = Representer::builder("Counter")
            .property(Definition::new("hits"))
            .build();
        let registry = Registry::new();
        let counter = Counter { hits: Some(1 << 63) };

        let doc = representer.to_hash(&counter, &registry, &Options::new()).unwrap();
        assert_eq!(doc.get("hits"), Some(&Value::UInt(1 << 63)));
        let parsed: Counter = representer.parse_hash(&doc, &registry, &Options::new()).unwrap();
        assert_eq!(parsed, counter);

        let doc = Map::from([("hits", Value::Float(1e30))]);
        let err = representer
            .parse_hash::<Counter>(&doc, &registry, &Options::new())
            .unwrap_err();
        assert!(err.to_string().starts_with("expected u64, got out of range float"));
    }

    #[test]
    fn missing_wrap_key_fails() {
        let registry = registry();
        let group = Representer::builder("Band")
            .property(Definition::new("name"))
            .wrap("group")
            .build();
        let mut band = nofx();
        let doc = Map::from([("name", "Bad Religion")]);

        let err = group.from_hash(&doc, &mut band, &registry, &Options::new()).unwrap_err();
        assert_eq!(err.to_string(), "expected map, got null");
        assert_eq!(band, nofx());
    }

    #[test]
    fn nil_is_omitted_and_absent_is_untouched() {
        let registry = registry();
        let representer = band_representer();

        let doc = representer.to_hash(&nofx(), &registry, &Options::new()).unwrap();
        assert!(!doc.contains_key("groupies"));

        let mut band = Band {
            groupies: Some(2),
            ..Band::default()
        };
        representer
            .from_hash(&Map::from([("name", "Nofx")]), &mut band, &registry, &Options::new())
            .unwrap();
        assert_eq!(band.groupies, Some(2));
        assert_eq!(band.name.as_deref(), Some("Nofx"));

        representer
            .from_hash(&Map::from([("groupies", Value::Nil)]), &mut band, &registry, &Options::new())
            .unwrap();
        assert_eq!(band.groupies, None);
    }

    #[test]
    fn render_nil_and_default() {
        let registry = registry();
        let representer = Representer::builder("Band")
            .property(Definition::new("name").render_nil(true))
            .property(Definition::new("label").default(Value::from("n/a")))
            .build();

        let doc = representer.to_hash(&Band::default(), &registry, &Options::new()).unwrap();
        assert_eq!(doc, Map::from([("name", Value::Nil), ("label", Value::from("n/a"))]));
    }

    #[test]
    fn scalar_round_trip() {
        let registry = registry();
        let representer = band_representer();
        let band = Band {
            groupies: Some(2),
            ..nofx()
        };

        let doc = representer.to_hash(&band, &registry, &Options::new()).unwrap();
        let back: Band = representer.parse_hash(&doc, &registry, &Options::new()).unwrap();
        assert_eq!(back, band);
    }

    #[test]
    fn typed_property_constructs_nested() {
        let registry = registry();
        let doc = Map::from([
            ("title", Value::from("Punk in Drublic")),
            ("band", Value::from(Map::from([("name", "Nofx")]))),
        ]);

        let album: Album = registry.from_hash(&doc, &Options::new()).unwrap();
        assert_eq!(album.band.and_then(|b| b.name).as_deref(), Some("Nofx"));
    }

    #[test]
    fn nested_ignores_type_wrap() {
        let mut registry = Registry::new();
        registry.register::<Band>(
            Representer::builder("Band")
                .property(Definition::new("name"))
                .wrap("group")
                .build(),
        );
        let album_representer = Representer::builder("Album")
            .property(Definition::new("band").class("Band"))
            .build();

        let album = Album {
            band: Some(nofx()),
            ..Album::default()
        };
        let doc = album_representer.to_hash(&album, &registry, &Options::new()).unwrap();
        assert_eq!(doc, Map::from([("band", Map::from([("name", "Nofx")]))]));

        let back: Album = album_representer.parse_hash(&doc, &registry, &Options::new()).unwrap();
        assert_eq!(back.band.and_then(|b| b.name).as_deref(), Some("Nofx"));
    }

    #[test]
    fn untyped_collection_keeps_order() {
        let registry = registry();
        let doc = Map::from([(
            "songs",
            Value::from(vec![Value::from("Two Kevins"), Value::from("Wright and Rong")]),
        )]);

        let album: Album = registry.from_hash(&doc, &Options::new()).unwrap();
        assert_eq!(album.songs, ["Two Kevins", "Wright and Rong"]);

        let back = registry.to_hash(&album, &Options::new()).unwrap();
        assert_eq!(back.get("songs"), doc.get("songs"));
    }

    #[test]
    fn typed_collection() {
        let registry = registry();
        let compilation = Compilation {
            bands: vec![
                Band {
                    name: Some("Diesel Boy".into()),
                    ..Band::default()
                },
                Band {
                    name: Some("Bad Religion".into()),
                    ..Band::default()
                },
            ],
        };

        let doc = registry.to_hash(&compilation, &Options::new()).unwrap();
        let expected = Value::from(vec![
            Value::from(Map::from([("name", "Diesel Boy")])),
            Value::from(Map::from([("name", "Bad Religion")])),
        ]);
        assert_eq!(doc.get("bands"), Some(&expected));

        let back: Compilation = registry.from_hash(&doc, &Options::new()).unwrap();
        assert_eq!(back, compilation);
    }

    #[test]
    fn empty_collection_renders_default() {
        let registry = registry();
        let doc = registry.to_hash(&Compilation::default(), &Options::new()).unwrap();
        assert_eq!(doc, Map::from([("bands", Value::List(vec![]))]));
    }

    #[test]
    fn collection_needs_enumerable() {
        let registry = registry();
        let mut album = Album::default();
        let err = registry
            .representer_for(&album)
            .unwrap()
            .from_hash(&Map::from([("songs", "Two Kevins")]), &mut album, &registry, &Options::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "expected enumerable, got text");

        let err = registry
            .representer_for(&album)
            .unwrap()
            .from_hash(&Map::from([("songs", Value::Nil)]), &mut album, &registry, &Options::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "expected enumerable, got null");
    }

    #[test]
    fn transform_and_use_as_is() {
        let registry = registry();
        let representer = Representer::builder("Album")
            .property(Definition::collection("songs").transform(|songs, options| {
                let limit = options.get("limit").and_then(Value::as_int).unwrap_or(i64::MAX);
                songs.into_iter().take(limit as usize).collect()
            }))
            .build();
        let album = Album {
            songs: vec!["Linoleum".into(), "Leave It Alone".into(), "Don't Call Me White".into()],
            ..Album::default()
        };

        let doc = representer
            .to_hash(&album, &registry, &Options::new().value("limit", 2))
            .unwrap();
        assert_eq!(
            doc.get("songs"),
            Some(&Value::from(vec![Value::from("Linoleum"), Value::from("Leave It Alone")]))
        );

        let opaque = representer
            .to_hash(&album, &registry, &Options::new().use_as_is("songs"))
            .unwrap();
        assert_eq!(opaque.get("songs").and_then(Value::as_list).map(<[Value]>::len), Some(3));
    }

    #[test]
    fn filter_skips_read_and_write() {
        let registry = registry();
        let representer = band_representer();
        let only_name = Options::new().filter(|def| def.name() == "name");

        let doc = representer.to_hash(&nofx(), &registry, &only_name).unwrap();
        assert_eq!(doc, Map::from([("name", "Nofx")]));

        let mut band = Band::default();
        representer
            .from_hash(
                &Map::from([("name", "No One's Choice"), ("label", "Fat")]),
                &mut band,
                &registry,
                &only_name,
            )
            .unwrap();
        assert_eq!(band.name.as_deref(), Some("No One's Choice"));
        assert_eq!(band.label, None);
    }

    #[test]
    fn naming_strategies() {
        let registry = registry();
        let upcase = Representer::builder("Band")
            .property(Definition::new("name"))
            .property(Definition::new("label").from("label"))
            .naming_strategy(NamingStrategy::callable(|name| name.to_uppercase()))
            .build();

        let doc = upcase.to_hash(&nofx(), &registry, &Options::new()).unwrap();
        assert_eq!(doc, Map::from([("NAME", "Nofx"), ("label", "NOFX")]));

        let mut band = Band::default();
        upcase
            .from_hash(&Map::from([("NAME", "Wie es geht")]), &mut band, &registry, &Options::new())
            .unwrap();
        assert_eq!(band.name.as_deref(), Some("Wie es geht"));

        let reverse = Representer::builder("Band")
            .property(Definition::new("name"))
            .naming_strategy(NamingStrategy::named("reverse"))
            .build();
        let err = reverse.to_hash(&nofx(), &registry, &Options::new()).unwrap_err();
        assert_eq!(
            err,
            RepresentError::InvalidStrategy {
                name: "reverse".into()
            }
        );

        let mut registry = registry;
        registry.register_strategy("reverse", |name: &str| name.chars().rev().collect());
        let fresh = Representer::builder("Band")
            .property(Definition::new("name"))
            .naming_strategy(NamingStrategy::named("reverse"))
            .build();
        let doc = fresh.to_hash(&nofx(), &registry, &Options::new()).unwrap();
        assert_eq!(doc, Map::from([("eman", "Nofx")]));
    }

    #[test]
    fn inheritance() {
        let band = band_representer();
        let punk = Representer::builder("PunkBand")
            .inherit(&band)
            .property(Definition::new("street_cred"))
            .definition_mut("label", |def| def.from("record_label"))
            .build();

        let names: Vec<&str> = punk.definitions().iter().map(Definition::name).collect();
        assert_eq!(names, ["name", "label", "groupies", "street_cred"]);
        assert_eq!(punk.definition("label").map(Definition::document_key), Some("record_label"));
        assert_eq!(band.definition("label").map(Definition::document_key), Some("label"));

        let wrapped = Representer::builder("HardcoreBand").wrap("breach").build();
        let softcore = Representer::builder("SoftcoreBand").inherit(&wrapped).build();
        assert_eq!(
            softcore.resolve_wrap(&Options::new()).as_deref(),
            Some("breach")
        );
    }

    #[test]
    fn unknown_property_on_render() {
        let registry = registry();
        let representer = Representer::builder("Band")
            .property(Definition::new("genre"))
            .build();
        let err = representer.to_hash(&nofx(), &registry, &Options::new()).unwrap_err();
        assert_eq!(err.to_string(), "`Band` has no property `genre`");
    }

    #[test]
    fn partial_apply_is_kept() {
        let registry = registry();
        let mut band = Band::default();
        let doc = Map::from([("name", Value::from("Nofx")), ("groupies", Value::from("many"))]);

        let err = band_representer().from_hash(&doc, &mut band, &registry, &Options::new());
        assert!(err.is_err());
        assert_eq!(band.name.as_deref(), Some("Nofx"));
    }

    #[test]
    fn extend_and_instance() {
        let mut registry = registry();
        let label = Arc::new(
            Representer::builder("Label")
                .property(Definition::new("name"))
                .build(),
        );
        let extended = Representer::builder("Album")
            .property(Definition::new("band").extend(label.clone()))
            .build();
        let album = Album {
            band: Some(nofx()),
            ..Album::default()
        };

        let doc = extended.to_hash(&album, &registry, &Options::new()).unwrap();
        assert_eq!(doc, Map::from([("band", Map::from([("name", "Nofx")]))]));

        // Rendering only: nothing to construct on apply.
        let mut back = Album::default();
        let err = extended
            .from_hash(&doc, &mut back, &registry, &Options::new())
            .unwrap_err();
        assert_eq!(
            err,
            RepresentError::NotInstantiable {
                property: "band".into()
            }
        );

        let instance = Representer::builder("Album")
            .property(Definition::new("band").instance(true))
            .build();
        let doc = instance.to_hash(&album, &registry, &Options::new()).unwrap();
        assert_eq!(
            doc.get("band").and_then(Value::as_map),
            Some(&Map::from([("name", "Nofx"), ("label", "NOFX")]))
        );

        registry.register_representer(Representer::builder("Label").build());
        assert!(registry.resolve_representer("Label").is_ok());
    }

    #[test]
    fn hash_property() {
        #[derive(Clone, Default)]
        struct Setlist {
            songs: alloc::collections::BTreeMap<String, String>,
        }
        impl_model!(Setlist { songs });

        let registry = registry();
        let representer = Representer::builder("Setlist").hash("songs").build();
        let doc = Map::from([(
            "songs",
            Map::from([("opener", "Linoleum"), ("closer", "Bob")]),
        )]);

        let setlist: Setlist = representer.parse_hash(&doc, &registry, &Options::new()).unwrap();
        assert_eq!(setlist.songs.get("opener").map(String::as_str), Some("Linoleum"));

        let back = representer.to_hash(&setlist, &registry, &Options::new()).unwrap();
        assert_eq!(back, doc);

        let err = representer
            .parse_hash::<Setlist>(&Map::from([("songs", "Linoleum")]), &registry, &Options::new())
            .err();
        assert_eq!(err.map(|e| e.to_string()).as_deref(), Some("expected map, got text"));
    }

    #[test]
    fn xml_documents() {
        let mut registry = Registry::new();
        registry.register::<Band>(
            Representer::builder("Band")
                .property(Definition::new("name"))
                .build(),
        );
        let compilation = Representer::builder("Compilation")
            .property(Definition::collection("bands").class("Band").from("band"))
            .build();

        let cd = Compilation {
            bands: vec![
                Band {
                    name: Some("Diesel Boy".into()),
                    ..Band::default()
                },
                Band {
                    name: Some("Cobra Skulls".into()),
                    ..Band::default()
                },
            ],
        };
        let node = compilation.to_node(&cd, &registry, &Options::new()).unwrap();
        assert_eq!(node.name(), "compilation");
        let names: Vec<&str> = node
            .children_named("band")
            .filter_map(|band| band.child("name").and_then(Element::text))
            .collect();
        assert_eq!(names, ["Diesel Boy", "Cobra Skulls"]);

        let back: Compilation = compilation.parse_node(&node, &registry, &Options::new()).unwrap();
        assert_eq!(back, cd);

        let empty: Compilation = compilation
            .parse_node(&Element::new("compilation"), &registry, &Options::new())
            .unwrap();
        assert!(empty.bands.is_empty());
    }

    #[test]
    fn xml_attributes_and_root() {
        #[derive(Clone, Default)]
        struct Link {
            href: Option<String>,
            title: Option<String>,
        }
        impl_model!(Link { href, title });

        let registry = Registry::new();
        let representer = Representer::builder("Link")
            .property(Definition::new("href").from("@href"))
            .property(Definition::new("title").attribute(true))
            .build();

        let link = Link {
            href: Some("http://apotomo.de/".into()),
            title: None,
        };
        let node = representer.to_node(&link, &registry, &Options::new()).unwrap();
        assert_eq!(node.name(), "link");
        assert_eq!(node.attribute("href"), Some("http://apotomo.de/"));
        assert_eq!(node.attribute("title"), None);

        let input = Element::new("a")
            .with_attribute("href", "http://apotomo.de")
            .with_attribute("title", "Home, sweet home");
        let parsed: Link = representer.parse_node(&input, &registry, &Options::new()).unwrap();
        assert_eq!(parsed.href.as_deref(), Some("http://apotomo.de"));
        assert_eq!(parsed.title.as_deref(), Some("Home, sweet home"));

        let group = representer
            .to_node(&link, &registry, &Options::new().wrap("group"))
            .unwrap();
        assert_eq!(group.name(), "group");
    }

    #[test]
    fn model_slots() {
        let band = nofx();
        let slot = Slot::Model(band.clone_model());
        assert_eq!(slot.kind_name(), "model `Band`");
        let back: Band = slot.into_model().unwrap();
        assert_eq!(back, band);
    }
}
