use super::Registry;

// -----------------------------------------------------------------------------
// AutoRegistration

/// A registration function collected by [`Registry::auto_register`].
///
/// Submit one with [`auto_register!`](crate::auto_register).
pub struct AutoRegistration(pub fn(&mut Registry));

inventory::collect!(AutoRegistration);

// Only runs where `inventory` works, which is how support is detected.
fn mark_available(registry: &mut Registry) {
    registry.auto_available = true;
}

inventory::submit! {
    AutoRegistration(mark_available)
}

pub(super) fn register_all(registry: &mut Registry) {
    for registration in inventory::iter::<AutoRegistration> {
        (registration.0)(registry);
    }
}

// -----------------------------------------------------------------------------
// auto_register

/// Submits a `fn(&mut Registry)` to run on [`Registry::auto_register`].
///
/// Without the `auto_register` feature the function is never run.
///
/// # Examples
///
/// ```
/// use rp_represent::{auto_register, impl_model, Definition, Registry, Representer};
///
/// #[derive(Clone, Default)]
/// struct Band {
///     name: Option<String>,
/// }
/// impl_model!(Band { name });
///
/// fn register_band(registry: &mut Registry) {
///     registry.register::<Band>(Representer::builder("Band").property(Definition::new("name")).build());
/// }
///
/// auto_register!(register_band);
///
/// let mut registry = Registry::new();
/// if registry.auto_register() {
///     assert!(registry.contains("Band"));
/// }
/// ```
#[macro_export]
macro_rules! auto_register {
    ($func:path) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::__macro_exports::AutoRegistration($func)
        }
    };
}
