use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use core::any::Any;
use core::fmt;

use crate::{RepresentError, Slot};

// -----------------------------------------------------------------------------
// Model

/// A native object whose properties are read and written by name.
///
/// Representers never touch fields directly; they go through this trait, so
/// any type can be represented once it exposes its properties. Plain structs
/// get an implementation from [`impl_model!`](crate::impl_model).
///
/// `type_name` is the name the type is registered under in a
/// [`Registry`](crate::Registry), and is used to find a representer for a
/// value whose property declares none.
pub trait Model: Any + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Returns the property value, or `None` if the model has no such property.
    fn get_property(&self, name: &str) -> Option<Slot>;

    /// Assigns a property.
    ///
    /// Fails with [`RepresentError::UnknownProperty`] for an unknown name, and
    /// with [`RepresentError::TypeMismatch`] when the slot does not fit the field.
    fn set_property(&mut self, name: &str, value: Slot) -> Result<(), RepresentError>;

    fn clone_model(&self) -> Box<dyn Model>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl dyn Model {
    #[inline]
    pub fn is<T: Model>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Model>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Downcasts the boxed model, consuming it.
    #[inline]
    pub fn downcast<T: Model>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }

    pub(crate) fn kind_name(&self) -> Cow<'static, str> {
        Cow::Owned(format!("model `{}`", self.type_name()))
    }
}

impl fmt::Debug for dyn Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ .. }}", self.type_name())
    }
}

// -----------------------------------------------------------------------------
// impl_model

/// Implements [`Model`], [`IntoSlot`](crate::IntoSlot) and
/// [`FromSlot`](crate::FromSlot) for a struct from the list of its mapped fields.
///
/// The struct must be `Clone + Send + Sync + 'static`, and every listed field
/// must implement `IntoSlot` and `FromSlot`. The type name defaults to the
/// struct's identifier; `as "Name"` overrides it.
///
/// # Examples
///
/// ```
/// use rp_represent::{impl_model, Model, Slot};
/// use rp_document::Value;
///
/// #[derive(Clone, Default)]
/// struct Band {
///     name: String,
///     label: Option<String>,
/// }
///
/// impl_model!(Band { name, label });
///
/// let mut band = Band::default();
/// band.set_property("name", Slot::from(Value::from("Nofx"))).unwrap();
///
/// assert_eq!(band.name, "Nofx");
/// assert_eq!(band.type_name(), "Band");
/// assert!(band.get_property("genre").is_none());
/// ```
#[macro_export]
macro_rules! impl_model {
    (@impl $ty:ident, $name:expr, { $($field:ident),* }) => {
        impl $crate::Model for $ty {
            #[inline]
            fn type_name(&self) -> &'static str {
                $name
            }

            fn get_property(&self, name: &str) -> ::core::option::Option<$crate::Slot> {
                match name {
                    $(::core::stringify!($field) => ::core::option::Option::Some(
                        $crate::IntoSlot::to_slot(&self.$field)
                    ),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_property(
                &mut self,
                name: &str,
                value: $crate::Slot,
            ) -> ::core::result::Result<(), $crate::RepresentError> {
                match name {
                    $(::core::stringify!($field) => {
                        self.$field = $crate::FromSlot::from_slot(value)?;
                        ::core::result::Result::Ok(())
                    })*
                    _ => ::core::result::Result::Err($crate::RepresentError::UnknownProperty {
                        type_name: $crate::__macro_exports::String::from($name),
                        property: $crate::__macro_exports::String::from(name),
                    }),
                }
            }

            #[inline]
            fn clone_model(&self) -> $crate::__macro_exports::Box<dyn $crate::Model> {
                $crate::__macro_exports::Box::new(::core::clone::Clone::clone(self))
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            #[inline]
            fn into_any(
                self: $crate::__macro_exports::Box<Self>,
            ) -> $crate::__macro_exports::Box<dyn ::core::any::Any> {
                self
            }
        }

        impl $crate::IntoSlot for $ty {
            #[inline]
            fn to_slot(&self) -> $crate::Slot {
                $crate::Slot::Model($crate::__macro_exports::Box::new(
                    ::core::clone::Clone::clone(self),
                ))
            }
        }

        impl $crate::FromSlot for $ty {
            #[inline]
            fn from_slot(
                slot: $crate::Slot,
            ) -> ::core::result::Result<Self, $crate::RepresentError> {
                slot.into_model::<Self>()
            }
        }
    };
    ($ty:ident { $($field:ident),* $(,)? }) => {
        $crate::impl_model!(@impl $ty, ::core::stringify!($ty), { $($field),* });
    };
    ($ty:ident as $name:literal { $($field:ident),* $(,)? }) => {
        $crate::impl_model!(@impl $ty, $name, { $($field),* });
    };
}
