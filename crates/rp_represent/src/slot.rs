use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use rp_document::Value;
use rp_utils::case::last_segment;

use crate::{Model, RepresentError};

// -----------------------------------------------------------------------------
// Slot

/// The native value of one model property.
///
/// A slot is what [`Model::get_property`] hands out and what
/// [`Model::set_property`] accepts. Scalars are carried as document
/// [`Value`]s, nested objects as boxed models, collections and maps as
/// slots of slots.
pub enum Slot {
    Nil,
    Value(Value),
    Model(Box<dyn Model>),
    List(Vec<Slot>),
    Map(Vec<(String, Slot)>),
}

impl Slot {
    /// Returns `true` for [`Slot::Nil`] and for a nil [`Value`].
    #[inline]
    pub fn is_nil(&self) -> bool {
        match self {
            Slot::Nil => true,
            Slot::Value(value) => value.is_nil(),
            _ => false,
        }
    }

    /// A short description of the slot, used in mismatch errors.
    pub fn kind_name(&self) -> Cow<'static, str> {
        match self {
            Slot::Nil => Cow::Borrowed("null"),
            Slot::Value(value) => Cow::Borrowed(value.kind().as_str()),
            Slot::Model(model) => Cow::Owned(format!("model `{}`", model.type_name())),
            Slot::List(_) => Cow::Borrowed("list"),
            Slot::Map(_) => Cow::Borrowed("map"),
        }
    }

    #[inline]
    pub fn as_model(&self) -> Option<&dyn Model> {
        match self {
            Slot::Model(model) => Some(&**model),
            _ => None,
        }
    }

    /// Converts a model-free slot into a document value.
    ///
    /// Lists and maps convert element-wise; any nested model is an error, as
    /// it needs a representer to become a document.
    pub fn into_value(self) -> Result<Value, RepresentError> {
        match self {
            Slot::Nil => Ok(Value::Nil),
            Slot::Value(value) => Ok(value),
            Slot::Model(model) => Err(RepresentError::mismatch(
                "value",
                format!("model `{}`", model.type_name()),
            )),
            Slot::List(items) => items
                .into_iter()
                .map(Slot::into_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Slot::Map(entries) => {
                let mut map = rp_document::Map::with_capacity(entries.len());
                for (key, slot) in entries {
                    map.insert(key, slot.into_value()?);
                }
                Ok(Value::Map(map))
            }
        }
    }

    /// Returns the members of an ordered sequence.
    ///
    /// A list value is split into value slots; anything else is a
    /// [`RepresentError::TypeMismatch`] naming `enumerable`.
    pub fn into_items(self) -> Result<Vec<Slot>, RepresentError> {
        match self {
            Slot::List(items) => Ok(items),
            Slot::Value(Value::List(items)) => Ok(items.into_iter().map(Slot::from).collect()),
            other => Err(RepresentError::mismatch("enumerable", other.kind_name())),
        }
    }

    /// Returns the `(key, member)` pairs of a map, in order.
    pub fn into_entries(self) -> Result<Vec<(String, Slot)>, RepresentError> {
        match self {
            Slot::Map(entries) => Ok(entries),
            Slot::Value(Value::Map(map)) => Ok(map
                .into_iter()
                .map(|(key, value)| (key, Slot::from(value)))
                .collect()),
            other => Err(RepresentError::mismatch("map", other.kind_name())),
        }
    }

    /// Takes the model out of the slot if it is a `T`.
    pub fn into_model<T: Model>(self) -> Result<T, RepresentError> {
        let expected = || format!("model `{}`", last_segment(core::any::type_name::<T>()));
        match self {
            Slot::Model(model) => {
                let found = model.kind_name();
                match model.downcast::<T>() {
                    Some(model) => Ok(*model),
                    None => Err(RepresentError::mismatch(expected(), found)),
                }
            }
            other => Err(RepresentError::mismatch(expected(), other.kind_name())),
        }
    }
}

impl Clone for Slot {
    fn clone(&self) -> Self {
        match self {
            Slot::Nil => Slot::Nil,
            Slot::Value(value) => Slot::Value(value.clone()),
            Slot::Model(model) => Slot::Model(model.clone_model()),
            Slot::List(items) => Slot::List(items.clone()),
            Slot::Map(entries) => Slot::Map(entries.clone()),
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Nil => f.write_str("Nil"),
            Slot::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Slot::Model(model) => f.debug_tuple("Model").field(model).finish(),
            Slot::List(items) => f.debug_list().entries(items).finish(),
            Slot::Map(entries) => f
                .debug_map()
                .entries(entries.iter().map(|(k, v)| (k, v)))
                .finish(),
        }
    }
}

impl From<Value> for Slot {
    #[inline]
    fn from(value: Value) -> Self {
        match value {
            Value::Nil => Slot::Nil,
            value => Slot::Value(value),
        }
    }
}

impl From<Box<dyn Model>> for Slot {
    #[inline]
    fn from(model: Box<dyn Model>) -> Self {
        Slot::Model(model)
    }
}

// -----------------------------------------------------------------------------
// IntoSlot / FromSlot

/// Reads a field into a [`Slot`].
pub trait IntoSlot {
    fn to_slot(&self) -> Slot;
}

/// Builds a field from a [`Slot`].
///
/// Scalars accept their textual form as well, since markup documents carry
/// every scalar as text.
pub trait FromSlot: Sized {
    fn from_slot(slot: Slot) -> Result<Self, RepresentError>;
}

#[inline]
fn scalar(slot: Slot, expected: &'static str) -> Result<Value, RepresentError> {
    match slot {
        Slot::Value(value) if value.is_scalar() => Ok(value),
        other => Err(RepresentError::mismatch(expected, other.kind_name())),
    }
}

impl IntoSlot for String {
    #[inline]
    fn to_slot(&self) -> Slot {
        Slot::Value(Value::Text(self.clone()))
    }
}

impl FromSlot for String {
    fn from_slot(slot: Slot) -> Result<Self, RepresentError> {
        match scalar(slot, "text")? {
            Value::Text(text) => Ok(text),
            other => other
                .scalar_text()
                .ok_or_else(|| RepresentError::mismatch("text", other.kind().as_str())),
        }
    }
}

impl IntoSlot for bool {
    #[inline]
    fn to_slot(&self) -> Slot {
        Slot::Value(Value::Bool(*self))
    }
}

impl FromSlot for bool {
    fn from_slot(slot: Slot) -> Result<Self, RepresentError> {
        match scalar(slot, "bool")? {
            Value::Bool(v) => Ok(v),
            Value::Text(text) => match text.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(RepresentError::mismatch("bool", format!("text `{text}`"))),
            },
            other => Err(RepresentError::mismatch("bool", other.kind().as_str())),
        }
    }
}

// Floats that convert to an integer exactly: `i64::MIN` up to, not including, 2^64.
const INTEGRAL_FLOATS: core::ops::Range<f64> = i64::MIN as f64..18_446_744_073_709_551_616.0;

macro_rules! impl_int_slot {
    (lossless: $($ty:ty),*) => {$(
        impl IntoSlot for $ty {
            #[inline]
            fn to_slot(&self) -> Slot {
                Slot::Value(Value::Int(i64::from(*self)))
            }
        }
        impl_int_slot!(@from $ty);
    )*};
    (unsigned: $($ty:ty),*) => {$(
        impl IntoSlot for $ty {
            #[inline]
            fn to_slot(&self) -> Slot {
                Slot::Value(Value::from(*self as u64))
            }
        }
        impl_int_slot!(@from $ty);
    )*};
    (signed: $($ty:ty),*) => {$(
        impl IntoSlot for $ty {
            #[inline]
            fn to_slot(&self) -> Slot {
                Slot::Value(Value::Int(*self as i64))
            }
        }
        impl_int_slot!(@from $ty);
    )*};
    (@from $ty:ty) => {
        impl FromSlot for $ty {
            fn from_slot(slot: Slot) -> Result<Self, RepresentError> {
                let expected = stringify!($ty);
                let int = match scalar(slot, expected)? {
                    Value::Int(v) => i128::from(v),
                    Value::UInt(v) => i128::from(v),
                    Value::Float(v) if v.fract() == 0.0 => {
                        if !INTEGRAL_FLOATS.contains(&v) {
                            return Err(RepresentError::mismatch(
                                expected,
                                format!("out of range float {v}"),
                            ));
                        }
                        v as i128
                    }
                    Value::Text(text) => {
                        return text.trim().parse::<$ty>().map_err(|_| {
                            RepresentError::mismatch(expected, format!("text `{text}`"))
                        });
                    }
                    other => return Err(RepresentError::mismatch(expected, other.kind().as_str())),
                };
                <$ty>::try_from(int).map_err(|_| {
                    RepresentError::mismatch(expected, format!("out of range integer {int}"))
                })
            }
        }
    };
}

impl_int_slot!(lossless: i8, i16, i32, i64, u8, u16, u32);
impl_int_slot!(unsigned: u64, usize);
impl_int_slot!(signed: isize);

macro_rules! impl_float_slot {
    ($($ty:ty),*) => {$(
        impl IntoSlot for $ty {
            #[inline]
            fn to_slot(&self) -> Slot {
                Slot::Value(Value::Float(f64::from(*self)))
            }
        }

        impl FromSlot for $ty {
            fn from_slot(slot: Slot) -> Result<Self, RepresentError> {
                let expected = stringify!($ty);
                match scalar(slot, expected)? {
                    Value::Float(v) => Ok(v as $ty),
                    Value::Int(v) => Ok(v as $ty),
                    Value::UInt(v) => Ok(v as $ty),
                    Value::Text(text) => text.trim().parse::<$ty>().map_err(|_| {
                        RepresentError::mismatch(expected, format!("text `{text}`"))
                    }),
                    other => Err(RepresentError::mismatch(expected, other.kind().as_str())),
                }
            }
        }
    )*};
}

impl_float_slot!(f32, f64);

impl IntoSlot for Value {
    #[inline]
    fn to_slot(&self) -> Slot {
        Slot::from(self.clone())
    }
}

impl FromSlot for Value {
    #[inline]
    fn from_slot(slot: Slot) -> Result<Self, RepresentError> {
        slot.into_value()
    }
}

impl IntoSlot for Slot {
    #[inline]
    fn to_slot(&self) -> Slot {
        self.clone()
    }
}

impl FromSlot for Slot {
    #[inline]
    fn from_slot(slot: Slot) -> Result<Self, RepresentError> {
        Ok(slot)
    }
}

impl IntoSlot for Box<dyn Model> {
    #[inline]
    fn to_slot(&self) -> Slot {
        Slot::Model(self.clone_model())
    }
}

impl FromSlot for Box<dyn Model> {
    fn from_slot(slot: Slot) -> Result<Self, RepresentError> {
        match slot {
            Slot::Model(model) => Ok(model),
            other => Err(RepresentError::mismatch("model", other.kind_name())),
        }
    }
}

impl<T: IntoSlot> IntoSlot for Option<T> {
    #[inline]
    fn to_slot(&self) -> Slot {
        match self {
            Some(v) => v.to_slot(),
            None => Slot::Nil,
        }
    }
}

impl<T: FromSlot> FromSlot for Option<T> {
    #[inline]
    fn from_slot(slot: Slot) -> Result<Self, RepresentError> {
        if slot.is_nil() {
            Ok(None)
        } else {
            T::from_slot(slot).map(Some)
        }
    }
}

impl<T: IntoSlot> IntoSlot for Vec<T> {
    fn to_slot(&self) -> Slot {
        Slot::List(self.iter().map(IntoSlot::to_slot).collect())
    }
}

impl<T: FromSlot> FromSlot for Vec<T> {
    /// A nil slot becomes an empty vector.
    fn from_slot(slot: Slot) -> Result<Self, RepresentError> {
        if slot.is_nil() {
            return Ok(Vec::new());
        }
        slot.into_items()?.into_iter().map(T::from_slot).collect()
    }
}

impl<T: IntoSlot> IntoSlot for BTreeMap<String, T> {
    fn to_slot(&self) -> Slot {
        Slot::Map(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_slot()))
                .collect(),
        )
    }
}

impl<T: FromSlot> FromSlot for BTreeMap<String, T> {
    fn from_slot(slot: Slot) -> Result<Self, RepresentError> {
        if slot.is_nil() {
            return Ok(BTreeMap::new());
        }
        slot.into_entries()?
            .into_iter()
            .map(|(key, value)| T::from_slot(value).map(|value| (key, value)))
            .collect()
    }
}
