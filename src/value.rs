//! Dynamically typed decoder results and the conversion rules applied to them.
//!
//! Decoder functions return a [`Value`]. Before it is stored in a field, the engine either
//! demands the exact declared type (strict typing) or runs [`Decodable::convert`], which
//! implements this rule table:
//!
//! | declared type            | accepted returned types                                   |
//! |--------------------------|-----------------------------------------------------------|
//! | any `T`                  | `T`                                                       |
//! | integers, `f32`, `f64`   | any integer or float, checked against the target range    |
//! | `String`                 | `&'static str`, `Box<str>`, `Cow<'static, str>`, `char`   |
//! | `PathBuf`                | whatever `String` accepts                                 |
//! | `Option<T>`, `Box<T>`    | whatever `T` accepts                                      |
//! | `Vec<T>`                 | `Vec<Value>`, `Vec<String>`, `Vec<&'static str>`, per item |
//!
//! Float to integer conversion truncates toward zero. Everything else is rejected with
//! [`ConvertError::Unsupported`].

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use num_traits::{NumCast, ToPrimitive};

use crate::error::ConvertError;
use crate::record::Record;

type RecordAccess = fn(&mut (dyn Any + Send)) -> Option<&mut dyn Record>;

/// A type-erased value produced by a decoder, or stored in a [`crate::DataStore`].
pub struct Value {
    inner: Box<dyn Any + Send>,
    type_name: &'static str,
    record: Option<RecordAccess>,
}

fn record_access<R: Record + Any>(any: &mut (dyn Any + Send)) -> Option<&mut dyn Record> {
    any.downcast_mut::<R>().map(|r| r as &mut dyn Record)
}

impl Value {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: type_name::<T>(),
            record: None,
        }
    }

    /// Shorthand for `Some(Value::new(value))`, the usual decoder result.
    pub fn some<T: Any + Send>(value: T) -> Option<Self> {
        Some(Self::new(value))
    }

    /// Wrap a record so that it can be used as a target of [`crate::TagDecoder::decode_value`].
    pub fn record<R: Record + Any + Send>(record: R) -> Self {
        let access: RecordAccess = record_access::<R>;
        Self {
            inner: Box::new(record),
            type_name: type_name::<R>(),
            record: Some(access),
        }
    }

    /// Name of the concrete type held.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.inner.downcast_mut::<T>()
    }

    /// Take the held value out, or get `self` back if it is not a `T`.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Value {
            inner,
            type_name,
            record,
        } = self;
        match inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Value {
                inner,
                type_name,
                record,
            }),
        }
    }

    /// The held record, when the value was built with [`Value::record`].
    pub fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        let access = self.record?;
        access(self.inner.as_mut())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.type_name)
    }
}

/// A type that can be the declared type of a decoded field.
///
/// The default `convert` only accepts the exact type, so opting a custom type in is
/// `impl Decodable for MyType {}`. `Default` supplies the zero value assigned when a
/// decoder returns no value.
pub trait Decodable: Any + Send + Default {
    fn convert(value: Value) -> Result<Self, ConvertError> {
        value.downcast::<Self>().map_err(|_| ConvertError::Unsupported)
    }
}

/// Object-safe view of a [`Decodable`] field used by the engine.
pub trait FieldValue {
    fn declared_type(&self) -> &'static str;

    /// Store `value` if it has exactly the declared type; hand it back otherwise.
    fn assign_exact(&mut self, value: Value) -> Result<(), Value>;

    /// Store `value` after running the conversion rules.
    fn assign_converted(&mut self, value: Value) -> Result<(), ConvertError>;

    /// Store the zero value of the declared type.
    fn assign_zero(&mut self);
}

impl<T: Decodable> FieldValue for T {
    fn declared_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn assign_exact(&mut self, value: Value) -> Result<(), Value> {
        *self = value.downcast::<T>()?;
        Ok(())
    }

    fn assign_converted(&mut self, value: Value) -> Result<(), ConvertError> {
        *self = T::convert(value)?;
        Ok(())
    }

    fn assign_zero(&mut self) {
        *self = T::default();
    }
}

/// A numeric value widened to the largest representation of its family.
#[derive(Clone, Copy, Debug)]
enum Number {
    Signed(i128),
    Unsigned(u128),
    Float(f64),
}

impl Number {
    fn of(value: &Value) -> Option<Self> {
        macro_rules! probe {
            ($variant:ident as $wide:ty: $($t:ty),*) => {
                $(
                    if let Some(v) = value.downcast_ref::<$t>() {
                        return Some(Number::$variant(*v as $wide));
                    }
                )*
            };
        }
        probe!(Signed as i128: i8, i16, i32, i64, i128, isize);
        probe!(Unsigned as u128: u8, u16, u32, u64, u128, usize);
        probe!(Float as f64: f32, f64);
        None
    }

    fn cast<T: NumCast>(self) -> Option<T> {
        match self {
            Number::Signed(v) => <T as NumCast>::from(v),
            Number::Unsigned(v) => <T as NumCast>::from(v),
            Number::Float(v) => <T as NumCast>::from(v),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Signed(v) => write!(f, "{v}"),
            Number::Unsigned(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

fn convert_numeric<T: Any + NumCast + ToPrimitive>(value: Value) -> Result<T, ConvertError> {
    let value = match value.downcast::<T>() {
        Ok(exact) => return Ok(exact),
        Err(value) => value,
    };
    let number = Number::of(&value).ok_or(ConvertError::Unsupported)?;
    let out_of_range = || ConvertError::OutOfRange {
        value: number.to_string(),
        target: type_name::<T>(),
    };
    let converted = number.cast::<T>().ok_or_else(out_of_range)?;
    // `NumCast` narrows f64 to f32 with `as`, which saturates to infinity.
    if let Number::Float(v) = number
        && v.is_finite()
        && converted.to_f64().is_some_and(|c| !c.is_finite())
    {
        return Err(out_of_range());
    }
    Ok(converted)
}

macro_rules! numeric_decodable {
    ($($t:ty),*) => {
        $(
            impl Decodable for $t {
                fn convert(value: Value) -> Result<Self, ConvertError> {
                    convert_numeric::<$t>(value)
                }
            }
        )*
    };
}

numeric_decodable!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Decodable for bool {}

impl Decodable for char {}

impl Decodable for String {
    fn convert(value: Value) -> Result<Self, ConvertError> {
        let value = match value.downcast::<String>() {
            Ok(exact) => return Ok(exact),
            Err(value) => value,
        };
        if let Some(s) = value.downcast_ref::<&'static str>() {
            Ok((*s).to_owned())
        } else if let Some(s) = value.downcast_ref::<Box<str>>() {
            Ok(s.to_string())
        } else if let Some(s) = value.downcast_ref::<Cow<'static, str>>() {
            Ok(s.to_string())
        } else if let Some(c) = value.downcast_ref::<char>() {
            Ok(c.to_string())
        } else {
            Err(ConvertError::Unsupported)
        }
    }
}

impl Decodable for PathBuf {
    fn convert(value: Value) -> Result<Self, ConvertError> {
        match value.downcast::<PathBuf>() {
            Ok(exact) => Ok(exact),
            Err(value) => String::convert(value).map(PathBuf::from),
        }
    }
}

impl<T: Decodable> Decodable for Option<T> {
    fn convert(value: Value) -> Result<Self, ConvertError> {
        match value.downcast::<Option<T>>() {
            Ok(exact) => Ok(exact),
            Err(value) => T::convert(value).map(Some),
        }
    }
}

impl<T: Decodable> Decodable for Box<T> {
    fn convert(value: Value) -> Result<Self, ConvertError> {
        match value.downcast::<Box<T>>() {
            Ok(exact) => Ok(exact),
            Err(value) => T::convert(value).map(Box::new),
        }
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn convert(value: Value) -> Result<Self, ConvertError> {
        let value = match value.downcast::<Vec<T>>() {
            Ok(exact) => return Ok(exact),
            Err(value) => value,
        };
        let items: Vec<Value> = match value.downcast::<Vec<Value>>() {
            Ok(items) => items,
            Err(value) => match value.downcast::<Vec<String>>() {
                Ok(items) => items.into_iter().map(Value::new).collect(),
                Err(value) => match value.downcast::<Vec<&'static str>>() {
                    Ok(items) => items.into_iter().map(Value::new).collect(),
                    Err(_) => return Err(ConvertError::Unsupported),
                },
            },
        };
        items.into_iter().map(T::convert).collect()
    }
}
