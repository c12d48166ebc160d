//! Telemetry records and the scalar values they carry.
//!
//! A [`Telemetry`] pairs an optional key with a single [`Value`]. Records
//! borrow their key and string payloads from the caller and are consumed
//! synchronously by one send call, so they never own heap data.
//!
//! Keyed records serialise as a named field of a JSON object. Anonymous
//! records replace the document root with a bare scalar, which is how a
//! single unnamed value is posted.

use std::fmt;

use serde::ser::{Serialize, Serializer};

use crate::payload::{JsonDocument, PayloadError};

/// Scalar payload of a telemetry record.
///
/// Exactly one payload is reachable, selected by the variant. `None` carries
/// no value and serialises to nothing when written into a document.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Value<'a> {
    #[default]
    None,
    Bool(bool),
    UInt(u32),
    Int(i32),
    Real(f32),
    Str(&'a str),
}

/// Type tag reported by [`Value::kind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    None,
    Bool,
    UInt,
    Int,
    Real,
    Str,
}

impl Value<'_> {
    /// Return the type tag of the active variant.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::None => ValueKind::None,
            Self::Bool(_) => ValueKind::Bool,
            Self::UInt(_) => ValueKind::UInt,
            Self::Int(_) => ValueKind::Int,
            Self::Real(_) => ValueKind::Real,
            Self::Str(_) => ValueKind::Str,
        }
    }

    /// True when the value carries no payload.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Reject values JSON cannot represent.
    pub(crate) fn check_representable(&self) -> Result<(), PayloadError> {
        match self {
            Self::Real(v) if !v.is_finite() => Err(PayloadError::NonFiniteNumber(*v)),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::None => "none",
            ValueKind::Bool => "bool",
            ValueKind::UInt => "uint",
            ValueKind::Int => "int",
            ValueKind::Real => "float",
            ValueKind::Str => "string",
        };
        f.write_str(s)
    }
}

macro_rules! value_from {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Value<'_> {
                fn from(value: $source) -> Self {
                    Value::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

value_from!(Bool, bool, bool);
value_from!(UInt, u32, u8, u16, u32);
value_from!(Int, i32, i8, i16, i32);
value_from!(Real, f32, f32);

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Str(value)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(value: &'a String) -> Self {
        Value::Str(value.as_str())
    }
}

impl Serialize for Value<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::None => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::UInt(v) => serializer.serialize_u32(*v),
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::Real(v) => serializer.serialize_f32(*v),
            Value::Str(v) => serializer.serialize_str(v),
        }
    }
}

/// One named (or anonymous) scalar reading.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Telemetry<'a> {
    key: Option<&'a str>,
    value: Value<'a>,
}

/// Device attribute. Same shape as [`Telemetry`], posted to the attributes
/// endpoint instead.
pub type Attribute<'a> = Telemetry<'a>;

impl<'a> Telemetry<'a> {
    /// Construct a keyed record.
    pub fn new(key: &'a str, value: impl Into<Value<'a>>) -> Self {
        Self {
            key: Some(key),
            value: value.into(),
        }
    }

    /// Construct a record without a key. It serialises as a bare scalar.
    pub fn anonymous(value: impl Into<Value<'a>>) -> Self {
        Self {
            key: None,
            value: value.into(),
        }
    }

    pub fn key(&self) -> Option<&'a str> {
        self.key
    }

    pub fn value(&self) -> &Value<'a> {
        &self.value
    }

    /// Replace the payload and its type tag in one step.
    pub fn set_value(&mut self, value: impl Into<Value<'a>>) {
        self.value = value.into();
    }

    /// Write this record into `doc`.
    ///
    /// Keyed records become a named field; anonymous records set the
    /// document root to the scalar. A `None` value writes nothing.
    ///
    /// # Errors
    ///
    /// Returns the [`PayloadError`] raised by the document when the write is
    /// rejected (capacity exhausted, root type mismatch, or a non-finite
    /// float).
    pub fn serialize_keyval(&self, doc: &mut JsonDocument<'a>) -> Result<(), PayloadError> {
        if self.value.is_none() {
            return Ok(());
        }
        match self.key {
            Some(key) => doc.set_field(key, self.value),
            None => doc.set_scalar(self.value),
        }
    }
}
