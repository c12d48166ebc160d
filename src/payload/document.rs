//! Fixed-capacity JSON document.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use super::{ByteCounter, PayloadError};
use crate::telemetry::Value;

/// Root of a [`JsonDocument`].
#[derive(Clone, Debug, Default, PartialEq)]
enum Root<'a> {
    #[default]
    Empty,
    Scalar(Value<'a>),
    Object(Vec<(&'a str, Value<'a>)>),
}

impl Root<'_> {
    fn describe(&self) -> &'static str {
        match self {
            Root::Empty => "null",
            Root::Scalar(_) => "scalar",
            Root::Object(_) => "object",
        }
    }
}

/// JSON value tree holding at most `capacity` object fields.
///
/// The root starts empty. Writing a field turns it into an object; writing a
/// scalar turns it into a bare value. Fields keep insertion order, and
/// assigning an existing key overwrites it without consuming capacity.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonDocument<'a> {
    capacity: usize,
    root: Root<'a>,
}

impl<'a> JsonDocument<'a> {
    /// Create an empty document able to hold `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            root: Root::Empty,
        }
    }

    /// Maximum number of fields the document accepts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of object fields currently held (a scalar root counts as zero).
    pub fn len(&self) -> usize {
        match &self.root {
            Root::Object(fields) => fields.len(),
            _ => 0,
        }
    }

    /// True while nothing has been written.
    pub fn is_empty(&self) -> bool {
        matches!(self.root, Root::Empty)
    }

    /// Set `key` to `value` on the root object.
    ///
    /// # Errors
    ///
    /// * [`PayloadError::TypeMismatch`] if the root is a scalar.
    /// * [`PayloadError::CapacityExceeded`] if `key` is new and the document
    ///   is full.
    /// * [`PayloadError::NonFiniteNumber`] for NaN or infinite floats.
    pub fn set_field(&mut self, key: &'a str, value: Value<'a>) -> Result<(), PayloadError> {
        value.check_representable()?;
        if matches!(self.root, Root::Scalar(_)) {
            return Err(PayloadError::TypeMismatch {
                attempted: "field",
                found: self.root.describe(),
            });
        }
        if let Root::Object(fields) = &mut self.root
            && let Some(slot) = fields.iter_mut().find(|(k, _)| *k == key)
        {
            slot.1 = value;
            return Ok(());
        }
        if self.len() >= self.capacity {
            return Err(PayloadError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if let Root::Object(fields) = &mut self.root {
            fields.push((key, value));
        } else {
            self.root = Root::Object(vec![(key, value)]);
        }
        Ok(())
    }

    /// Replace the root with a bare scalar.
    ///
    /// # Errors
    ///
    /// * [`PayloadError::TypeMismatch`] if fields were already written.
    /// * [`PayloadError::NonFiniteNumber`] for NaN or infinite floats.
    pub fn set_scalar(&mut self, value: Value<'a>) -> Result<(), PayloadError> {
        value.check_representable()?;
        if let Root::Object(fields) = &self.root
            && !fields.is_empty()
        {
            return Err(PayloadError::TypeMismatch {
                attempted: "scalar",
                found: self.root.describe(),
            });
        }
        self.root = Root::Scalar(value);
        Ok(())
    }

    /// Exact length in bytes of the serialised document.
    pub fn measure(&self) -> Result<usize, PayloadError> {
        let mut counter = ByteCounter::default();
        serde_json::to_writer(&mut counter, self)?;
        Ok(counter.count())
    }
}

impl Serialize for JsonDocument<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.root {
            Root::Empty => serializer.serialize_unit(),
            Root::Scalar(value) => value.serialize(serializer),
            Root::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn doc() -> JsonDocument<'static> {
        JsonDocument::with_capacity(2)
    }

    fn to_json(doc: &JsonDocument<'_>) -> String {
        serde_json::to_string(doc).expect("serialise")
    }

    #[rstest]
    fn empty_document_serialises_as_null(doc: JsonDocument<'static>) {
        assert!(doc.is_empty());
        assert_eq!(to_json(&doc), "null");
        assert_eq!(doc.measure().expect("measure"), 4);
    }

    #[rstest]
    fn fields_keep_insertion_order(mut doc: JsonDocument<'static>) {
        doc.set_field("b", Value::Int(1)).expect("first");
        doc.set_field("a", Value::Bool(false)).expect("second");
        assert_eq!(to_json(&doc), r#"{"b":1,"a":false}"#);
        assert_eq!(doc.len(), 2);
    }

    #[rstest]
    fn existing_key_is_overwritten_in_place(mut doc: JsonDocument<'static>) {
        doc.set_field("a", Value::Int(1)).expect("first");
        doc.set_field("b", Value::Int(2)).expect("second");
        doc.set_field("a", Value::Str("x")).expect("overwrite at capacity");
        assert_eq!(to_json(&doc), r#"{"a":"x","b":2}"#);
    }

    #[rstest]
    fn new_key_beyond_capacity_fails(mut doc: JsonDocument<'static>) {
        doc.set_field("a", Value::Int(1)).expect("first");
        doc.set_field("b", Value::Int(2)).expect("second");
        let err = doc.set_field("c", Value::Int(3)).expect_err("full");
        assert!(matches!(err, PayloadError::CapacityExceeded { capacity: 2 }));
        assert_eq!(to_json(&doc), r#"{"a":1,"b":2}"#);
    }

    #[rstest]
    fn field_into_scalar_root_is_a_type_mismatch(mut doc: JsonDocument<'static>) {
        doc.set_scalar(Value::UInt(9)).expect("scalar");
        let err = doc.set_field("a", Value::Int(1)).expect_err("mismatch");
        assert!(matches!(
            err,
            PayloadError::TypeMismatch {
                attempted: "field",
                found: "scalar"
            }
        ));
    }

    #[rstest]
    fn scalar_into_populated_object_is_a_type_mismatch(mut doc: JsonDocument<'static>) {
        doc.set_field("a", Value::Int(1)).expect("field");
        let err = doc.set_scalar(Value::Int(2)).expect_err("mismatch");
        assert!(matches!(err, PayloadError::TypeMismatch { .. }));
    }

    #[rstest]
    fn scalar_may_be_replaced(mut doc: JsonDocument<'static>) {
        doc.set_scalar(Value::Int(1)).expect("first");
        doc.set_scalar(Value::Str("two")).expect("second");
        assert_eq!(to_json(&doc), r#""two""#);
        assert_eq!(doc.len(), 0);
    }

    #[rstest]
    fn zero_capacity_rejects_any_field() {
        let mut doc = JsonDocument::with_capacity(0);
        assert!(doc.set_field("a", Value::Int(1)).is_err());
        assert!(doc.is_empty());
    }

    #[rstest]
    fn huge_capacity_does_not_preallocate() {
        let mut doc = JsonDocument::with_capacity(usize::MAX);
        doc.set_field("a", Value::Int(1)).expect("field");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.capacity(), usize::MAX);
    }

    #[rstest]
    fn measure_matches_serialised_length(mut doc: JsonDocument<'static>) {
        doc.set_field("temp", Value::Real(21.5)).expect("field");
        doc.set_field("unit", Value::Str("°C")).expect("field");
        assert_eq!(doc.measure().expect("measure"), to_json(&doc).len());
    }
}
