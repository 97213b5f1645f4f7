//! Field descriptors: how a record exposes its fields, tags and storage to the engine.
//!
//! A [`Record`] lists its fields in declaration order. Each [`Field`] carries the declared
//! identifier, a static [`Tags`] set and a [`Slot`] giving mutable access to the storage.
//! Most records implement [`Record`] through the [`crate::record!`] macro.

use std::fmt;

use crate::value::{Decodable, FieldValue};

/// Ordered, static `(key, value)` metadata attached to a field.
///
/// An entry with an empty value reads as absent.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Tags(&'static [(&'static str, &'static str)]);

impl Tags {
    /// Tag set without any entry.
    pub const EMPTY: Self = Self(&[]);

    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self(entries)
    }

    /// Value of the first entry named `key`, ignoring empty values.
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tags({self})")
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value:?}")?;
        }
        Ok(())
    }
}

/// A structured value whose fields can be decoded by [`crate::TagDecoder`].
pub trait Record {
    /// Descriptors of all fields, in declaration order.
    ///
    /// Called once per decode pass; the borrows in the returned fields must be disjoint.
    fn fields(&mut self) -> Vec<Field<'_>>;
}

/// A record stored by value inside another record.
pub trait RecordSlot {
    fn record_mut(&mut self) -> &mut dyn Record;
    fn as_field_value(&mut self) -> &mut dyn FieldValue;
}

impl<R: Record + Decodable> RecordSlot for R {
    fn record_mut(&mut self) -> &mut dyn Record {
        self
    }

    fn as_field_value(&mut self) -> &mut dyn FieldValue {
        self
    }
}

/// An optional, boxed record: the equivalent of a nullable reference to a record.
pub trait OptionalRecord {
    fn is_none(&self) -> bool;

    /// The nested record, materialized with `Default` when absent.
    ///
    /// An existing record is returned as is, never replaced.
    fn record_or_insert(&mut self) -> &mut dyn Record;

    fn as_field_value(&mut self) -> &mut dyn FieldValue;
}

impl<R: Record + Decodable> OptionalRecord for Option<Box<R>> {
    fn is_none(&self) -> bool {
        Option::is_none(self)
    }

    fn record_or_insert(&mut self) -> &mut dyn Record {
        &mut **self.get_or_insert_with(Box::default)
    }

    fn as_field_value(&mut self) -> &mut dyn FieldValue {
        self
    }
}

/// Mutable access to the storage of one field.
pub enum Slot<'a> {
    /// A leaf value.
    Value(&'a mut dyn FieldValue),
    /// A nested record held by value.
    Record(&'a mut dyn RecordSlot),
    /// A nested record behind `Option<Box<_>>`.
    Optional(&'a mut dyn OptionalRecord),
}

impl<'a> Slot<'a> {
    /// The slot seen as a plain assignable value.
    pub fn into_value(self) -> &'a mut dyn FieldValue {
        match self {
            Slot::Value(value) => value,
            Slot::Record(record) => record.as_field_value(),
            Slot::Optional(optional) => optional.as_field_value(),
        }
    }
}

/// One field of a [`Record`].
pub struct Field<'a> {
    pub(crate) name: &'static str,
    pub(crate) tags: Tags,
    pub(crate) slot: Slot<'a>,
}

impl<'a> Field<'a> {
    /// A leaf field.
    pub fn value<T: Decodable>(name: &'static str, tags: Tags, target: &'a mut T) -> Self {
        Self {
            name,
            tags,
            slot: Slot::Value(target),
        }
    }

    /// A nested record held by value.
    pub fn record<R: Record + Decodable>(name: &'static str, tags: Tags, target: &'a mut R) -> Self {
        Self {
            name,
            tags,
            slot: Slot::Record(target),
        }
    }

    /// A nested record behind `Option<Box<_>>`.
    pub fn optional<R: Record + Decodable>(
        name: &'static str,
        tags: Tags,
        target: &'a mut Option<Box<R>>,
    ) -> Self {
        Self {
            name,
            tags,
            slot: Slot::Optional(target),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tags(&self) -> Tags {
        self.tags
    }

    pub fn slot(&self) -> &Slot<'a> {
        &self.slot
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.slot {
            Slot::Value(_) => "value",
            Slot::Record(_) => "record",
            Slot::Optional(_) => "optional",
        };
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("slot", &kind)
            .finish()
    }
}
