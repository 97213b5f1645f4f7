//! Per-call decode state handed to decoder functions.
//!
//! A [`Context`] describes the field currently being decoded and gives access to the
//! [`DataStore`] shared by every decoder within one top-level decode call. Decoders only
//! receive `&mut Context` for the duration of their own invocation.

use std::any::Any;
use std::collections::HashMap;

use crate::error::{DecoderKind, FieldPosition};
use crate::record::Tags;
use crate::value::Value;

/// Scratch space decoders use to communicate within one decode call tree.
///
/// Globals are keyed by a plain string. Locals are additionally scoped by the declared
/// identifier of a field. The zero value is ready to use.
#[derive(Debug, Default)]
pub struct DataStore {
    globals: HashMap<String, Value>,
    locals: HashMap<String, HashMap<String, Value>>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global datum `key`, replacing any previous value.
    pub fn set_global<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.globals.insert(key.into(), Value::new(value));
    }

    /// The global datum `key`, if present and of type `T`.
    pub fn global<T: Any>(&self, key: &str) -> Option<&T> {
        self.globals.get(key).and_then(Value::downcast_ref)
    }

    pub fn global_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.globals.get_mut(key).and_then(Value::downcast_mut)
    }

    /// The global datum `key` regardless of its type.
    pub fn global_value(&self, key: &str) -> Option<&Value> {
        self.globals.get(key)
    }

    pub fn remove_global(&mut self, key: &str) -> Option<Value> {
        self.globals.remove(key)
    }

    /// Set the datum `key` local to `field`.
    pub fn set_local<T: Any + Send>(&mut self, field: impl Into<String>, key: impl Into<String>, value: T) {
        self.locals
            .entry(field.into())
            .or_default()
            .insert(key.into(), Value::new(value));
    }

    pub fn local<T: Any>(&self, field: &str, key: &str) -> Option<&T> {
        self.locals
            .get(field)
            .and_then(|locals| locals.get(key))
            .and_then(Value::downcast_ref)
    }

    pub fn local_mut<T: Any>(&mut self, field: &str, key: &str) -> Option<&mut T> {
        self.locals
            .get_mut(field)
            .and_then(|locals| locals.get_mut(key))
            .and_then(Value::downcast_mut)
    }

    pub fn local_value(&self, field: &str, key: &str) -> Option<&Value> {
        self.locals.get(field).and_then(|locals| locals.get(key))
    }

    pub fn remove_local(&mut self, field: &str, key: &str) -> Option<Value> {
        self.locals.get_mut(field).and_then(|locals| locals.remove(key))
    }

    pub fn is_empty(&self) -> bool {
        self.globals.is_empty() && self.locals.values().all(HashMap::is_empty)
    }

    pub fn clear(&mut self) {
        self.globals.clear();
        self.locals.clear();
    }
}

/// The field being decoded, plus the shared [`DataStore`].
///
/// Positional state is updated field by field as the engine walks a record.
#[derive(Debug)]
pub struct Context<'a> {
    pub(crate) position: FieldPosition,
    data: &'a mut DataStore,
}

impl<'a> Context<'a> {
    pub(crate) fn new(data: &'a mut DataStore) -> Self {
        Self {
            position: FieldPosition::default(),
            data,
        }
    }

    /// Declared identifier of the field being decoded.
    pub fn field(&self) -> &'static str {
        self.position.field.unwrap_or_default()
    }

    pub fn tags(&self) -> Tags {
        self.position.tags
    }

    /// Source key being read.
    pub fn key(&self) -> &str {
        self.position.key.as_deref().unwrap_or_default()
    }

    /// Name of the decoder being run.
    pub fn decoder(&self) -> &str {
        self.position.decoder.as_deref().unwrap_or_default()
    }

    pub fn kind(&self) -> DecoderKind {
        self.position.kind
    }

    /// `true` for single-value decoders, `false` for multi-value decoders.
    pub fn is_single(&self) -> bool {
        self.position.kind == DecoderKind::Single
    }

    pub fn position(&self) -> &FieldPosition {
        &self.position
    }

    pub fn global<T: Any>(&self, key: &str) -> Option<&T> {
        self.data.global(key)
    }

    pub fn global_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.data.global_mut(key)
    }

    pub fn set_global<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.data.set_global(key, value);
    }

    /// Datum `key` local to the current field.
    pub fn local<T: Any>(&self, key: &str) -> Option<&T> {
        self.data.local(self.field(), key)
    }

    pub fn local_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        let field = self.field();
        self.data.local_mut(field, key)
    }

    pub fn set_local<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        let field = self.field();
        self.data.set_local(field, key, value);
    }

    pub fn data(&self) -> &DataStore {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut DataStore {
        &mut *self.data
    }
}
