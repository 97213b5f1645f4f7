//! Named decoder functions.
//!
//! A name maps to either a single-value or a multi-value decoder. Registration is
//! unchecked; a name present in both maps (or in neither) only fails when it is resolved.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::{BoxError, RegistryError};
use crate::value::Value;

/// Result of a decoder function. `Ok(None)` means "no value".
pub type DecodeResult = Result<Option<Value>, BoxError>;

/// Decodes the single string stored under a key.
///
/// Arguments are the raw value (empty when absent), whether the key exists, and the
/// current [`Context`].
pub type SingleDecoder = Arc<dyn Fn(&str, bool, &mut Context<'_>) -> DecodeResult + Send + Sync>;

/// Decodes the list of strings stored under a key.
pub type MultiDecoder = Arc<dyn Fn(&[String], bool, &mut Context<'_>) -> DecodeResult + Send + Sync>;

/// A decoder found by [`Registry::resolve`].
#[derive(Clone, Copy)]
pub enum Resolved<'r> {
    Single(&'r SingleDecoder),
    Multi(&'r MultiDecoder),
}

impl fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Single(_) => f.write_str("Resolved::Single"),
            Resolved::Multi(_) => f.write_str("Resolved::Multi"),
        }
    }
}

/// Mapping from decoder names to decoder functions.
#[derive(Clone, Default)]
pub struct Registry {
    single: HashMap<String, SingleDecoder>,
    multi: HashMap<String, MultiDecoder>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single-value decoder under `name`.
    ///
    /// The name should not also be registered with [`Registry::register_multi`]; this is not
    /// checked here and surfaces as [`RegistryError::Ambiguous`] on first use.
    pub fn register_single<F>(&mut self, name: impl Into<String>, decoder: F) -> &mut Self
    where
        F: Fn(&str, bool, &mut Context<'_>) -> DecodeResult + Send + Sync + 'static,
    {
        self.single.insert(name.into(), Arc::new(decoder));
        self
    }

    /// Register a multi-value decoder under `name`.
    ///
    /// See [`Registry::register_single`] for the uniqueness requirement.
    pub fn register_multi<F>(&mut self, name: impl Into<String>, decoder: F) -> &mut Self
    where
        F: Fn(&[String], bool, &mut Context<'_>) -> DecodeResult + Send + Sync + 'static,
    {
        self.multi.insert(name.into(), Arc::new(decoder));
        self
    }

    /// Find the decoder registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Resolved<'_>, RegistryError> {
        match (self.single.get(name), self.multi.get(name)) {
            (Some(_), Some(_)) => Err(RegistryError::Ambiguous { name: name.to_owned() }),
            (Some(single), None) => Ok(Resolved::Single(single)),
            (None, Some(multi)) => Ok(Resolved::Multi(multi)),
            (None, None) => Err(RegistryError::Unknown { name: name.to_owned() }),
        }
    }

    /// Remove `name` from both maps.
    pub fn unregister(&mut self, name: &str) -> bool {
        let single = self.single.remove(name).is_some();
        let multi = self.multi.remove(name).is_some();
        single || multi
    }

    pub fn contains(&self, name: &str) -> bool {
        self.single.contains_key(name) || self.multi.contains_key(name)
    }

    /// All registered names, sorted and deduplicated.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .single
            .keys()
            .chain(self.multi.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut single: Vec<_> = self.single.keys().collect();
        let mut multi: Vec<_> = self.multi.keys().collect();
        single.sort_unstable();
        multi.sort_unstable();
        f.debug_struct("Registry")
            .field("single", &single)
            .field("multi", &multi)
            .finish()
    }
}
