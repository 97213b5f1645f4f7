//! Lookup sources the engine reads raw strings from.
//!
//! A [`SingleSource`] returns at most one string per key, a [`MultiSource`] a list of
//! strings. A [`Source`] is anything implementing both. Maps implement one capability each;
//! [`SplitSource`] and [`Synthesized`] combine them.

use std::collections::{BTreeMap, HashMap};

/// A source of single string values.
pub trait SingleSource {
    /// The value stored under `key`, or `None` when the key does not exist.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// A source of string lists.
pub trait MultiSource {
    /// The values stored under `key`, or `None` when the key does not exist.
    fn lookup_all(&self, key: &str) -> Option<Vec<String>>;
}

/// A source providing both capabilities.
pub trait Source: SingleSource + MultiSource {}

impl<T: SingleSource + MultiSource + ?Sized> Source for T {}

impl<T: SingleSource + ?Sized> SingleSource for &T {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

impl<T: MultiSource + ?Sized> MultiSource for &T {
    fn lookup_all(&self, key: &str) -> Option<Vec<String>> {
        (**self).lookup_all(key)
    }
}

impl SingleSource for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl SingleSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl SingleSource for HashMap<&str, &str> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| (*v).to_owned())
    }
}

impl MultiSource for HashMap<String, Vec<String>> {
    fn lookup_all(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).cloned()
    }
}

impl MultiSource for BTreeMap<String, Vec<String>> {
    fn lookup_all(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).cloned()
    }
}

impl MultiSource for HashMap<&str, Vec<&str>> {
    fn lookup_all(&self, key: &str) -> Option<Vec<String>> {
        self.get(key)
            .map(|values| values.iter().map(|v| (*v).to_owned()).collect())
    }
}

/// A source without any data.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSource;

impl SingleSource for NoSource {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

impl MultiSource for NoSource {
    fn lookup_all(&self, _key: &str) -> Option<Vec<String>> {
        None
    }
}

/// Independent single and multi components; a missing component always reports absence.
#[derive(Clone, Debug)]
pub struct SplitSource<S = NoSource, M = NoSource> {
    pub single: Option<S>,
    pub multi: Option<M>,
}

impl<S, M> Default for SplitSource<S, M> {
    fn default() -> Self {
        Self {
            single: None,
            multi: None,
        }
    }
}

impl<S, M> SplitSource<S, M> {
    pub fn new(single: S, multi: M) -> Self {
        Self {
            single: Some(single),
            multi: Some(multi),
        }
    }
}

impl<S: SingleSource> SplitSource<S, NoSource> {
    /// Only the single capability; every multi lookup reports absence.
    pub fn single_only(single: S) -> Self {
        Self {
            single: Some(single),
            multi: None,
        }
    }
}

impl<M: MultiSource> SplitSource<NoSource, M> {
    /// Only the multi capability; every single lookup reports absence.
    pub fn multi_only(multi: M) -> Self {
        Self {
            single: None,
            multi: Some(multi),
        }
    }
}

impl<S: SingleSource, M> SingleSource for SplitSource<S, M> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.single.as_ref()?.lookup(key)
    }
}

impl<S, M: MultiSource> MultiSource for SplitSource<S, M> {
    fn lookup_all(&self, key: &str) -> Option<Vec<String>> {
        self.multi.as_ref()?.lookup_all(key)
    }
}

/// Like [`SplitSource`], but a missing answer is synthesized from the other component:
/// a single value falls back to the first of the multi values, and a multi lookup falls back
/// to a singleton list holding the single value.
#[derive(Clone, Debug)]
pub struct Synthesized<S = NoSource, M = NoSource> {
    pub single: Option<S>,
    pub multi: Option<M>,
}

impl<S, M> Default for Synthesized<S, M> {
    fn default() -> Self {
        Self {
            single: None,
            multi: None,
        }
    }
}

impl<S, M> Synthesized<S, M> {
    pub fn new(single: S, multi: M) -> Self {
        Self {
            single: Some(single),
            multi: Some(multi),
        }
    }
}

impl<S: SingleSource> Synthesized<S, NoSource> {
    pub fn from_single(single: S) -> Self {
        Self {
            single: Some(single),
            multi: None,
        }
    }
}

impl<M: MultiSource> Synthesized<NoSource, M> {
    pub fn from_multi(multi: M) -> Self {
        Self {
            single: None,
            multi: Some(multi),
        }
    }
}

impl<S: SingleSource, M: MultiSource> SingleSource for Synthesized<S, M> {
    fn lookup(&self, key: &str) -> Option<String> {
        if let Some(value) = self.single.as_ref().and_then(|s| s.lookup(key)) {
            return Some(value);
        }
        self.multi
            .as_ref()?
            .lookup_all(key)?
            .into_iter()
            .next()
    }
}

impl<S: SingleSource, M: MultiSource> MultiSource for Synthesized<S, M> {
    fn lookup_all(&self, key: &str) -> Option<Vec<String>> {
        if let Some(values) = self.multi.as_ref().and_then(|m| m.lookup_all(key)) {
            return Some(values);
        }
        self.single.as_ref()?.lookup(key).map(|value| vec![value])
    }
}

/// Reads the process environment.
///
/// Keys are prefixed with [`EnvSource::prefix`]. Multi lookups split the variable on
/// [`EnvSource::separator`], trimming whitespace around each item.
#[cfg(feature = "env")]
#[derive(Clone, Debug)]
pub struct EnvSource {
    pub prefix: String,
    pub separator: char,
}

#[cfg(feature = "env")]
impl Default for EnvSource {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            separator: ',',
        }
    }
}

#[cfg(feature = "env")]
impl EnvSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}{key}", self.prefix)).ok()
    }
}

#[cfg(feature = "env")]
impl SingleSource for EnvSource {
    fn lookup(&self, key: &str) -> Option<String> {
        self.var(key)
    }
}

#[cfg(feature = "env")]
impl MultiSource for EnvSource {
    fn lookup_all(&self, key: &str) -> Option<Vec<String>> {
        let raw = self.var(key)?;
        if raw.is_empty() {
            return Some(Vec::new());
        }
        Some(raw.split(self.separator).map(|s| s.trim().to_owned()).collect())
    }
}
