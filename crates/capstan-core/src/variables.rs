//! Variable sources for `${VARIABLE}` placeholders in provider manifests
//!
//! Lookups are synchronous and side-effect free; the same name always yields
//! the same answer for the lifetime of a source.

use std::collections::BTreeMap;

/// Capability to resolve a variable name to its value
pub trait VariablesSource {
    /// Get the value of `name`, or `None` if it is not set
    fn get(&self, name: &str) -> Option<String>;
}

impl<T: VariablesSource + ?Sized> VariablesSource for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

impl<T: VariablesSource + ?Sized> VariablesSource for Box<T> {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

/// In-memory variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticVariables {
    values: BTreeMap<String, String>,
}

impl StaticVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, String>> for StaticVariables {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl VariablesSource for StaticVariables {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Process environment first, then a fallback set of variables
///
/// Mirrors clusterctl: OS environment variables take precedence over values
/// from the configuration file.
#[derive(Debug, Clone, Default)]
pub struct EnvVariables {
    fallback: StaticVariables,
}

impl EnvVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: StaticVariables) -> Self {
        Self { fallback }
    }
}

impl VariablesSource for EnvVariables {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name)
            .ok()
            .or_else(|| self.fallback.get(name))
    }
}
