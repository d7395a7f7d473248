//! Manifest document model
//!
//! A `ManifestDocument` is a loosely-typed Kubernetes object: the well-known
//! header fields (`apiVersion`, `kind`, `metadata.name`, `metadata.namespace`,
//! `metadata.labels`) are lifted out so pipeline stages can work on any kind,
//! and everything else is kept as an open YAML tree.
//!
//! Kind-specific stages read the few fields they care about through narrow
//! views with [`ManifestDocument::field_as`] and edit the tree in place with
//! [`ManifestDocument::field_mut`], so fields they do not know survive.

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use thiserror::Error;

const API_VERSION: &str = "apiVersion";
const KIND: &str = "kind";
const METADATA: &str = "metadata";
const NAME: &str = "name";
const NAMESPACE: &str = "namespace";
const LABELS: &str = "labels";

/// Why a YAML value is not a usable manifest document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document is not a mapping")]
    NotAMapping,

    #[error("missing 'kind' field")]
    MissingKind,

    #[error("field '{field}' must be a string")]
    NotAString { field: String },

    #[error("'metadata' must be a mapping")]
    InvalidMetadata,

    #[error("label '{key}' must have a scalar value")]
    InvalidLabel { key: String },
}

/// Identity of a document within a bundle
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectIdentity {
    pub kind: String,
    pub namespace: Option<String>,
    pub name: String,
}

impl std::fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}/{}", self.kind, ns, self.name),
            None => write!(f, "{}/{}", self.kind, self.name),
        }
    }
}

/// One Kubernetes object parsed from a provider manifest
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    api_version: String,
    kind: String,
    name: String,
    namespace: Option<String>,
    labels: BTreeMap<String, String>,
    /// `metadata` entries other than name, namespace and labels
    metadata: Mapping,
    /// Top-level entries other than apiVersion, kind and metadata
    fields: Mapping,
}

impl ManifestDocument {
    /// Create an empty document of the given kind
    pub fn new(api_version: &str, kind: &str, name: &str) -> Self {
        Self {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: None,
            labels: BTreeMap::new(),
            metadata: Mapping::new(),
            fields: Mapping::new(),
        }
    }

    /// Build a document from a parsed YAML value
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Mapping(mut object) = value else {
            return Err(DocumentError::NotAMapping);
        };

        let kind = take_string(&mut object, KIND)?.ok_or(DocumentError::MissingKind)?;
        if kind.is_empty() {
            return Err(DocumentError::MissingKind);
        }
        let api_version = take_string(&mut object, API_VERSION)?.unwrap_or_default();

        let mut metadata = match object.shift_remove(METADATA) {
            None | Some(Value::Null) => Mapping::new(),
            Some(Value::Mapping(m)) => m,
            Some(_) => return Err(DocumentError::InvalidMetadata),
        };

        let name = take_string(&mut metadata, NAME)?.unwrap_or_default();
        let namespace = take_string(&mut metadata, NAMESPACE)?.filter(|ns| !ns.is_empty());
        let labels = match metadata.shift_remove(LABELS) {
            None | Some(Value::Null) => BTreeMap::new(),
            Some(Value::Mapping(m)) => parse_labels(m)?,
            Some(_) => {
                return Err(DocumentError::NotAString {
                    field: "metadata.labels".to_string(),
                });
            }
        };

        Ok(Self {
            api_version,
            kind,
            name,
            namespace,
            labels,
            metadata,
            fields: object,
        })
    }

    /// Rebuild the full YAML value
    ///
    /// Keys are emitted in a canonical order: apiVersion, kind, metadata
    /// (name, namespace, labels, then the rest) and then the remaining fields.
    pub fn to_value(&self) -> Value {
        let mut metadata = Mapping::new();
        if !self.name.is_empty() {
            metadata.insert(NAME.into(), self.name.clone().into());
        }
        if let Some(ns) = &self.namespace {
            metadata.insert(NAMESPACE.into(), ns.clone().into());
        }
        if !self.labels.is_empty() {
            let labels: Mapping = self
                .labels
                .iter()
                .map(|(k, v)| (Value::from(k.clone()), Value::from(v.clone())))
                .collect();
            metadata.insert(LABELS.into(), Value::Mapping(labels));
        }
        for (k, v) in &self.metadata {
            metadata.insert(k.clone(), v.clone());
        }

        let mut object = Mapping::new();
        if !self.api_version.is_empty() {
            object.insert(API_VERSION.into(), self.api_version.clone().into());
        }
        object.insert(KIND.into(), self.kind.clone().into());
        object.insert(METADATA.into(), Value::Mapping(metadata));
        for (k, v) in &self.fields {
            object.insert(k.clone(), v.clone());
        }
        Value::Mapping(object)
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        let namespace = namespace.into();
        self.namespace = (!namespace.is_empty()).then_some(namespace);
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    /// Merge labels into the document, overwriting existing keys
    pub fn merge_labels(&mut self, labels: &BTreeMap<String, String>) {
        for (k, v) in labels {
            self.labels.insert(k.clone(), v.clone());
        }
    }

    /// Get a top-level field other than apiVersion, kind and metadata
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    /// Read a top-level field through a narrow typed view
    ///
    /// A missing or null field is `Ok(None)`.
    pub fn field_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_yaml::Error> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_yaml::from_value(value.clone()).map(Some),
        }
    }

    /// Set a top-level field
    pub fn set_field(&mut self, key: &str, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn identity(&self) -> ObjectIdentity {
        ObjectIdentity {
            kind: self.kind.clone(),
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }
}

fn take_string(map: &mut Mapping, key: &str) -> Result<Option<String>, DocumentError> {
    match map.shift_remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(DocumentError::NotAString {
            field: key.to_string(),
        }),
    }
}

fn parse_labels(map: Mapping) -> Result<BTreeMap<String, String>, DocumentError> {
    let mut labels = BTreeMap::new();
    for (k, v) in map {
        let key = scalar_to_string(&k).ok_or_else(|| DocumentError::InvalidLabel {
            key: format!("{:?}", k),
        })?;
        let value = scalar_to_string(&v).ok_or_else(|| DocumentError::InvalidLabel {
            key: key.clone(),
        })?;
        labels.insert(key, value);
    }
    Ok(labels)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
