//! Installed provider inventory record
//!
//! After a provider's components are applied, a `Provider` object is written
//! to the target namespace so later upgrade and delete operations know what
//! is installed, at which version, and what it watches.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::labels::{CLUSTERCTL_GROUP_VERSION, provider_labels};
use crate::provider::Provider;

/// Metadata of a provider record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// The clusterctl `Provider` inventory object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub api_version: String,
    pub kind: String,
    pub metadata: RecordMetadata,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub version: String,
    /// Namespace the provider controller watches; empty means all namespaces
    #[serde(default)]
    pub watched_namespace: String,
}

impl ProviderRecord {
    pub fn new(
        provider: &Provider,
        version: &str,
        target_namespace: &str,
        watching_namespace: &str,
    ) -> Self {
        Self {
            api_version: CLUSTERCTL_GROUP_VERSION.to_string(),
            kind: "Provider".to_string(),
            metadata: RecordMetadata {
                name: provider.name.clone(),
                namespace: target_namespace.to_string(),
                labels: provider_labels(&provider.name),
            },
            provider_type: provider.provider_type.to_string(),
            version: version.to_string(),
            watched_namespace: watching_namespace.to_string(),
        }
    }
}
