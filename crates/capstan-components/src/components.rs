//! Provider components
//!
//! `Components` wraps the YAML defining a provider's components (CRDs,
//! controller, RBAC, ...) after the processing steps applied to the raw
//! manifest read from the provider repository:
//!
//! 1. Replace every `${VARIABLE}` with its configured value
//! 2. Deploy all namespaced objects in the target namespace
//! 3. Prefix ClusterRoles and ClusterRoleBindings with the target namespace
//! 4. Set the namespace watched by the provider controller
//! 5. Label every object with the provider's identity

use capstan_core::{Provider, ProviderRecord, ProviderType, VariablesSource};
use std::collections::HashSet;
use tracing::info;

use crate::document::ManifestDocument;
use crate::error::{ComponentsError, Result};
use crate::labels::add_labels;
use crate::namespace::normalize_namespace;
use crate::parser::{parse_documents, render_documents};
use crate::rbac::fix_rbac;
use crate::variables::{inspect_variables, replace_variables};
use crate::watch::configure_watch_namespace;

/// Options for building a provider's components
#[derive(Debug, Clone, Default)]
pub struct ComponentsOptions {
    /// Provider version
    pub version: String,
    /// Target namespace; empty means use the Namespace embedded in the manifest
    pub target_namespace: String,
    /// Namespace the controller should watch; empty means all namespaces
    pub watching_namespace: String,
}

/// A provider's components, ready to be installed
#[derive(Debug, Clone)]
pub struct Components {
    provider: Provider,
    version: String,
    variables: Vec<String>,
    target_namespace: String,
    watching_namespace: String,
    objs: Vec<ManifestDocument>,
}

impl Components {
    /// Process a raw provider manifest
    pub fn new(
        provider: Provider,
        raw: &[u8],
        variables: &dyn VariablesSource,
        options: ComponentsOptions,
    ) -> Result<Self> {
        let raw = std::str::from_utf8(raw).map_err(|e| ComponentsError::Parse {
            index: 0,
            message: format!("manifest is not valid UTF-8: {}", e),
        })?;

        let names = inspect_variables(raw);
        let yaml = replace_variables(raw, &names, variables)?;

        let mut objs = parse_documents(&yaml)?;

        let target_namespace = normalize_namespace(&mut objs, &options.target_namespace)?;
        fix_rbac(&mut objs, &target_namespace)?;
        configure_watch_namespace(&mut objs, &options.watching_namespace)?;
        add_labels(&mut objs, &provider.name);

        ensure_unique(&objs)?;

        info!(
            provider = %provider.name,
            version = %options.version,
            target_namespace = %target_namespace,
            watching_namespace = %options.watching_namespace,
            objects = objs.len(),
            "processed provider components"
        );

        Ok(Self {
            provider,
            version: options.version,
            variables: names,
            target_namespace,
            watching_namespace: options.watching_namespace,
            objs,
        })
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn name(&self) -> &str {
        &self.provider.name
    }

    pub fn provider_type(&self) -> ProviderType {
        self.provider.provider_type
    }

    pub fn url(&self) -> &str {
        &self.provider.url
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Variables referenced by the raw manifest, sorted
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn target_namespace(&self) -> &str {
        &self.target_namespace
    }

    /// Namespace watched by the controller; empty means all namespaces
    pub fn watching_namespace(&self) -> &str {
        &self.watching_namespace
    }

    pub fn objs(&self) -> &[ManifestDocument] {
        &self.objs
    }

    /// The components as multi-document YAML
    pub fn to_yaml(&self) -> Result<String> {
        render_documents(&self.objs)
    }

    /// Inventory record describing this provider once installed
    pub fn metadata(&self) -> ProviderRecord {
        ProviderRecord::new(
            &self.provider,
            &self.version,
            &self.target_namespace,
            &self.watching_namespace,
        )
    }
}

fn ensure_unique(objs: &[ManifestDocument]) -> Result<()> {
    let mut seen = HashSet::new();
    for doc in objs {
        let identity = doc.identity();
        if !seen.insert(identity.clone()) {
            return Err(ComponentsError::DuplicateDocument {
                identity: identity.to_string(),
            });
        }
    }
    Ok(())
}
