//! Configuration file management
//!
//! The configuration file lists the providers known to Capstan and the values
//! for `${VARIABLE}` placeholders used in provider manifests:
//!
//! ```yaml
//! providers:
//!   - name: docker
//!     type: InfrastructureProvider
//!     url: https://example.com/infrastructure-components.yaml
//! variables:
//!   DOCKER_POD_CIDRS: 192.168.0.0/16
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::provider::Provider;
use crate::variables::{EnvVariables, StaticVariables};

/// Capstan configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapstanConfig {
    /// Configured providers
    #[serde(default)]
    pub providers: Vec<Provider>,

    /// Values for manifest placeholders
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl CapstanConfig {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for provider in &self.providers {
            if provider.name.is_empty() {
                return Err(CoreError::InvalidConfig {
                    message: "provider name must not be empty".to_string(),
                });
            }
            if !seen.insert((provider.name.as_str(), provider.provider_type)) {
                return Err(CoreError::InvalidConfig {
                    message: format!(
                        "provider '{}' of type {} is defined more than once",
                        provider.name, provider.provider_type
                    ),
                });
            }
        }
        Ok(())
    }

    /// Get a provider by name
    pub fn provider(&self, name: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Variables source backed by the environment, falling back to this file
    pub fn variables_source(&self) -> EnvVariables {
        EnvVariables::with_fallback(StaticVariables::from(self.variables.clone()))
    }
}
