//! Provider identity

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// Kind of provider, as understood by clusterctl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderType {
    CoreProvider,
    BootstrapProvider,
    ControlPlaneProvider,
    InfrastructureProvider,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoreProvider => "CoreProvider",
            Self::BootstrapProvider => "BootstrapProvider",
            Self::ControlPlaneProvider => "ControlPlaneProvider",
            Self::InfrastructureProvider => "InfrastructureProvider",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CoreProvider" => Ok(Self::CoreProvider),
            "BootstrapProvider" => Ok(Self::BootstrapProvider),
            "ControlPlaneProvider" => Ok(Self::ControlPlaneProvider),
            "InfrastructureProvider" => Ok(Self::InfrastructureProvider),
            other => Err(CoreError::UnknownProviderType {
                value: other.to_string(),
            }),
        }
    }
}

/// An installable provider: a named, typed bundle of components fetched from `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Provider name (e.g. "cluster-api", "aws")
    pub name: String,

    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: ProviderType,

    /// Location of the provider repository. Opaque to component processing.
    #[serde(default)]
    pub url: String,
}

impl Provider {
    pub fn new(name: impl Into<String>, provider_type: ProviderType, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider_type,
            url: url.into(),
        }
    }
}
