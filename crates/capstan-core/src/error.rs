//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to parse configuration: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown provider type '{value}' (expected one of CoreProvider, BootstrapProvider, ControlPlaneProvider, InfrastructureProvider)")]
    UnknownProviderType { value: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
