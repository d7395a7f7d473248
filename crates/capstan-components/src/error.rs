//! Error types for capstan-components

use thiserror::Error;

/// Result type for component processing
pub type Result<T> = std::result::Result<T, ComponentsError>;

/// Errors that abort building a provider's components
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ComponentsError {
    /// Malformed manifest text
    #[error("failed to parse manifest document {index}: {message}")]
    Parse { index: usize, message: String },

    /// One or more placeholders have no value
    #[error("value for variables [{}] is not set. Please set the value using os environment variables or the configuration file", .names.join(", "))]
    MissingVariables { names: Vec<String> },

    /// The target namespace cannot be determined
    #[error("ambiguous target namespace: {reason}")]
    AmbiguousNamespace { reason: String },

    /// Controllers disagree on the namespace they watch
    #[error("invalid manifest: all the controllers should have the same --namespace command arg, found '{first}' and '{second}'")]
    InconsistentWatchNamespace { first: String, second: String },

    /// A well-known kind does not have the expected shape
    #[error("cannot interpret {kind} '{name}': {message}")]
    Conversion {
        kind: String,
        name: String,
        message: String,
    },

    /// Two documents share kind, namespace and name
    #[error("invalid manifest: duplicate object {identity}")]
    DuplicateDocument { identity: String },

    /// Failed to render documents back to YAML
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_yaml::Error> for ComponentsError {
    fn from(e: serde_yaml::Error) -> Self {
        ComponentsError::Serialization(e.to_string())
    }
}

impl ComponentsError {
    pub(crate) fn conversion(kind: &str, name: &str, message: impl std::fmt::Display) -> Self {
        ComponentsError::Conversion {
            kind: kind.to_string(),
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}
