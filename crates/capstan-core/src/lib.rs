//! Capstan Core - Core types for installing Cluster API providers
//!
//! This crate provides the foundational types shared by the rest of Capstan:
//! - `Provider`: The identity of an installable provider (name, type, source URL)
//! - `VariablesSource`: Where `${VARIABLE}` placeholder values come from
//! - `CapstanConfig`: The configuration file (providers and variables)
//! - `ProviderRecord`: The inventory object recorded for an installed provider
//! - `labels`: Provenance labels stamped on every provider object

pub mod config;
pub mod error;
pub mod labels;
pub mod provider;
pub mod record;
pub mod variables;

pub use config::CapstanConfig;
pub use error::{CoreError, Result};
pub use labels::provider_labels;
pub use provider::{Provider, ProviderType};
pub use record::{ProviderRecord, RecordMetadata};
pub use variables::{EnvVariables, StaticVariables, VariablesSource};
