//! Capstan Components - Provider component processing
//!
//! Turns the raw, multi-document YAML published by a Cluster API provider
//! into the set of objects to install in a management cluster:
//! - **Variables**: `${VARIABLE}` placeholders are scanned and substituted
//! - **Parsing**: YAML documents become [`ManifestDocument`]s
//! - **Namespace**: a single target namespace is derived and applied
//! - **RBAC**: cluster-scoped roles and bindings are isolated per namespace
//! - **Watch scope**: the controller's `--namespace` argument is set
//! - **Labels**: every object is tagged with the provider's identity
//!
//! [`Components::new`] runs the stages in order and returns the result.

pub mod components;
pub mod document;
pub mod error;
pub mod kinds;
pub mod labels;
pub mod namespace;
pub mod parser;
pub mod rbac;
pub mod variables;
pub mod watch;

pub use components::{Components, ComponentsOptions};
pub use document::{DocumentError, ManifestDocument, ObjectIdentity};
pub use error::{ComponentsError, Result};
pub use parser::{parse_documents, render_documents};
pub use variables::{inspect_variables, replace_variables};
