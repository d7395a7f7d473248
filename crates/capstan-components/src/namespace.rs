//! Target namespace derivation and assignment

use tracing::debug;

use crate::document::ManifestDocument;
use crate::error::{ComponentsError, Result};
use crate::kinds::{NAMESPACE_KIND, is_namespaced};

/// Name of the Namespace document embedded in the manifest, if any
///
/// More than one Namespace document makes the manifest ambiguous.
pub fn inspect_target_namespace(documents: &[ManifestDocument]) -> Result<Option<String>> {
    let mut namespaces = documents.iter().filter(|d| d.kind() == NAMESPACE_KIND);

    let first = namespaces.next().map(|d| d.name().to_string());
    if namespaces.next().is_some() {
        return Err(ComponentsError::AmbiguousNamespace {
            reason: "there should be no more than one resource with kind Namespace in the provider components".to_string(),
        });
    }
    Ok(first)
}

/// Pick the target namespace: the caller's override, else the embedded Namespace
pub fn resolve_target_namespace(
    documents: &[ManifestDocument],
    override_namespace: &str,
) -> Result<String> {
    let default_namespace = inspect_target_namespace(documents)?;

    if !override_namespace.is_empty() {
        return Ok(override_namespace.to_string());
    }

    match default_namespace {
        Some(ns) if !ns.is_empty() => Ok(ns),
        _ => Err(ComponentsError::AmbiguousNamespace {
            reason: "target namespace can't be defaulted. Please specify a target namespace"
                .to_string(),
        }),
    }
}

/// Append a Namespace document for `target` unless one already exists
pub fn add_namespace_if_missing(documents: &mut Vec<ManifestDocument>, target: &str) {
    if documents.iter().any(|d| d.kind() == NAMESPACE_KIND) {
        return;
    }
    debug!(namespace = target, "adding missing Namespace object");
    documents.push(ManifestDocument::new("v1", NAMESPACE_KIND, target));
}

/// Move every namespaced document into `target` and rename the Namespace document
pub fn fix_target_namespace(documents: &mut [ManifestDocument], target: &str) {
    for doc in documents.iter_mut() {
        if doc.kind() == NAMESPACE_KIND {
            doc.set_name(target);
        }
        if is_namespaced(doc.kind()) {
            doc.set_namespace(target);
        }
    }
}

/// Resolve the target namespace and stamp it on the documents
pub fn normalize_namespace(
    documents: &mut Vec<ManifestDocument>,
    override_namespace: &str,
) -> Result<String> {
    let target = resolve_target_namespace(documents, override_namespace)?;
    debug!(namespace = %target, "resolved target namespace");

    add_namespace_if_missing(documents, &target);
    fix_target_namespace(documents, &target);

    Ok(target)
}
