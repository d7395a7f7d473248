//! RBAC isolation for multi-tenant installs
//!
//! Cluster-scoped RBAC objects are shared by every copy of a provider in the
//! cluster. Prefixing them with the target namespace keeps each install's
//! ClusterRoles and ClusterRoleBindings separate, and binding subjects are
//! pointed at the target namespace.
//!
//! Bindings are edited in place: `apiVersion` and any fields not listed
//! below are left as they were.

use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::document::ManifestDocument;
use crate::error::{ComponentsError, Result};
use crate::kinds::{CLUSTER_ROLE_BINDING_KIND, CLUSTER_ROLE_KIND, ROLE_BINDING_KIND};

const ROLE_REF: &str = "roleRef";
const SUBJECTS: &str = "subjects";

/// The part of `roleRef` that isolation reads
#[derive(Debug, Deserialize)]
struct RoleRefView {
    #[serde(default)]
    name: String,
}

/// The part of a binding subject that isolation reads
#[derive(Debug, Deserialize)]
struct SubjectView {
    #[serde(default)]
    namespace: Option<String>,
}

/// Name of a cluster-scoped RBAC object once isolated in `target`
///
/// Names that already carry the prefix are left alone. This trades the plain
/// "always prefix" rule for re-run stability: processing the output again
/// must not yield `<ns>-<ns>-<name>`. A name that happens to start with the
/// prefix in the raw manifest is therefore not prefixed a second time.
pub fn namespaced_name(target: &str, name: &str) -> String {
    let prefix = format!("{}-", target);
    if name.starts_with(&prefix) {
        name.to_string()
    } else {
        format!("{}{}", prefix, name)
    }
}

/// Prefix ClusterRoles and ClusterRoleBindings with `target` and point
/// binding subjects at `target`
pub fn fix_rbac(documents: &mut [ManifestDocument], target: &str) -> Result<()> {
    let mut renamed_cluster_roles = HashMap::new();

    for doc in documents.iter_mut().filter(|d| d.kind() == CLUSTER_ROLE_KIND) {
        let current = doc.name().to_string();
        let renamed = namespaced_name(target, &current);
        debug!(from = %current, to = %renamed, "renaming ClusterRole");
        doc.set_name(renamed.clone());
        renamed_cluster_roles.insert(current, renamed);
    }

    for doc in documents.iter_mut() {
        match doc.kind() {
            CLUSTER_ROLE_BINDING_KIND => {
                let role_ref = check_binding(doc)?;

                let renamed = namespaced_name(target, doc.name());
                doc.set_name(renamed);

                fix_subjects(doc, target);

                if let Some(renamed) = role_ref.and_then(|r| renamed_cluster_roles.get(&r.name)) {
                    if let Some(Value::Mapping(role_ref)) = doc.field_mut(ROLE_REF) {
                        role_ref.insert("name".into(), renamed.clone().into());
                    }
                }
            }
            ROLE_BINDING_KIND => {
                check_binding(doc)?;
                fix_subjects(doc, target);
            }
            _ => {}
        }
    }

    Ok(())
}

/// Make sure `roleRef` and `subjects` have the shape of a binding
fn check_binding(doc: &ManifestDocument) -> Result<Option<RoleRefView>> {
    let conversion = |e: serde_yaml::Error| ComponentsError::conversion(doc.kind(), doc.name(), e);

    let role_ref = doc.field_as::<RoleRefView>(ROLE_REF).map_err(conversion)?;
    doc.field_as::<Vec<SubjectView>>(SUBJECTS).map_err(conversion)?;

    Ok(role_ref)
}

/// Point every namespaced subject at `target`
///
/// Any subject with a namespace is rewritten, whatever namespace it named.
fn fix_subjects(doc: &mut ManifestDocument, target: &str) {
    let Some(Value::Sequence(subjects)) = doc.field_mut(SUBJECTS) else {
        return;
    };

    for subject in subjects.iter_mut().filter_map(Value::as_mapping_mut) {
        let namespaced = subject
            .get("namespace")
            .and_then(Value::as_str)
            .is_some_and(|ns| !ns.is_empty());
        if namespaced {
            subject.insert("namespace".into(), target.into());
        }
    }
}
