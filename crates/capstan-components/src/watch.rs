//! Controller watch-scope configuration
//!
//! A provider controller limits itself to one namespace through a
//! `--namespace=<ns>` argument on its `manager` container. No argument means
//! the controller watches all namespaces.
//!
//! Only container names and args are read; everything else in a Deployment
//! is left exactly as written.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::document::ManifestDocument;
use crate::error::{ComponentsError, Result};
use crate::kinds::{CONTROLLER_CONTAINER_NAME, DEPLOYMENT_KIND, NAMESPACE_ARG_PREFIX};

#[derive(Debug, Deserialize)]
struct DeploymentSpecView {
    #[serde(default)]
    template: Option<PodTemplateView>,
}

#[derive(Debug, Deserialize)]
struct PodTemplateView {
    #[serde(default)]
    spec: Option<PodSpecView>,
}

#[derive(Debug, Deserialize)]
struct PodSpecView {
    #[serde(default)]
    containers: Option<Vec<ContainerView>>,
}

#[derive(Debug, Deserialize)]
struct ContainerView {
    #[serde(default)]
    name: String,
    #[serde(default)]
    args: Option<Vec<String>>,
}

/// Args of every controller container, keyed by container index
fn controller_args(doc: &ManifestDocument) -> Result<Vec<(usize, Vec<String>)>> {
    let spec = doc
        .field_as::<DeploymentSpecView>("spec")
        .map_err(|e| ComponentsError::conversion(doc.kind(), doc.name(), e))?;

    let containers = spec
        .and_then(|s| s.template)
        .and_then(|t| t.spec)
        .and_then(|p| p.containers)
        .unwrap_or_default();

    Ok(containers
        .into_iter()
        .enumerate()
        .filter(|(_, c)| c.name == CONTROLLER_CONTAINER_NAME)
        .map(|(index, c)| (index, c.args.unwrap_or_default()))
        .collect())
}

fn container_mut(doc: &mut ManifestDocument, index: usize) -> Option<&mut Mapping> {
    doc.field_mut("spec")?
        .get_mut("template")?
        .get_mut("spec")?
        .get_mut("containers")?
        .get_mut(index)?
        .as_mapping_mut()
}

/// Namespace the controllers are currently set to watch; empty means all
///
/// Controllers that disagree make the manifest invalid.
pub fn inspect_watch_namespace(documents: &[ManifestDocument]) -> Result<String> {
    let mut namespace = String::new();

    for doc in documents.iter().filter(|d| d.kind() == DEPLOYMENT_KIND) {
        for (_, args) in controller_args(doc)? {
            for value in args.iter().filter_map(|a| a.strip_prefix(NAMESPACE_ARG_PREFIX)) {
                if !namespace.is_empty() && value != namespace {
                    return Err(ComponentsError::InconsistentWatchNamespace {
                        first: namespace,
                        second: value.to_string(),
                    });
                }
                namespace = value.to_string();
            }
        }
    }

    Ok(namespace)
}

/// Rewrite the watch argument in `args`; returns whether anything changed
///
/// A non-empty `watching` replaces every existing argument where it stands,
/// or is appended when there is none. An empty `watching` removes them all.
pub fn set_watch_arg(args: &mut Vec<String>, watching: &str) -> bool {
    let before = args.clone();

    if watching.is_empty() {
        args.retain(|a| !a.starts_with(NAMESPACE_ARG_PREFIX));
        return *args != before;
    }

    let desired = format!("{}{}", NAMESPACE_ARG_PREFIX, watching);
    let mut found = false;
    for arg in args.iter_mut().filter(|a| a.starts_with(NAMESPACE_ARG_PREFIX)) {
        found = true;
        arg.clone_from(&desired);
    }
    if !found {
        args.push(desired);
    }

    *args != before
}

/// Set every controller container to watch `watching`
pub fn fix_watch_namespace(documents: &mut [ManifestDocument], watching: &str) -> Result<()> {
    for doc in documents.iter_mut().filter(|d| d.kind() == DEPLOYMENT_KIND) {
        for (index, mut args) in controller_args(doc)? {
            if !set_watch_arg(&mut args, watching) {
                continue;
            }
            debug!(deployment = %doc.name(), watching, "updated controller watch namespace");

            let Some(container) = container_mut(doc, index) else {
                continue;
            };
            if args.is_empty() {
                container.shift_remove("args");
            } else {
                let args = args.into_iter().map(Value::from).collect();
                container.insert("args".into(), Value::Sequence(args));
            }
        }
    }

    Ok(())
}

/// Make the controllers watch `watching`, touching the manifest only when
/// it currently watches something else
pub fn configure_watch_namespace(
    documents: &mut [ManifestDocument],
    watching: &str,
) -> Result<()> {
    let current = inspect_watch_namespace(documents)?;
    debug!(current = %current, desired = %watching, "inspected watch namespace");

    if current != watching {
        fix_watch_namespace(documents, watching)?;
    }
    Ok(())
}
