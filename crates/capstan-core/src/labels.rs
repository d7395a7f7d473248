//! Provenance labels
//!
//! Every object installed for a provider carries these labels so that the
//! provider's objects can be found again for upgrade, move and delete.

use std::collections::BTreeMap;

/// Marker label identifying an object as managed by clusterctl
pub const CLUSTERCTL_LABEL: &str = "clusterctl.cluster.x-k8s.io";

/// Label carrying the name of the provider an object belongs to
pub const CLUSTERCTL_PROVIDER_LABEL: &str = "clusterctl.cluster.x-k8s.io/provider";

/// API group/version of the provider inventory objects
pub const CLUSTERCTL_GROUP_VERSION: &str = "clusterctl.cluster.x-k8s.io/v1alpha3";

/// Build the provenance label set for a provider
pub fn provider_labels(provider_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (CLUSTERCTL_LABEL.to_string(), String::new()),
        (
            CLUSTERCTL_PROVIDER_LABEL.to_string(),
            provider_name.to_string(),
        ),
    ])
}
