//! Classification tables for well-known Kubernetes kinds

pub const NAMESPACE_KIND: &str = "Namespace";
pub const CLUSTER_ROLE_KIND: &str = "ClusterRole";
pub const CLUSTER_ROLE_BINDING_KIND: &str = "ClusterRoleBinding";
pub const ROLE_BINDING_KIND: &str = "RoleBinding";
pub const DEPLOYMENT_KIND: &str = "Deployment";

/// Name of the container running the provider controller
pub const CONTROLLER_CONTAINER_NAME: &str = "manager";

/// Controller argument selecting the watched namespace
pub const NAMESPACE_ARG_PREFIX: &str = "--namespace=";

/// Kinds that live outside any namespace
pub const CLUSTER_SCOPED_KINDS: &[&str] = &[
    "Namespace",
    "Node",
    "PersistentVolume",
    "PodSecurityPolicy",
    "CertificateSigningRequest",
    "ClusterRoleBinding",
    "ClusterRole",
    "VolumeAttachment",
    "StorageClass",
    "CSIDriver",
    "CSINode",
    "ValidatingWebhookConfiguration",
    "MutatingWebhookConfiguration",
    "CustomResourceDefinition",
    "PriorityClass",
    "RuntimeClass",
];

/// Whether objects of `kind` belong to a namespace
///
/// Unknown kinds, including custom resources, are treated as namespaced.
pub fn is_namespaced(kind: &str) -> bool {
    !CLUSTER_SCOPED_KINDS.contains(&kind)
}
