//! End-to-end tests for provider component processing

use capstan_components::{Components, ComponentsError, ComponentsOptions, ManifestDocument};
use capstan_core::labels::{CLUSTERCTL_LABEL, CLUSTERCTL_PROVIDER_LABEL};
use capstan_core::{Provider, ProviderType, StaticVariables};
use serde_yaml::Value;

const CORE_COMPONENTS: &str = r#"
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: manager-role
rules:
- apiGroups: ["cluster.x-k8s.io"]
  resources: ["clusters"]
  verbs: ["get", "list", "watch"]
---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRoleBinding
metadata:
  name: manager-rolebinding
roleRef:
  apiGroup: rbac.authorization.k8s.io
  kind: ClusterRole
  name: manager-role
subjects:
- kind: ServiceAccount
  name: default
  namespace: system
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: controller-manager
spec:
  selector:
    matchLabels:
      control-plane: controller-manager
  template:
    metadata:
      labels:
        control-plane: controller-manager
    spec:
      containers:
      - name: manager
        image: gcr.io/k8s-staging-cluster-api/cluster-api-controller:dev
        args:
        - --leader-elect
"#;

const TEMPLATED_COMPONENTS: &str = r#"
apiVersion: v1
kind: Namespace
metadata:
  name: capd-system
---
apiVersion: v1
kind: Secret
metadata:
  name: manager-bootstrap-credentials
  namespace: capd-system
stringData:
  region: ${ REGION }
  credentials: ${B64_CREDENTIALS}
  copy: ${REGION}
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: controller-manager
  namespace: capd-system
spec:
  selector:
    matchLabels:
      control-plane: controller-manager
  template:
    metadata:
      labels:
        control-plane: controller-manager
    spec:
      containers:
      - name: manager
        image: controller:${VERSION_TAG}
        args:
        - --namespace=capd-watched
        - --metrics-addr=:8080
"#;

/// A controller Deployment as providers actually ship it
const MANAGER_COMPONENTS: &str = r#"
apiVersion: v1
kind: ServiceAccount
metadata:
  name: manager
---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: manager-role
rules:
- apiGroups: ["infrastructure.cluster.x-k8s.io"]
  resources: ["dockerclusters", "dockermachines"]
  verbs: ["*"]
---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRoleBinding
metadata:
  name: manager-rolebinding
roleRef:
  apiGroup: rbac.authorization.k8s.io
  kind: ClusterRole
  name: manager-role
subjects:
- kind: ServiceAccount
  name: manager
  namespace: system
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: controller-manager
  labels:
    control-plane: controller-manager
spec:
  replicas: 1
  selector:
    matchLabels:
      control-plane: controller-manager
  template:
    metadata:
      labels:
        control-plane: controller-manager
    spec:
      serviceAccountName: manager
      terminationGracePeriodSeconds: 10
      containers:
      - name: kube-rbac-proxy
        image: gcr.io/kubebuilder/kube-rbac-proxy:v0.8.0
        args:
        - --secure-listen-address=0.0.0.0:8443
        - --upstream=http://127.0.0.1:8080/
        ports:
        - containerPort: 8443
          name: https
      - name: manager
        image: gcr.io/k8s-staging-cluster-api/capd-manager:dev
        command:
        - /manager
        args:
        - --leader-elect
        - --metrics-bind-addr=127.0.0.1:8080
        env:
        - name: POD_NAMESPACE
          valueFrom:
            fieldRef:
              fieldPath: metadata.namespace
        ports:
        - containerPort: 9443
          name: webhook-server
          protocol: TCP
        - containerPort: 9440
          name: healthz
          protocol: TCP
        livenessProbe:
          httpGet:
            path: /healthz
            port: healthz
          initialDelaySeconds: 15
        readinessProbe:
          httpGet:
            path: /readyz
            port: healthz
        resources:
          limits:
            cpu: 1
            memory: 64Mi
          requests:
            cpu: 100m
            memory: 20Mi
"#;

fn provider(name: &str) -> Provider {
    Provider::new(name, ProviderType::CoreProvider, "https://example.com/components.yaml")
}

fn options(target: &str, watching: &str) -> ComponentsOptions {
    ComponentsOptions {
        version: "v0.3.0".to_string(),
        target_namespace: target.to_string(),
        watching_namespace: watching.to_string(),
    }
}

fn find<'a>(components: &'a Components, kind: &str) -> Vec<&'a ManifestDocument> {
    components.objs().iter().filter(|d| d.kind() == kind).collect()
}

fn container<'a>(doc: &'a ManifestDocument, name: &str) -> &'a Value {
    doc.field("spec").unwrap()["template"]["spec"]["containers"]
        .as_sequence()
        .unwrap()
        .iter()
        .find(|c| c["name"].as_str() == Some(name))
        .unwrap()
}

fn manager_args(doc: &ManifestDocument) -> Vec<String> {
    container(doc, "manager")
        .get("args")
        .and_then(Value::as_sequence)
        .map(|args| args.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default()
}

fn templated_vars() -> StaticVariables {
    [
        ("REGION", "us-east-1"),
        ("B64_CREDENTIALS", "c2VjcmV0"),
        ("VERSION_TAG", "v0.3.0"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_core_provider_end_to_end() {
    let components = Components::new(
        provider("cluster-api"),
        CORE_COMPONENTS.as_bytes(),
        &StaticVariables::new(),
        options("capi-system", ""),
    )
    .unwrap();

    assert_eq!(components.target_namespace(), "capi-system");
    assert_eq!(components.watching_namespace(), "");
    assert!(components.variables().is_empty());

    let namespaces = find(&components, "Namespace");
    assert_eq!(namespaces.len(), 1);
    assert_eq!(namespaces[0].name(), "capi-system");

    let roles = find(&components, "ClusterRole");
    assert_eq!(roles[0].name(), "capi-system-manager-role");

    let bindings = find(&components, "ClusterRoleBinding");
    assert_eq!(bindings[0].name(), "capi-system-manager-rolebinding");
    let role_ref = bindings[0].field("roleRef").unwrap();
    assert_eq!(role_ref["name"].as_str(), Some("capi-system-manager-role"));
    assert_eq!(
        bindings[0].field("subjects").unwrap()[0]["namespace"].as_str(),
        Some("capi-system")
    );

    let deployments = find(&components, "Deployment");
    assert_eq!(deployments[0].namespace(), Some("capi-system"));
    assert_eq!(manager_args(deployments[0]), vec!["--leader-elect"]);

    for doc in components.objs() {
        assert_eq!(doc.labels().get(CLUSTERCTL_LABEL).map(String::as_str), Some(""));
        assert_eq!(
            doc.labels().get(CLUSTERCTL_PROVIDER_LABEL).map(String::as_str),
            Some("cluster-api")
        );
    }
}

#[test]
fn test_manager_deployment_end_to_end() {
    let components = Components::new(
        provider("docker"),
        MANAGER_COMPONENTS.as_bytes(),
        &StaticVariables::new(),
        options("capd-system", "ops"),
    )
    .unwrap();

    let bindings = find(&components, "ClusterRoleBinding");
    assert_eq!(bindings[0].name(), "capd-system-manager-rolebinding");

    let deployments = find(&components, "Deployment");
    let deployment = deployments[0];
    assert_eq!(deployment.namespace(), Some("capd-system"));
    assert_eq!(deployment.field("spec").unwrap()["replicas"].as_u64(), Some(1));
    assert_eq!(
        manager_args(deployment),
        vec!["--leader-elect", "--metrics-bind-addr=127.0.0.1:8080", "--namespace=ops"]
    );

    let manager = container(deployment, "manager");
    assert_eq!(manager["resources"]["limits"]["cpu"].as_u64(), Some(1));
    assert_eq!(manager["resources"]["limits"]["memory"].as_str(), Some("64Mi"));
    assert_eq!(manager["resources"]["requests"]["cpu"].as_str(), Some("100m"));
    assert_eq!(manager["ports"][1]["containerPort"].as_u64(), Some(9440));
    assert_eq!(manager["livenessProbe"]["initialDelaySeconds"].as_u64(), Some(15));
    assert_eq!(
        manager["env"][0]["valueFrom"]["fieldRef"]["fieldPath"].as_str(),
        Some("metadata.namespace")
    );
    assert_eq!(manager["command"][0].as_str(), Some("/manager"));

    let proxy = container(deployment, "kube-rbac-proxy");
    assert_eq!(proxy["args"].as_sequence().map(Vec::len), Some(2));
    assert_eq!(proxy["ports"][0]["name"].as_str(), Some("https"));
}

#[test]
fn test_namespace_document_is_appended_last() {
    let components = Components::new(
        provider("cluster-api"),
        CORE_COMPONENTS.as_bytes(),
        &StaticVariables::new(),
        options("capi-system", ""),
    )
    .unwrap();

    let kinds: Vec<&str> = components.objs().iter().map(|d| d.kind()).collect();
    assert_eq!(
        kinds,
        vec!["ClusterRole", "ClusterRoleBinding", "Deployment", "Namespace"]
    );
}

#[test]
fn test_variables_substituted_and_namespace_defaulted() {
    let components = Components::new(
        provider("docker"),
        TEMPLATED_COMPONENTS.as_bytes(),
        &templated_vars(),
        options("", "capd-watched"),
    )
    .unwrap();

    assert_eq!(
        components.variables(),
        ["B64_CREDENTIALS", "REGION", "VERSION_TAG"].map(String::from)
    );
    assert_eq!(components.target_namespace(), "capd-system");

    let yaml = components.to_yaml().unwrap();
    assert!(!yaml.contains("${"));
    assert!(yaml.contains("region: us-east-1"));
    assert!(yaml.contains("copy: us-east-1"));
    assert!(yaml.contains("image: controller:v0.3.0"));

    let deployments = find(&components, "Deployment");
    assert_eq!(
        manager_args(deployments[0]),
        vec!["--namespace=capd-watched", "--metrics-addr=:8080"]
    );
}

#[test]
fn test_missing_variables_abort() {
    let vars: StaticVariables = [("REGION", "us-east-1")].into_iter().collect();
    let err = Components::new(
        provider("docker"),
        TEMPLATED_COMPONENTS.as_bytes(),
        &vars,
        options("", ""),
    )
    .unwrap_err();

    match err {
        ComponentsError::MissingVariables { names } => {
            assert_eq!(names, vec!["B64_CREDENTIALS", "VERSION_TAG"]);
        }
        other => panic!("expected missing variables, got {:?}", other),
    }
}

#[test]
fn test_watch_namespace_changed() {
    let components = Components::new(
        provider("docker"),
        TEMPLATED_COMPONENTS.as_bytes(),
        &templated_vars(),
        options("tenant-a", "tenant-a"),
    )
    .unwrap();

    let deployments = find(&components, "Deployment");
    assert_eq!(deployments[0].namespace(), Some("tenant-a"));
    assert_eq!(
        manager_args(deployments[0]),
        vec!["--namespace=tenant-a", "--metrics-addr=:8080"]
    );
    assert_eq!(find(&components, "Namespace")[0].name(), "tenant-a");
}

#[test]
fn test_watch_all_namespaces_removes_argument() {
    let components = Components::new(
        provider("docker"),
        TEMPLATED_COMPONENTS.as_bytes(),
        &templated_vars(),
        options("", ""),
    )
    .unwrap();

    let deployments = find(&components, "Deployment");
    assert_eq!(manager_args(deployments[0]), vec!["--metrics-addr=:8080"]);
}

#[test]
fn test_no_namespace_derivable() {
    let err = Components::new(
        provider("cluster-api"),
        CORE_COMPONENTS.as_bytes(),
        &StaticVariables::new(),
        options("", ""),
    )
    .unwrap_err();

    assert!(matches!(err, ComponentsError::AmbiguousNamespace { .. }));
}

#[test]
fn test_two_namespace_documents() {
    let raw = format!(
        "{}---\napiVersion: v1\nkind: Namespace\nmetadata:\n  name: second\n",
        TEMPLATED_COMPONENTS
    );

    for target in ["", "override"] {
        let err = Components::new(
            provider("docker"),
            raw.as_bytes(),
            &templated_vars(),
            options(target, ""),
        )
        .unwrap_err();
        assert!(matches!(err, ComponentsError::AmbiguousNamespace { .. }));
    }
}

#[test]
fn test_malformed_manifest() {
    let err = Components::new(
        provider("cluster-api"),
        b"kind: Namespace\nmetadata: {name: [\n",
        &StaticVariables::new(),
        options("capi-system", ""),
    )
    .unwrap_err();

    assert!(matches!(err, ComponentsError::Parse { .. }));
}

#[test]
fn test_rerun_is_identity() {
    for (raw, target, watching) in [
        (CORE_COMPONENTS, "capi-system", ""),
        (CORE_COMPONENTS, "capi-system", "ops"),
        (MANAGER_COMPONENTS, "capd-system", ""),
        (MANAGER_COMPONENTS, "capd-system", "ops"),
        (TEMPLATED_COMPONENTS, "", "capd-watched"),
    ] {
        let first = Components::new(
            provider("cluster-api"),
            raw.as_bytes(),
            &templated_vars(),
            options(target, watching),
        )
        .unwrap();
        let yaml = first.to_yaml().unwrap();

        let second = Components::new(
            provider("cluster-api"),
            yaml.as_bytes(),
            &StaticVariables::new(),
            options(first.target_namespace(), first.watching_namespace()),
        )
        .unwrap();

        assert_eq!(second.objs(), first.objs());
        assert_eq!(second.to_yaml().unwrap(), yaml);
        assert_eq!(second.target_namespace(), first.target_namespace());
        assert_eq!(second.watching_namespace(), first.watching_namespace());
        assert_eq!(second.metadata(), first.metadata());
    }
}

#[test]
fn test_metadata_record() {
    let components = Components::new(
        provider("cluster-api"),
        CORE_COMPONENTS.as_bytes(),
        &StaticVariables::new(),
        options("capi-system", "ops"),
    )
    .unwrap();

    let record = components.metadata();
    assert_eq!(record.kind, "Provider");
    assert_eq!(record.metadata.name, "cluster-api");
    assert_eq!(record.metadata.namespace, "capi-system");
    assert_eq!(record.provider_type, "CoreProvider");
    assert_eq!(record.version, "v0.3.0");
    assert_eq!(record.watched_namespace, "ops");
}

#[test]
fn test_rendered_namespace_document() {
    let components = Components::new(
        provider("cluster-api"),
        CORE_COMPONENTS.as_bytes(),
        &StaticVariables::new(),
        options("capi-system", ""),
    )
    .unwrap();

    let yaml = components.to_yaml().unwrap();
    let last = yaml.rsplit("---\n").next().unwrap();
    insta::assert_snapshot!(last.trim_end(), @r"
    apiVersion: v1
    kind: Namespace
    metadata:
      name: capi-system
      labels:
        clusterctl.cluster.x-k8s.io: ''
        clusterctl.cluster.x-k8s.io/provider: cluster-api
    ");

    let value: Value = serde_yaml::from_str(last).unwrap();
    assert_eq!(value["metadata"]["name"].as_str(), Some("capi-system"));
}
