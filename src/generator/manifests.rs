//! Typed YAML manifests for the generated Kustomize tree
//!
//! Only the fields the scaffold emits are modeled; these are writers, not a
//! general Kubernetes object model.

use serde::Serialize;
use std::collections::BTreeMap;

pub const KUSTOMIZE_API_VERSION: &str = "kustomize.config.k8s.io/v1beta1";

/// A `kustomization.yaml`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kustomization {
    pub api_version: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub patches: Vec<Patch>,
}

impl Kustomization {
    /// Kustomization referencing the given resources
    #[must_use]
    pub fn with_resources<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            api_version: KUSTOMIZE_API_VERSION.to_owned(),
            kind: "Kustomization".to_owned(),
            resources: resources.into_iter().map(Into::into).collect(),
            patches: Vec::new(),
        }
    }

    /// Add a patch file reference (builder pattern)
    #[must_use]
    pub fn with_patch(mut self, path: &str) -> Self {
        self.patches.push(Patch {
            path: path.to_owned(),
        });
        self
    }
}

#[derive(Debug, Serialize)]
pub struct Patch {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub labels: BTreeMap<String, String>,
}

impl Metadata {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            namespace: None,
            labels: BTreeMap::new(),
        }
    }
}

fn app_labels(component: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_owned(), component.to_owned())])
}

/// A `deployment.yaml` for a component base
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: DeploymentSpec,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    pub replicas: u32,
    pub selector: Selector,
    pub template: PodTemplate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    pub match_labels: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct PodTemplate {
    pub metadata: TemplateMetadata,
    pub spec: PodSpec,
}

#[derive(Debug, Serialize)]
pub struct TemplateMetadata {
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct PodSpec {
    pub containers: Vec<Container>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ContainerPort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    pub container_port: u32,
}

#[derive(Debug, Serialize)]
pub struct Resources {
    pub requests: BTreeMap<String, String>,
}

impl Deployment {
    /// Base deployment for a component: one replica of a placeholder image
    /// listening on the target port.
    #[must_use]
    pub fn for_component(
        application: &str,
        component: &str,
        namespace: &str,
        target_port: u32,
    ) -> Self {
        Self {
            api_version: "apps/v1".to_owned(),
            kind: "Deployment".to_owned(),
            metadata: Metadata {
                name: component.to_owned(),
                namespace: Some(namespace.to_owned()),
                labels: app_labels(component),
            },
            spec: DeploymentSpec {
                replicas: 1,
                selector: Selector {
                    match_labels: app_labels(component),
                },
                template: PodTemplate {
                    metadata: TemplateMetadata {
                        labels: app_labels(component),
                    },
                    spec: PodSpec {
                        containers: vec![Container {
                            name: component.to_owned(),
                            image: format!("{application}/{component}:latest"),
                            ports: vec![ContainerPort {
                                container_port: target_port,
                            }],
                            resources: None,
                        }],
                    },
                },
            },
        }
    }
}

/// A `service.yaml` for a component base
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: ServiceSpec,
}

#[derive(Debug, Serialize)]
pub struct ServiceSpec {
    pub selector: BTreeMap<String, String>,
    pub ports: Vec<ServicePort>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    pub port: u32,
    pub target_port: u32,
}

impl Service {
    /// Service fronting a component's target port
    #[must_use]
    pub fn for_component(component: &str, namespace: &str, target_port: u32) -> Self {
        Self {
            api_version: "v1".to_owned(),
            kind: "Service".to_owned(),
            metadata: Metadata {
                name: component.to_owned(),
                namespace: Some(namespace.to_owned()),
                labels: app_labels(component),
            },
            spec: ServiceSpec {
                selector: app_labels(component),
                ports: vec![ServicePort {
                    port: target_port,
                    target_port,
                }],
            },
        }
    }
}

/// A `route.yaml` exposing a component, generated only when a route host
/// was requested
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: RouteSpec,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    pub host: String,
    pub to: RouteTarget,
    pub port: RoutePort,
}

#[derive(Debug, Serialize)]
pub struct RouteTarget {
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    pub target_port: u32,
}

impl Route {
    /// Route to a component's service under the requested host
    #[must_use]
    pub fn for_component(component: &str, host: &str, target_port: u32) -> Self {
        Self {
            api_version: "route.openshift.io/v1".to_owned(),
            kind: "Route".to_owned(),
            metadata: Metadata::named(component),
            spec: RouteSpec {
                host: host.to_owned(),
                to: RouteTarget {
                    kind: "Service".to_owned(),
                    name: component.to_owned(),
                },
                port: RoutePort {
                    target_port,
                },
            },
        }
    }
}

/// The `deployment-patch.yaml` an environment overlay starts from:
/// one replica with modest resource requests, ready for the user to edit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentPatch {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: PatchSpec,
}

#[derive(Debug, Serialize)]
pub struct PatchSpec {
    pub replicas: u32,
    pub template: PatchTemplate,
}

#[derive(Debug, Serialize)]
pub struct PatchTemplate {
    pub spec: PatchPodSpec,
}

#[derive(Debug, Serialize)]
pub struct PatchPodSpec {
    pub containers: Vec<PatchContainer>,
}

#[derive(Debug, Serialize)]
pub struct PatchContainer {
    pub name: String,
    pub resources: Resources,
}

impl DeploymentPatch {
    /// Starting patch for a component in one environment
    #[must_use]
    pub fn for_component(component: &str) -> Self {
        Self {
            api_version: "apps/v1".to_owned(),
            kind: "Deployment".to_owned(),
            metadata: Metadata::named(component),
            spec: PatchSpec {
                replicas: 1,
                template: PatchTemplate {
                    spec: PatchPodSpec {
                        containers: vec![PatchContainer {
                            name: component.to_owned(),
                            resources: Resources {
                                requests: BTreeMap::from([
                                    ("cpu".to_owned(), "1".to_owned()),
                                    ("memory".to_owned(), "256Mi".to_owned()),
                                ]),
                            },
                        }],
                    },
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kustomization_serializes_camel_case() {
        let yaml =
            serde_yaml::to_string(&Kustomization::with_resources(["base"])).unwrap();
        assert!(yaml.contains("apiVersion: kustomize.config.k8s.io/v1beta1"));
        assert!(yaml.contains("kind: Kustomization"));
        assert!(yaml.contains("- base"));
        assert!(!yaml.contains("patches"));
    }

    #[test]
    fn test_kustomization_with_patch() {
        let kustomization =
            Kustomization::with_resources(["../../base"]).with_patch("deployment-patch.yaml");
        let yaml = serde_yaml::to_string(&kustomization).unwrap();
        assert!(yaml.contains("path: deployment-patch.yaml"));
    }

    #[test]
    fn test_deployment_carries_target_port() {
        let deployment = Deployment::for_component("app1", "comp1", "openshift-gitops", 9090);
        let yaml = serde_yaml::to_string(&deployment).unwrap();
        assert!(yaml.contains("containerPort: 9090"));
        assert!(yaml.contains("namespace: openshift-gitops"));
        assert!(yaml.contains("name: comp1"));
    }

    #[test]
    fn test_route_references_service() {
        let route = Route::for_component("comp1", "comp1.apps.example.com", 8080);
        let yaml = serde_yaml::to_string(&route).unwrap();
        assert!(yaml.contains("kind: Route"));
        assert!(yaml.contains("host: comp1.apps.example.com"));
        assert!(yaml.contains("name: comp1"));
    }

    #[test]
    fn test_deployment_patch_requests() {
        let yaml = serde_yaml::to_string(&DeploymentPatch::for_component("comp1")).unwrap();
        assert!(yaml.contains("replicas: 1"));
        assert!(yaml.contains("cpu: '1'"));
        assert!(yaml.contains("memory: 256Mi"));
    }
}
