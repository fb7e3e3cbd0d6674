//! GitOps tree generation
//!
//! Writes the application/component/environment directory layout through
//! the `System` trait. Callers have already classified the target folder;
//! this module only materializes files.

pub mod manifests;

pub use manifests::*;

use crate::layout::state::{
    COMPONENTS_DIR, component_path, components_path, environment_path, list_components,
};
use crate::system::System;
use anyhow::{Context as _, Result};
use serde::Serialize;
use std::path::Path;

/// Everything needed to scaffold one component
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    pub application: String,
    pub component: String,
    pub namespace: String,
    pub target_port: u32,
    pub route: Option<String>,
}

fn write_yaml<T: Serialize>(system: &dyn System, path: &Path, value: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(value)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    system
        .write(path, yaml.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Scaffold a component under its application: `base/` manifests, an empty
/// `overlays/` directory, and the component kustomization. The application
/// parent kustomization is regenerated afterwards.
pub fn generate_component(system: &dyn System, output: &Path, spec: &ComponentSpec) -> Result<()> {
    let component_dir = component_path(output, &spec.application, &spec.component);
    let base_dir = component_dir.join("base");
    let overlays_dir = component_dir.join("overlays");
    system
        .create_dir_all(&base_dir)
        .with_context(|| format!("failed to create {}", base_dir.display()))?;
    system
        .create_dir_all(&overlays_dir)
        .with_context(|| format!("failed to create {}", overlays_dir.display()))?;

    write_yaml(
        system,
        &base_dir.join("deployment.yaml"),
        &Deployment::for_component(
            &spec.application,
            &spec.component,
            &spec.namespace,
            spec.target_port,
        ),
    )?;
    write_yaml(
        system,
        &base_dir.join("service.yaml"),
        &Service::for_component(&spec.component, &spec.namespace, spec.target_port),
    )?;

    let mut base_resources = vec!["deployment.yaml".to_owned(), "service.yaml".to_owned()];
    if let Some(route) = spec.route.as_deref() {
        write_yaml(
            system,
            &base_dir.join("route.yaml"),
            &Route::for_component(&spec.component, route, spec.target_port),
        )?;
        base_resources.push("route.yaml".to_owned());
    }
    write_yaml(
        system,
        &base_dir.join("kustomization.yaml"),
        &Kustomization::with_resources(base_resources),
    )?;
    write_yaml(
        system,
        &component_dir.join("kustomization.yaml"),
        &Kustomization::with_resources(["base"]),
    )?;

    regenerate_parent_kustomization(system, output, &spec.application)
}

/// Scaffold a fresh application root around its first component
pub fn generate_application(system: &dyn System, output: &Path, spec: &ComponentSpec) -> Result<()> {
    let application_dir = output.join(&spec.application);
    system
        .create_dir_all(&application_dir.join(COMPONENTS_DIR))
        .with_context(|| format!("failed to create {}", application_dir.display()))?;
    write_yaml(
        system,
        &application_dir.join("kustomization.yaml"),
        &Kustomization::with_resources([COMPONENTS_DIR]),
    )?;
    generate_component(system, output, spec)
}

/// Remove a component and regenerate the application parent kustomization
pub fn delete_component(
    system: &dyn System,
    output: &Path,
    application: &str,
    component: &str,
) -> Result<()> {
    let component_dir = component_path(output, application, component);
    system
        .remove_dir_all(&component_dir)
        .with_context(|| format!("failed to delete {}", component_dir.display()))?;
    regenerate_parent_kustomization(system, output, application)
}

/// Scaffold an environment overlay for a component
pub fn generate_environment(
    system: &dyn System,
    output: &Path,
    application: &str,
    component: &str,
    environment: &str,
) -> Result<()> {
    let environment_dir = environment_path(output, application, component, environment);
    system
        .create_dir_all(&environment_dir)
        .with_context(|| format!("failed to create {}", environment_dir.display()))?;
    write_yaml(
        system,
        &environment_dir.join("deployment-patch.yaml"),
        &DeploymentPatch::for_component(component),
    )?;
    write_yaml(
        system,
        &environment_dir.join("kustomization.yaml"),
        &Kustomization::with_resources(["../../base"]).with_patch("deployment-patch.yaml"),
    )
}

/// Rewrite `components/kustomization.yaml` from the components currently on
/// disk, so the parent always reflects the tree after adds and deletes.
pub fn regenerate_parent_kustomization(
    system: &dyn System,
    output: &Path,
    application: &str,
) -> Result<()> {
    let components = list_components(system, output, application);
    write_yaml(
        system,
        &components_path(output, application).join("kustomization.yaml"),
        &Kustomization::with_resources(components),
    )
}
