//! Folder-state classification
//!
//! Given a filesystem handle and a target path, decide what the path
//! represents before any command mutates it. Classification is a pure
//! function of the current on-disk state: every call re-probes the
//! filesystem, because the tree may have been modified externally between
//! interactive retries.

use crate::layout::names::validate_name;
use crate::system::System;
use std::path::{Path, PathBuf};

/// Name of the marker subdirectory identifying an application root
pub const COMPONENTS_DIR: &str = "components";

/// Name of the per-component overlays subdirectory
pub const OVERLAYS_DIR: &str = "overlays";

/// What a target path currently represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderState {
    /// The path does not exist
    Absent,
    /// The path exists but holds no entries
    EmptyOrUnrelated,
    /// The path exists and contains a `components` subdirectory
    ValidApplicationRoot,
    /// The path exists with contents but lacks a `components` subdirectory.
    /// This is a hard error everywhere: correcting it automatically risks
    /// destroying user data.
    InvalidApplicationRoot,
}

/// Classify a candidate application root.
pub fn classify_application_root(system: &dyn System, path: &Path) -> FolderState {
    if !system.exists(path) {
        return FolderState::Absent;
    }
    if system.is_dir(&path.join(COMPONENTS_DIR)) {
        return FolderState::ValidApplicationRoot;
    }
    match system.read_dir(path) {
        Ok(entries) if entries.is_empty() => FolderState::EmptyOrUnrelated,
        Ok(_) => FolderState::InvalidApplicationRoot,
        // Path exists but is unreadable or not a directory; treat it like
        // unrelated content rather than guessing.
        Err(_) => FolderState::InvalidApplicationRoot,
    }
}

/// Path of the application folder under an output directory
#[must_use]
pub fn application_path(output: &Path, application: &str) -> PathBuf {
    output.join(application)
}

/// Path of the components directory of an application
#[must_use]
pub fn components_path(output: &Path, application: &str) -> PathBuf {
    output.join(application).join(COMPONENTS_DIR)
}

/// Path of a named component under an application
#[must_use]
pub fn component_path(output: &Path, application: &str, component: &str) -> PathBuf {
    components_path(output, application).join(component)
}

/// Path of a named environment overlay under a component
#[must_use]
pub fn environment_path(
    output: &Path,
    application: &str,
    component: &str,
    environment: &str,
) -> PathBuf {
    component_path(output, application, component)
        .join(OVERLAYS_DIR)
        .join(environment)
}

/// Does the named component exist under the application?
pub fn component_exists(
    system: &dyn System,
    output: &Path,
    application: &str,
    component: &str,
) -> bool {
    system.exists(&component_path(output, application, component))
}

/// Does the named environment exist under the component?
pub fn environment_exists(
    system: &dyn System,
    output: &Path,
    application: &str,
    component: &str,
    environment: &str,
) -> bool {
    system.exists(&environment_path(output, application, component, environment))
}

/// List entries of a directory whose file names are valid DNS-1123 labels,
/// sorted lexicographically. Returns an empty list when the directory is
/// absent. Used for component and environment listings; stray files like
/// `kustomization.yaml` fail name validation and drop out naturally.
pub fn list_labeled_entries(system: &dyn System, dir: &Path) -> Vec<String> {
    let Ok(entries) = system.read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .iter()
        .filter_map(|p| p.file_name())
        .filter_map(|n| n.to_str())
        .filter(|n| validate_name(n).is_ok())
        .map(str::to_owned)
        .collect();
    names.sort();
    names
}

/// List the components of an application, sorted
pub fn list_components(system: &dyn System, output: &Path, application: &str) -> Vec<String> {
    list_labeled_entries(system, &components_path(output, application))
}

/// List the environments of a component, sorted
pub fn list_environments(
    system: &dyn System,
    output: &Path,
    application: &str,
    component: &str,
) -> Vec<String> {
    list_labeled_entries(
        system,
        &component_path(output, application, component).join(OVERLAYS_DIR),
    )
}

/// Has `git init` already been run in this folder?
pub fn has_git_dir(system: &dyn System, path: &Path) -> bool {
    system.exists(&path.join(".git"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    #[test]
    fn test_absent_path() {
        let system = MockSystem::new();
        assert_eq!(
            classify_application_root(&system, Path::new("/gitops/app1")),
            FolderState::Absent
        );
    }

    #[test]
    fn test_empty_folder() {
        let system = MockSystem::new().with_dir("/gitops/app1");
        assert_eq!(
            classify_application_root(&system, Path::new("/gitops/app1")),
            FolderState::EmptyOrUnrelated
        );
    }

    #[test]
    fn test_valid_application_root() {
        let system = MockSystem::new().with_dir("/gitops/app1/components");
        assert_eq!(
            classify_application_root(&system, Path::new("/gitops/app1")),
            FolderState::ValidApplicationRoot
        );
    }

    #[test]
    fn test_unrelated_contents_are_invalid() {
        let system = MockSystem::new().with_file("/gitops/app1/notes.txt", b"hello");
        assert_eq!(
            classify_application_root(&system, Path::new("/gitops/app1")),
            FolderState::InvalidApplicationRoot
        );
    }

    #[test]
    fn test_classification_is_stable_without_mutation() {
        let system = MockSystem::new().with_dir("/gitops/app1/components");
        let first = classify_application_root(&system, Path::new("/gitops/app1"));
        let second = classify_application_root(&system, Path::new("/gitops/app1"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_classification_tracks_external_mutation() {
        let system = MockSystem::new().with_dir("/gitops/app1");
        assert_eq!(
            classify_application_root(&system, Path::new("/gitops/app1")),
            FolderState::EmptyOrUnrelated
        );
        let system = system.with_dir("/gitops/app1/components");
        assert_eq!(
            classify_application_root(&system, Path::new("/gitops/app1")),
            FolderState::ValidApplicationRoot
        );
    }

    #[test]
    fn test_entity_paths() {
        let output = Path::new("/gitops");
        assert_eq!(
            component_path(output, "app1", "comp1"),
            PathBuf::from("/gitops/app1/components/comp1")
        );
        assert_eq!(
            environment_path(output, "app1", "comp1", "stage"),
            PathBuf::from("/gitops/app1/components/comp1/overlays/stage")
        );
    }

    #[test]
    fn test_list_components_filters_invalid_names_and_sorts() {
        let system = MockSystem::new()
            .with_dir("/gitops/app1/components/zeta")
            .with_dir("/gitops/app1/components/alpha")
            .with_file("/gitops/app1/components/kustomization.yaml", b"{}");
        assert_eq!(
            list_components(&system, Path::new("/gitops"), "app1"),
            vec!["alpha", "zeta"]
        );
    }

    #[test]
    fn test_list_components_of_missing_application_is_empty() {
        let system = MockSystem::new();
        assert!(list_components(&system, Path::new("/gitops"), "ghost").is_empty());
    }

    #[test]
    fn test_has_git_dir() {
        let system = MockSystem::new().with_dir("/gitops/app1/.git");
        assert!(has_git_dir(&system, Path::new("/gitops/app1")));
        assert!(!has_git_dir(&system, Path::new("/gitops")));
    }
}
