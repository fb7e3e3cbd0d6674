//! Mock system implementation for testing

use super::System;
use std::collections::{HashMap, HashSet};
use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory implementation of the System trait for testing
///
/// `MockSystem` provides an in-memory filesystem and environment for fast,
/// isolated unit tests without side effects.
///
/// # Example
/// ```
/// use gitopsmith::system::{MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_env("HOME", "/home/user")
///     .with_dir("/gitops/app1/components")
///     .with_file("/gitops/app1/components/svc/base/kustomization.yaml", b"{}");
///
/// assert_eq!(system.env_var("HOME").unwrap(), "/home/user");
/// assert!(system.exists(Path::new("/gitops/app1/components")));
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    env_vars: HashMap<String, String>,
    current_dir: PathBuf,
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                env_vars: HashMap::new(),
                current_dir: PathBuf::from("/"),
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
            })),
        }
    }

    /// Set an environment variable (builder pattern)
    #[must_use]
    pub fn with_env(self, key: &str, value: &str) -> Self {
        self.lock_mut(|state| {
            state.env_vars.insert(key.to_owned(), value.to_owned());
        });
        self
    }

    /// Set the current working directory (builder pattern)
    #[must_use]
    pub fn with_current_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        self.lock_mut(|state| {
            state.current_dir = dir.as_ref().to_path_buf();
            insert_dir_with_ancestors(&mut state.dirs, dir.as_ref());
        });
        self
    }

    /// Create a directory and all of its ancestors (builder pattern)
    #[must_use]
    pub fn with_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        self.lock_mut(|state| {
            insert_dir_with_ancestors(&mut state.dirs, dir.as_ref());
        });
        self
    }

    /// Create a file with contents, creating parent directories (builder pattern)
    #[must_use]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> Self {
        self.lock_mut(|state| {
            if let Some(parent) = path.as_ref().parent() {
                insert_dir_with_ancestors(&mut state.dirs, parent);
            }
            state
                .files
                .insert(path.as_ref().to_path_buf(), contents.to_vec());
        });
        self
    }

    fn lock_mut<F: FnOnce(&mut MockSystemState)>(&self, f: F) {
        let mut state = self.state.write().expect("mock system lock poisoned");
        f(&mut state);
    }
}

impl Default for MockSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_dir_with_ancestors(dirs: &mut HashSet<PathBuf>, dir: &Path) {
    let mut current = Some(dir);
    while let Some(p) = current {
        dirs.insert(p.to_path_buf());
        current = p.parent();
    }
}

impl System for MockSystem {
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        let state = self.state.read().expect("mock system lock poisoned");
        state.env_vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        let state = self.state.read().expect("mock system lock poisoned");
        Ok(state.current_dir.clone())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.read().expect("mock system lock poisoned");
        state.dirs.contains(path) || state.files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let state = self.state.read().expect("mock system lock poisoned");
        state.dirs.contains(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state.read().expect("mock system lock poisoned");
        if !state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", path.display()),
            ));
        }
        let mut entries: Vec<PathBuf> = state
            .dirs
            .iter()
            .chain(state.files.keys())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        entries.sort();
        entries.dedup();
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self.state.read().expect("mock system lock poisoned");
        let contents = state.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })?;
        String::from_utf8(contents.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state.write().expect("mock system lock poisoned");
        if let Some(parent) = path.parent() {
            if !state.dirs.contains(parent) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("parent directory does not exist: {}", parent.display()),
                ));
            }
        }
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.write().expect("mock system lock poisoned");
        insert_dir_with_ancestors(&mut state.dirs, path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.write().expect("mock system lock poisoned");
        if !state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", path.display()),
            ));
        }
        state.dirs.retain(|p| !p.starts_with(path));
        state.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}
