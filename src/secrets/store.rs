//! Secret store implementations
//!
//! Access tokens are keyed by repository URL host so one token is reused
//! across all operations against the same git host.

use crate::error::ScaffoldError;
use keyring::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Service name under which tokens are filed in the OS keyring
const KEYRING_SERVICE: &str = "gitopsmith";

/// Store for access tokens keyed by git host
///
/// A missing entry is not an error: `get` returns `Ok(None)` and the
/// credential resolver falls through to the next source.
pub trait SecretStore: Send + Sync {
    /// Look up the token for a host
    fn get(&self, host: &str) -> Result<Option<String>, ScaffoldError>;

    /// Persist the token for a host, replacing any previous value
    fn set(&self, host: &str, secret: &str) -> Result<(), ScaffoldError>;

    /// Remove the token for a host; removing a missing entry is a no-op
    fn delete(&self, host: &str) -> Result<(), ScaffoldError>;
}

/// OS-keyring backed store
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringStore;

impl KeyringStore {
    /// Create a new `KeyringStore`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn entry(host: &str) -> Result<Entry, ScaffoldError> {
        Entry::new(KEYRING_SERVICE, host)
            .map_err(|e| ScaffoldError::external_tool(format!("keyring unavailable: {e}")))
    }
}

impl SecretStore for KeyringStore {
    fn get(&self, host: &str) -> Result<Option<String>, ScaffoldError> {
        match Self::entry(host)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ScaffoldError::external_tool(format!(
                "failed to read access token for {host} from keyring: {e}"
            ))),
        }
    }

    fn set(&self, host: &str, secret: &str) -> Result<(), ScaffoldError> {
        Self::entry(host)?.set_password(secret).map_err(|e| {
            ScaffoldError::external_tool(format!(
                "failed to store access token for {host} in keyring: {e}"
            ))
        })
    }

    fn delete(&self, host: &str) -> Result<(), ScaffoldError> {
        match Self::entry(host)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ScaffoldError::external_tool(format!(
                "failed to delete access token for {host} from keyring: {e}"
            ))),
        }
    }
}

/// In-memory store for tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty `MemoryStore`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a token (builder pattern)
    #[must_use]
    pub fn with_secret(self, host: &str, secret: &str) -> Self {
        self.entries
            .lock()
            .expect("memory store lock poisoned")
            .insert(host.to_owned(), secret.to_owned());
        self
    }
}

impl SecretStore for MemoryStore {
    fn get(&self, host: &str) -> Result<Option<String>, ScaffoldError> {
        Ok(self
            .entries
            .lock()
            .expect("memory store lock poisoned")
            .get(host)
            .cloned())
    }

    fn set(&self, host: &str, secret: &str) -> Result<(), ScaffoldError> {
        self.entries
            .lock()
            .expect("memory store lock poisoned")
            .insert(host.to_owned(), secret.to_owned());
        Ok(())
    }

    fn delete(&self, host: &str) -> Result<(), ScaffoldError> {
        self.entries
            .lock()
            .expect("memory store lock poisoned")
            .remove(host);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("github.com").unwrap(), None);
        store.set("github.com", "token-1234567890123456").unwrap();
        assert_eq!(
            store.get("github.com").unwrap().as_deref(),
            Some("token-1234567890123456")
        );
        store.delete("github.com").unwrap();
        assert_eq!(store.get("github.com").unwrap(), None);
    }

    #[test]
    fn test_memory_store_delete_missing_is_noop() {
        let store = MemoryStore::new();
        assert!(store.delete("gitlab.com").is_ok());
    }
}
