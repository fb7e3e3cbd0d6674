//! Git hosting providers
//!
//! Maps repository URL hosts to a provider driver and exposes the small
//! slice of the hosting REST APIs the tool needs: current-user lookup,
//! repository existence, and repository creation.
//!
//! The host-to-driver mapping is an explicit per-invocation resolver
//! rather than process-global state; a `--private-repo-driver` flag adds a
//! mapping for one custom domain.

pub mod api;

pub use api::{ApiClient, HostingClient, MockHosting, connect};

use crate::error::ScaffoldError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Supported hosting providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    Github,
    Gitlab,
}

impl Driver {
    /// All supported driver names, for prompts and help text
    pub const NAMES: [&'static str; 2] = ["github", "gitlab"];

    /// Driver name as used on the command line
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Driver {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Self::Github),
            "gitlab" => Ok(Self::Gitlab),
            other => Err(ScaffoldError::invalid_driver(other)),
        }
    }
}

/// Per-invocation host-to-driver mapping
///
/// Well-known hosts resolve implicitly; custom domains must be mapped
/// explicitly via `with_mapping`.
#[derive(Debug, Clone, Default)]
pub struct DriverResolver {
    overrides: HashMap<String, Driver>,
}

impl DriverResolver {
    /// Create a resolver knowing only the public hosts
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit mapping for a custom domain (builder pattern)
    #[must_use]
    pub fn with_mapping(mut self, host: &str, driver: Driver) -> Self {
        self.overrides.insert(host.to_owned(), driver);
        self
    }

    /// Resolve the driver for a host, or `None` for an unknown domain
    #[must_use]
    pub fn resolve(&self, host: &str) -> Option<Driver> {
        if let Some(driver) = self.overrides.get(host) {
            return Some(*driver);
        }
        match host {
            "github.com" => Some(Driver::Github),
            "gitlab.com" => Some(Driver::Gitlab),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_from_str() {
        assert_eq!("github".parse::<Driver>().unwrap(), Driver::Github);
        assert_eq!("gitlab".parse::<Driver>().unwrap(), Driver::Gitlab);
        let err = "bitbucket".parse::<Driver>().unwrap_err();
        assert!(err.to_string().contains("bitbucket"));
    }

    #[test]
    fn test_known_hosts_resolve_implicitly() {
        let resolver = DriverResolver::new();
        assert_eq!(resolver.resolve("github.com"), Some(Driver::Github));
        assert_eq!(resolver.resolve("gitlab.com"), Some(Driver::Gitlab));
        assert_eq!(resolver.resolve("git.corp.example"), None);
    }

    #[test]
    fn test_custom_domain_mapping() {
        let resolver = DriverResolver::new().with_mapping("git.corp.example", Driver::Gitlab);
        assert_eq!(resolver.resolve("git.corp.example"), Some(Driver::Gitlab));
        // Mapping a custom domain leaves the public hosts untouched.
        assert_eq!(resolver.resolve("github.com"), Some(Driver::Github));
    }
}
