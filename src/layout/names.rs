//! Name and value validation
//!
//! Application, component, and environment names double as Kubernetes
//! resource names, so they follow DNS-1123 label rules.

use crate::error::ScaffoldError;
use regex::Regex;

/// Maximum length of a DNS-1123 label
const MAX_NAME_LEN: usize = 63;

/// Minimum accepted length for a git access token
pub const MIN_SECRET_LEN: usize = 16;

const NAME_PATTERN: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";

/// Validate an application/component/environment name against DNS-1123
/// label rules: lowercase alphanumeric and `-`, starting and ending with an
/// alphanumeric character, at most 63 characters.
///
/// # Errors
///
/// Returns `ScaffoldError::InvalidName` naming the offending value.
pub fn validate_name(name: &str) -> Result<(), ScaffoldError> {
    if name.is_empty() {
        return Err(ScaffoldError::invalid_name(name, "name must not be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ScaffoldError::invalid_name(
            name,
            format!("must be no more than {MAX_NAME_LEN} characters"),
        ));
    }
    let regex = Regex::new(NAME_PATTERN).expect("name pattern is valid");
    if !regex.is_match(name) {
        return Err(ScaffoldError::invalid_name(
            name,
            "a lowercase RFC 1123 label must consist of lower case alphanumeric \
             characters or '-', and must start and end with an alphanumeric character",
        ));
    }
    Ok(())
}

/// Validate a target port: must lie outside the privileged range and within
/// the port number space.
///
/// # Errors
///
/// Returns `ScaffoldError::InvalidName` carrying the offending port.
pub fn validate_target_port(port: u32) -> Result<(), ScaffoldError> {
    if !(1025..=65536).contains(&port) {
        return Err(ScaffoldError::invalid_name(
            port.to_string(),
            "target port must be between 1025 and 65536",
        ));
    }
    Ok(())
}

/// Check whether a non-empty secret is shorter than the accepted minimum.
/// An empty secret is not "too short" here; absence is handled by the
/// credential resolver.
#[must_use]
pub fn secret_too_short(secret: &str) -> bool {
    !secret.is_empty() && secret.len() < MIN_SECRET_LEN
}
