//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for gitopsmith operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScaffoldError {
    /// One or more mandatory flags were not set in non-interactive mode.
    /// Flags are pre-sorted and quoted so the message is deterministic.
    #[error("required flag(s) {} not set", .flags.join(", "))]
    MissingFlags { flags: Vec<String> },

    /// A name failed DNS-1123 label validation
    #[error("{name} is not a valid name: {reason}")]
    InvalidName { name: String, reason: String },

    /// A repository URL failed to parse or has no host
    #[error("invalid repository URL: {message}")]
    InvalidUrl { message: String },

    /// An explicitly supplied hosting driver is not supported
    #[error("invalid driver type: {driver:?}")]
    InvalidDriver { driver: String },

    /// A path is missing, is not a valid application root, or an entity
    /// already exists / does not exist where the command requires otherwise
    #[error("{message}")]
    PathState { message: String },

    /// No access token resolvable from the secret store, flags, or prompt
    #[error(
        "unable to resolve an access token from the keyring or flags: {message}, please pass a valid token to --secret"
    )]
    MissingCredential { message: String },

    /// The git executor returned a failure; carries the combined output
    #[error("{message}")]
    ExternalTool { message: String },

    /// A hosting provider API call failed
    #[error("{message}")]
    Hosting { message: String },

    /// The user cancelled an interactive prompt
    #[error("interactive prompt cancelled")]
    Cancelled,
}

impl ScaffoldError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::MissingFlags { .. } | Self::Cancelled => 1,
            Self::InvalidName { .. } | Self::InvalidUrl { .. } | Self::InvalidDriver { .. } => 2,
            Self::PathState { .. } => 3,
            Self::MissingCredential { .. } => 4,
            Self::Hosting { .. } => 5,
            Self::ExternalTool { .. } => 6,
        }
    }

    /// Create a missing-flags error from the already-sorted flag list
    #[inline]
    pub fn missing_flags(flags: Vec<String>) -> Self {
        Self::MissingFlags { flags }
    }

    /// Create an invalid-name error
    #[inline]
    pub fn invalid_name<S: Into<String>, R: Into<String>>(name: S, reason: R) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-URL error
    #[inline]
    pub fn invalid_url<S: Into<String>>(message: S) -> Self {
        Self::InvalidUrl {
            message: message.into(),
        }
    }

    /// Create an invalid-driver error
    #[inline]
    pub fn invalid_driver<S: Into<String>>(driver: S) -> Self {
        Self::InvalidDriver {
            driver: driver.into(),
        }
    }

    /// Create a path-state error
    #[inline]
    pub fn path_state<S: Into<String>>(message: S) -> Self {
        Self::PathState {
            message: message.into(),
        }
    }

    /// Create a missing-credential error
    #[inline]
    pub fn missing_credential<S: Into<String>>(message: S) -> Self {
        Self::MissingCredential {
            message: message.into(),
        }
    }

    /// Create an external-tool error
    #[inline]
    pub fn external_tool<S: Into<String>>(message: S) -> Self {
        Self::ExternalTool {
            message: message.into(),
        }
    }

    /// Create a hosting-API error
    #[inline]
    pub fn hosting<S: Into<String>>(message: S) -> Self {
        Self::Hosting {
            message: message.into(),
        }
    }
}
