//! Credential resolution
//!
//! Decides which access token a command uses: the secret store wins over a
//! CLI-supplied value, which wins over an interactive prompt. A token can
//! also arrive through a host-derived environment variable (for example
//! `GITHUB_COM_TOKEN`), which ranks with the store. Persisting to the store
//! happens at most once per resolution.

pub mod store;

pub use store::{KeyringStore, MemoryStore, SecretStore};

use crate::error::ScaffoldError;
use crate::layout::names::secret_too_short;
use crate::prompts::Prompter;
use crate::system::System;
use url::Url;

/// Where the resolved secret came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Store,
    Environment,
    Flag,
    Prompt,
}

/// A resolved access token and its provenance
#[derive(Debug, Clone)]
pub struct ResolvedSecret {
    pub secret: String,
    pub source: SecretSource,
}

/// Extract the host from a repository URL; scheme and path are stripped so
/// the host alone keys the secret store.
///
/// # Errors
///
/// Returns `ScaffoldError::InvalidUrl` when the URL fails to parse or
/// carries no host.
pub fn host_from_url(repo_url: &str) -> Result<String, ScaffoldError> {
    let parsed = Url::parse(repo_url)
        .map_err(|e| ScaffoldError::invalid_url(format!("failed to parse {repo_url:?}: {e}")))?;
    parsed
        .host_str()
        .map(str::to_owned)
        .ok_or_else(|| ScaffoldError::invalid_url(format!("could not identify host from {repo_url:?}")))
}

/// Append a `.git` suffix to a repository URL when missing
#[must_use]
pub fn add_git_suffix(repo_url: &str) -> String {
    if repo_url.is_empty() || repo_url.ends_with(".git") {
        return repo_url.to_owned();
    }
    format!("{repo_url}.git")
}

/// Environment variable a token may be supplied through, derived from the
/// host: `github.com` reads `GITHUB_COM_TOKEN`.
#[must_use]
pub fn token_env_var(host: &str) -> String {
    let mut name: String = host
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    name.push_str("_TOKEN");
    name
}

/// Look up a token for the URL host from the environment or the secret
/// store. `None` means neither source holds one; that is a normal input to
/// the precedence chain, not an error.
pub fn lookup_secret(
    system: &dyn System,
    store: &dyn SecretStore,
    repo_url: &str,
) -> Result<Option<ResolvedSecret>, ScaffoldError> {
    let host = host_from_url(repo_url)?;
    if let Ok(secret) = system.env_var(&token_env_var(&host)) {
        if !secret.is_empty() {
            return Ok(Some(ResolvedSecret {
                secret,
                source: SecretSource::Environment,
            }));
        }
    }
    if let Some(secret) = store.get(&host)? {
        return Ok(Some(ResolvedSecret {
            secret,
            source: SecretSource::Store,
        }));
    }
    Ok(None)
}

/// Resolve the access token for a command.
///
/// Precedence: a store/environment hit wins over the CLI flag, unless
/// `save_to_store` explicitly requests re-saving the CLI value; with
/// nothing found, a prompter (interactive mode) asks for the token and,
/// when `ask_to_save` is set, whether to file it in the keyring.
///
/// # Errors
///
/// `ScaffoldError::MissingCredential` when no source yields a token in
/// non-interactive mode; `ScaffoldError::Cancelled` when the user aborts a
/// prompt.
pub fn resolve_secret(
    system: &dyn System,
    store: &dyn SecretStore,
    repo_url: &str,
    cli_secret: &str,
    save_to_store: bool,
    prompter: Option<&dyn Prompter>,
    ask_to_save: bool,
) -> Result<ResolvedSecret, ScaffoldError> {
    let host = host_from_url(repo_url)?;

    // An explicit re-save overrides the stored value.
    if save_to_store && !cli_secret.is_empty() {
        store.set(&host, cli_secret)?;
        return Ok(ResolvedSecret {
            secret: cli_secret.to_owned(),
            source: SecretSource::Flag,
        });
    }

    if let Some(found) = lookup_secret(system, store, repo_url)? {
        return Ok(found);
    }

    if !cli_secret.is_empty() {
        return Ok(ResolvedSecret {
            secret: cli_secret.to_owned(),
            source: SecretSource::Flag,
        });
    }

    let Some(prompter) = prompter else {
        return Err(ScaffoldError::missing_credential(format!(
            "no token found for {host}"
        )));
    };

    let secret = loop {
        let answer = prompter.password(
            &format!("Provide a token used to authenticate requests to {repo_url}"),
            "Tokens are required to authenticate operations on the git repository \
             (e.g. automated creation of and pushes to the gitops repo).",
        )?;
        if secret_too_short(&answer) {
            println!(
                "the token must be at least {} characters long",
                crate::layout::names::MIN_SECRET_LEN
            );
            continue;
        }
        if !answer.is_empty() {
            break answer;
        }
    };

    let save = if save_to_store {
        true
    } else if ask_to_save {
        prompter.confirm(
            "Do you wish to securely store the access token in the keyring on your local machine?",
            "Stored tokens are reused by later bootstrap/init runs against the same host.",
            false,
        )?
    } else {
        false
    };
    if save {
        store.set(&host, &secret)?;
    }

    Ok(ResolvedSecret {
        secret,
        source: SecretSource::Prompt,
    })
}
