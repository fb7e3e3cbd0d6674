//! # gitopsmith
//!
//! `gitopsmith` scaffolds a GitOps repository layout for Kubernetes
//! applications: components with Kustomize base manifests, environment
//! overlays, and the git plumbing to create and push the remote repository.
//!
//! ## Usage
//!
//! **Bootstrap an application:**
//! ```sh
//! gitopsmith bootstrap-new --application-name app1 --component-name web \
//!     --git-repo-url https://github.com/org/gitops --secret <token>
//! ```
//!
//! **Fully interactive:**
//! ```sh
//! gitopsmith bootstrap-new
//! ```
//!
//! See `gitopsmith --help` for the full command set.

use anyhow::Result;
use clap::Parser as _;
use gitopsmith::cli::Cli;
use gitopsmith::error::ScaffoldError;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    match gitopsmith::run(&cli) {
        Ok(()) => Ok(()),
        Err(err) => {
            error!("{}", err);
            std::process::exit(
                err.downcast_ref::<ScaffoldError>()
                    .map_or(1, ScaffoldError::exit_code),
            );
        }
    }
}
