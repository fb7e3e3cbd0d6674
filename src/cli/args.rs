//! Command-line definitions
//!
//! Mandatory flags are deliberately NOT marked `required` at the clap
//! level: a command invoked with no flags at all drops into interactive
//! mode instead of erroring, so missing-flag validation only happens once
//! non-interactive mode has been chosen.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Scaffold and manage GitOps repositories for Kubernetes applications
#[derive(Debug, Parser)]
#[command(name = "gitopsmith", version, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bootstrap a new GitOps application with its first component
    #[command(name = "bootstrap-new")]
    BootstrapNew(BootstrapArgs),

    /// Create the remote repository and initialize the local folder as a
    /// git repository wired to it
    Init(InitArgs),

    /// Commit the application folder and push it to the remote repository
    Push(PushArgs),

    /// Manage components of an application
    Component {
        #[command(subcommand)]
        command: ComponentCommand,
    },

    /// Manage environments of a component
    Env {
        #[command(subcommand)]
        command: EnvCommand,
    },

    /// Summarize the components and environments of an application
    Describe(DescribeArgs),
}

#[derive(Debug, Subcommand)]
pub enum ComponentCommand {
    /// Add a component to an existing application
    Add(ComponentAddArgs),

    /// Delete a component from an existing application
    Delete(ComponentDeleteArgs),
}

#[derive(Debug, Subcommand)]
pub enum EnvCommand {
    /// Add an environment overlay to an existing component
    Add(EnvAddArgs),
}

#[derive(Debug, Args)]
pub struct BootstrapArgs {
    /// Name of the initial component
    #[arg(long)]
    pub component_name: Option<String>,

    /// Name of the application
    #[arg(long)]
    pub application_name: Option<String>,

    /// URL of the remote git repository the application will be pushed to
    #[arg(long)]
    pub git_repo_url: Option<String>,

    /// Access token used to authenticate against the git hosting service
    #[arg(long)]
    pub secret: Option<String>,

    /// Namespace the generated manifests target
    #[arg(long)]
    pub namespace: Option<String>,

    /// Port the component service listens on
    #[arg(long)]
    pub target_port: Option<u32>,

    /// Push the bootstrapped application to the remote repository
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub push_to_git: Option<bool>,

    /// Hostname to expose the component with via a route
    #[arg(long)]
    pub route: Option<String>,

    /// Overwrite an existing application folder
    #[arg(long)]
    pub overwrite: bool,

    /// Save the access token in the OS keyring
    #[arg(long)]
    pub save_token_keyring: bool,

    /// Hosting driver (github or gitlab) for self-hosted instances
    #[arg(long)]
    pub private_repo_driver: Option<String>,

    /// Folder the application is generated into
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Prompt for every option instead of reading flags
    #[arg(long)]
    pub interactive: bool,
}

impl BootstrapArgs {
    /// True when at least one non-mode flag was given; with none, the
    /// command drops into interactive mode.
    pub fn any_flag_set(&self) -> bool {
        self.component_name.is_some()
            || self.application_name.is_some()
            || self.git_repo_url.is_some()
            || self.secret.is_some()
            || self.namespace.is_some()
            || self.target_port.is_some()
            || self.push_to_git.is_some()
            || self.route.is_some()
            || self.overwrite
            || self.save_token_keyring
            || self.private_repo_driver.is_some()
            || self.output.is_some()
    }
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Path of the locally bootstrapped application folder
    #[arg(long)]
    pub application_folder: Option<PathBuf>,

    /// URL of the remote git repository to create
    #[arg(long)]
    pub git_repo_url: Option<String>,

    /// Access token used to authenticate against the git hosting service
    #[arg(long)]
    pub secret: Option<String>,

    /// Save the access token in the OS keyring
    #[arg(long)]
    pub save_token_keyring: bool,

    /// Hosting driver (github or gitlab) for self-hosted instances
    #[arg(long)]
    pub private_repo_driver: Option<String>,

    /// Prompt for every option instead of reading flags
    #[arg(long)]
    pub interactive: bool,
}

impl InitArgs {
    pub fn any_flag_set(&self) -> bool {
        self.application_folder.is_some()
            || self.git_repo_url.is_some()
            || self.secret.is_some()
            || self.save_token_keyring
            || self.private_repo_driver.is_some()
    }
}

#[derive(Debug, Args)]
pub struct PushArgs {
    /// Path of the locally initialized application folder
    #[arg(long)]
    pub application_folder: Option<PathBuf>,

    /// Commit message for the pushed changes
    #[arg(long)]
    pub commit_message: Option<String>,

    /// Prompt for every option instead of reading flags
    #[arg(long)]
    pub interactive: bool,
}

impl PushArgs {
    pub fn any_flag_set(&self) -> bool {
        self.application_folder.is_some() || self.commit_message.is_some()
    }
}

#[derive(Debug, Args)]
pub struct ComponentAddArgs {
    /// Name of the component to add
    #[arg(long)]
    pub component_name: Option<String>,

    /// Name of the application the component belongs to
    #[arg(long)]
    pub application_name: Option<String>,

    /// Folder containing the application
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Namespace the generated manifests target
    #[arg(long)]
    pub namespace: Option<String>,

    /// Port the component service listens on
    #[arg(long)]
    pub target_port: Option<u32>,

    /// Hostname to expose the component with via a route
    #[arg(long)]
    pub route: Option<String>,

    /// Prompt for every option instead of reading flags
    #[arg(long)]
    pub interactive: bool,
}

impl ComponentAddArgs {
    pub fn any_flag_set(&self) -> bool {
        self.component_name.is_some()
            || self.application_name.is_some()
            || self.output.is_some()
            || self.namespace.is_some()
            || self.target_port.is_some()
            || self.route.is_some()
    }
}

#[derive(Debug, Args)]
pub struct ComponentDeleteArgs {
    /// Name of the component to delete
    #[arg(long)]
    pub component_name: Option<String>,

    /// Name of the application the component belongs to
    #[arg(long)]
    pub application_name: Option<String>,

    /// Folder containing the application
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Commit and push the deletion to the remote repository
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub push_to_git: Option<bool>,

    /// Prompt for every option instead of reading flags
    #[arg(long)]
    pub interactive: bool,
}

impl ComponentDeleteArgs {
    pub fn any_flag_set(&self) -> bool {
        self.component_name.is_some()
            || self.application_name.is_some()
            || self.output.is_some()
            || self.push_to_git.is_some()
    }
}

#[derive(Debug, Args)]
pub struct EnvAddArgs {
    /// Name of the environment to add
    #[arg(long)]
    pub env_name: Option<String>,

    /// Name of the component the environment belongs to
    #[arg(long)]
    pub component_name: Option<String>,

    /// Name of the application the component belongs to
    #[arg(long)]
    pub application_name: Option<String>,

    /// Folder containing the application
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Prompt for every option instead of reading flags
    #[arg(long)]
    pub interactive: bool,
}

impl EnvAddArgs {
    pub fn any_flag_set(&self) -> bool {
        self.env_name.is_some()
            || self.component_name.is_some()
            || self.application_name.is_some()
            || self.output.is_some()
    }
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Path of the application folder to describe
    #[arg(long)]
    pub application_folder: Option<PathBuf>,

    /// Name of the application; combined with --output as an alternative
    /// to --application-folder
    #[arg(long)]
    pub application_name: Option<String>,

    /// Folder containing the application; combined with --application-name
    #[arg(long)]
    pub output: Option<PathBuf>,
}
