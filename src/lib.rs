//! `gitopsmith` - A CLI tool for scaffolding and maintaining GitOps repositories
//!
//! This library generates a Kustomize-based directory layout for applications,
//! components, and environment overlays, creates the matching repository on a
//! Git hosting service, and shells out to `git` for the version-control
//! plumbing. Commands run either from flags or through interactive prompts.

pub mod cli;
pub mod error;
pub mod generator;
pub mod hosting;
pub mod layout;
pub mod operations;
pub mod prompts;
pub mod secrets;
pub mod system;

use anyhow::Result;
use cli::{Cli, Command, ComponentCommand, EnvCommand};
use operations::Collaborators;
use prompts::TerminalPrompter;
use secrets::KeyringStore;
use system::{RealExecutor, RealSystem};

/// Main entry point for the gitopsmith library
pub fn run(cli: &Cli) -> Result<()> {
    let system = RealSystem::new();
    let executor = RealExecutor::new();
    let prompter = TerminalPrompter::new();
    let store = KeyringStore::new();
    let collab = Collaborators {
        system: &system,
        executor: &executor,
        prompter: &prompter,
        store: &store,
    };

    match &cli.command {
        Command::BootstrapNew(args) => operations::bootstrap::execute(args, &collab),
        Command::Init(args) => operations::repo_init::execute(args, &collab),
        Command::Push(args) => operations::push::execute(args, &collab),
        Command::Component {
            command: ComponentCommand::Add(args),
        } => operations::component::execute_add(args, &collab),
        Command::Component {
            command: ComponentCommand::Delete(args),
        } => operations::component::execute_delete(args, &collab),
        Command::Env {
            command: EnvCommand::Add(args),
        } => operations::environment::execute(args, &collab),
        Command::Describe(args) => operations::describe::execute(args, &collab),
    }
}
