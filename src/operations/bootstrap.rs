//! `bootstrap-new`: scaffold a fresh application with its first component

use super::{
    Collaborators, GeneratorOptions, build_resolver, check_mandatory_flags, org_repo_from_url,
    parse_driver_flag, prompt_for_optionals, prompt_repo_url, prompt_route, prompt_target_port,
    resolve_output, resolve_valid_name, run_git,
};
use crate::cli::BootstrapArgs;
use crate::error::ScaffoldError;
use crate::generator::{ComponentSpec, generate_application};
use crate::layout::names::{validate_name, validate_target_port};
use crate::layout::state::application_path;
use crate::secrets::{add_git_suffix, host_from_url, resolve_secret};
use anyhow::{Context as _, Result};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_NAMESPACE: &str = "openshift-gitops";
pub const DEFAULT_TARGET_PORT: u32 = 8080;

const COMMIT_MESSAGE: &str = "Bootstrap GitOps resources";

pub fn execute(args: &BootstrapArgs, collab: &Collaborators) -> Result<()> {
    let opts = if args.interactive || !args.any_flag_set() {
        complete_interactive(args, collab)?
    } else {
        complete_non_interactive(args, collab)?
    };
    run(&opts, collab)
}

fn complete_non_interactive(
    args: &BootstrapArgs,
    collab: &Collaborators,
) -> Result<GeneratorOptions, ScaffoldError> {
    check_mandatory_flags(&[
        ("application-name", args.application_name.as_deref().unwrap_or("")),
        ("component-name", args.component_name.as_deref().unwrap_or("")),
        ("git-repo-url", args.git_repo_url.as_deref().unwrap_or("")),
        ("secret", args.secret.as_deref().unwrap_or("")),
    ])?;

    let application_name = args.application_name.clone().unwrap_or_default();
    let component_name = args.component_name.clone().unwrap_or_default();
    validate_name(&application_name)?;
    validate_name(&component_name)?;

    let target_port = args.target_port.unwrap_or(DEFAULT_TARGET_PORT);
    validate_target_port(target_port)?;

    let git_repo_url = add_git_suffix(args.git_repo_url.as_deref().unwrap_or_default());
    let host = host_from_url(&git_repo_url)?;
    org_repo_from_url(&git_repo_url)?;

    let flag_driver = parse_driver_flag(args.private_repo_driver.as_deref())?;
    let resolver = build_resolver(&host, flag_driver);

    let resolved = resolve_secret(
        collab.system,
        collab.store,
        &git_repo_url,
        args.secret.as_deref().unwrap_or_default(),
        args.save_token_keyring,
        None,
        false,
    )?;
    debug!(source = ?resolved.source, host, "resolved access token");

    Ok(GeneratorOptions {
        output: resolve_output(
            collab.system,
            args.output.as_deref().unwrap_or(Path::new(".")),
        ),
        component_name,
        application_name,
        secret: resolved.secret,
        git_repo_url,
        namespace: args
            .namespace
            .clone()
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned()),
        target_port,
        push_to_git: args.push_to_git.unwrap_or(false),
        route: args.route.clone(),
        overwrite: args.overwrite,
        save_token_keyring: args.save_token_keyring,
        private_repo_driver: resolver.resolve(&host),
        ..GeneratorOptions::default()
    })
}

fn complete_interactive(
    args: &BootstrapArgs,
    collab: &Collaborators,
) -> Result<GeneratorOptions, ScaffoldError> {
    println!("Starting interactive prompt");
    let prompter = collab.prompter;
    let prompt_all = prompt_for_optionals(prompter)?;

    let application_name = resolve_valid_name(
        prompter,
        args.application_name.as_deref(),
        "Provide the application name to write GitOps resources for",
    )?;
    let component_name = resolve_valid_name(
        prompter,
        args.component_name.as_deref(),
        "Provide the name for the first component of the application",
    )?;

    let git_repo_url = match args.git_repo_url.as_deref() {
        Some(raw) if org_repo_from_url(raw).is_ok() => add_git_suffix(raw),
        Some(raw) => {
            println!("{raw} is not a valid repository URL");
            prompt_repo_url(prompter)?
        }
        None => prompt_repo_url(prompter)?,
    };
    let host = host_from_url(&git_repo_url)?;

    let flag_driver = parse_driver_flag(args.private_repo_driver.as_deref())?;
    let mut resolver = build_resolver(&host, flag_driver);
    if resolver.resolve(&host).is_none() {
        let choice = prompter.select(
            &format!("Which type of service does {host} run?"),
            "Only github and gitlab hosted services are supported",
            &crate::hosting::Driver::NAMES,
            Some(0),
        )?;
        resolver = resolver.with_mapping(&host, choice.parse()?);
    }

    let resolved = resolve_secret(
        collab.system,
        collab.store,
        &git_repo_url,
        args.secret.as_deref().unwrap_or_default(),
        args.save_token_keyring,
        Some(prompter),
        !args.save_token_keyring,
    )?;

    let namespace = match (&args.namespace, prompt_all) {
        (Some(value), _) => value.clone(),
        (None, true) => prompter.input(
            "Provide the namespace the generated manifests will target",
            "",
            Some(DEFAULT_NAMESPACE),
        )?,
        (None, false) => DEFAULT_NAMESPACE.to_owned(),
    };

    let target_port = match args.target_port {
        Some(port) if validate_target_port(port).is_ok() => port,
        Some(port) => {
            println!("{port} is not a valid target port");
            prompt_target_port(prompter)?
        }
        None if prompt_all => prompt_target_port(prompter)?,
        None => DEFAULT_TARGET_PORT,
    };

    let route = match (&args.route, prompt_all) {
        (Some(route_host), _) => Some(route_host.clone()),
        (None, true) => prompt_route(prompter)?,
        (None, false) => None,
    };

    let push_to_git = match (args.push_to_git, prompt_all) {
        (Some(push), _) => push,
        (None, true) => prompter.confirm(
            "Do you want to push the bootstrapped resources to the remote repository right away?",
            "You can always push later with the push command",
            false,
        )?,
        (None, false) => false,
    };

    let mut output = match &args.output {
        Some(path) => resolve_output(collab.system, path),
        None if prompt_all => {
            let answer = prompter.input(
                "Provide a path to write the GitOps resources to",
                "",
                Some("."),
            )?;
            resolve_output(collab.system, Path::new(&answer))
        }
        None => resolve_output(collab.system, Path::new(".")),
    };

    // Keep asking until the target is writable: either the application
    // folder is free, or the user opts into overwriting it.
    let mut overwrite = args.overwrite;
    loop {
        if overwrite
            || !collab
                .system
                .exists(&application_path(&output, &application_name))
        {
            break;
        }
        println!(
            "the application {application_name} already exists at {}",
            output.display()
        );
        overwrite = prompter.confirm(
            "Do you want to overwrite the existing application folder?",
            "",
            false,
        )?;
        if overwrite {
            break;
        }
        let answer = prompter.input(
            "Provide a different path to write the GitOps resources to",
            "",
            Some("."),
        )?;
        output = resolve_output(collab.system, Path::new(&answer));
    }

    Ok(GeneratorOptions {
        output,
        component_name,
        application_name,
        secret: resolved.secret,
        git_repo_url,
        namespace,
        target_port,
        push_to_git,
        route,
        overwrite,
        save_token_keyring: args.save_token_keyring,
        private_repo_driver: resolver.resolve(&host),
        ..GeneratorOptions::default()
    })
}

pub fn run(opts: &GeneratorOptions, collab: &Collaborators) -> Result<()> {
    let application_dir = application_path(&opts.output, &opts.application_name);
    if collab.system.exists(&application_dir) {
        if !opts.overwrite {
            return Err(ScaffoldError::path_state(format!(
                "the application {} already exists at {}; use --overwrite to replace it",
                opts.application_name,
                opts.output.display()
            ))
            .into());
        }
        collab
            .system
            .remove_dir_all(&application_dir)
            .with_context(|| format!("failed to clear {}", application_dir.display()))?;
    }

    generate_application(
        collab.system,
        &opts.output,
        &ComponentSpec {
            application: opts.application_name.clone(),
            component: opts.component_name.clone(),
            namespace: opts.namespace.clone(),
            target_port: opts.target_port,
            route: opts.route.clone(),
        },
    )?;

    if opts.push_to_git {
        push_bootstrap(opts, collab, &application_dir)?;
    }

    println!(
        "Bootstrapped application {} with component {} at {}",
        opts.application_name,
        opts.component_name,
        opts.output.display()
    );
    if opts.push_to_git {
        println!(
            "Pushed the bootstrapped resources to {}",
            opts.git_repo_url
        );
    } else {
        println!(
            "Next: run 'gitopsmith init --application-folder {} --git-repo-url {}' \
             to create the remote repository, then push",
            application_dir.display(),
            opts.git_repo_url
        );
    }
    Ok(())
}

fn push_bootstrap(
    opts: &GeneratorOptions,
    collab: &Collaborators,
    application_dir: &Path,
) -> Result<(), ScaffoldError> {
    let executor = collab.executor;
    run_git(
        executor,
        application_dir,
        &["init", "."],
        "failed to initialize the git repository",
    )?;
    run_git(
        executor,
        application_dir,
        &["branch", "-m", "main"],
        "failed to rename the default branch",
    )?;
    run_git(
        executor,
        application_dir,
        &["remote", "add", "origin", &opts.git_repo_url],
        "failed to add the origin remote",
    )?;
    run_git(
        executor,
        application_dir,
        &["add", "."],
        "failed to stage the generated resources",
    )?;
    run_git(
        executor,
        application_dir,
        &["commit", "-m", COMMIT_MESSAGE],
        "failed to commit the generated resources",
    )?;
    run_git(
        executor,
        application_dir,
        &["push", "-u", "origin", "main"],
        "failed to push to the remote repository",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::ScriptedPrompter;
    use crate::secrets::{MemoryStore, SecretStore as _};
    use crate::system::{MockExecutor, MockSystem, System as _};
    use std::path::PathBuf;

    fn args() -> BootstrapArgs {
        BootstrapArgs {
            component_name: Some("comp1".to_owned()),
            application_name: Some("app1".to_owned()),
            git_repo_url: Some("https://github.com/org/gitops".to_owned()),
            secret: Some("abcdefghijklmnop".to_owned()),
            namespace: None,
            target_port: None,
            push_to_git: None,
            route: None,
            overwrite: false,
            save_token_keyring: false,
            private_repo_driver: None,
            output: Some(PathBuf::from("/work")),
            interactive: false,
        }
    }

    fn collaborators<'a>(
        system: &'a MockSystem,
        executor: &'a MockExecutor,
        prompter: &'a ScriptedPrompter,
        store: &'a MemoryStore,
    ) -> Collaborators<'a> {
        Collaborators {
            system,
            executor,
            prompter,
            store,
        }
    }

    #[test]
    fn test_missing_flags_are_reported_together() {
        let system = MockSystem::new();
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let mut args = args();
        args.component_name = None;
        args.secret = None;
        let err = execute(&args, &collab).unwrap_err();
        let scaffold = err.downcast_ref::<ScaffoldError>().unwrap();
        assert_eq!(
            scaffold.to_string(),
            "required flag(s) \"component-name\", \"secret\" not set"
        );
        assert_eq!(scaffold.exit_code(), 1);
    }

    #[test]
    fn test_non_interactive_generates_tree_without_push() {
        let system = MockSystem::new().with_dir("/work");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        execute(&args(), &collab).unwrap();

        assert!(system.exists(Path::new("/work/app1/components/comp1/base/deployment.yaml")));
        assert!(system.exists(Path::new("/work/app1/kustomization.yaml")));
        assert!(executor.calls().is_empty());
        assert!(prompter.transcript().is_empty());
    }

    #[test]
    fn test_push_to_git_runs_full_git_sequence() {
        let system = MockSystem::new().with_dir("/work");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let mut args = args();
        args.push_to_git = Some(true);
        execute(&args, &collab).unwrap();

        assert_eq!(
            executor.command_lines(),
            vec![
                "git init .",
                "git branch -m main",
                "git remote add origin https://github.com/org/gitops.git",
                "git add .",
                "git commit -m Bootstrap GitOps resources",
                "git push -u origin main",
            ]
        );
    }

    #[test]
    fn test_existing_application_without_overwrite_fails() {
        let system = MockSystem::new().with_dir("/work/app1");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let err = execute(&args(), &collab).unwrap_err();
        let scaffold = err.downcast_ref::<ScaffoldError>().unwrap();
        assert!(scaffold.to_string().contains("already exists"));
        assert_eq!(scaffold.exit_code(), 3);
    }

    #[test]
    fn test_overwrite_replaces_existing_application() {
        let system = MockSystem::new()
            .with_dir("/work/app1/components/stale")
            .with_file("/work/app1/leftover.yaml", b"old");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let mut args = args();
        args.overwrite = true;
        execute(&args, &collab).unwrap();

        assert!(!system.exists(Path::new("/work/app1/leftover.yaml")));
        assert!(!system.exists(Path::new("/work/app1/components/stale")));
        assert!(system.exists(Path::new("/work/app1/components/comp1/base/service.yaml")));
    }

    #[test]
    fn test_invalid_component_name_rejected() {
        let system = MockSystem::new().with_dir("/work");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let mut args = args();
        args.component_name = Some("Comp_One".to_owned());
        let err = execute(&args, &collab).unwrap_err();
        let scaffold = err.downcast_ref::<ScaffoldError>().unwrap();
        assert_eq!(scaffold.exit_code(), 2);
    }

    #[test]
    fn test_stored_token_wins_over_flag() {
        let system = MockSystem::new().with_dir("/work");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new().with_secret("github.com", "stored-token-1234567");
        let collab = collaborators(&system, &executor, &prompter, &store);

        let opts = complete_non_interactive(&args(), &collab).unwrap();
        assert_eq!(opts.secret, "stored-token-1234567");
    }

    #[test]
    fn test_save_token_keyring_forces_flag_value() {
        let system = MockSystem::new().with_dir("/work");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new().with_secret("github.com", "stored-token-1234567");
        let collab = collaborators(&system, &executor, &prompter, &store);

        let mut args = args();
        args.save_token_keyring = true;
        let opts = complete_non_interactive(&args, &collab).unwrap();
        assert_eq!(opts.secret, "abcdefghijklmnop");
        assert_eq!(
            store.get("github.com").unwrap().as_deref(),
            Some("abcdefghijklmnop")
        );
    }

    #[test]
    fn test_interactive_flow_completes_options() {
        let system = MockSystem::new().with_dir("/work");
        let executor = MockExecutor::new();
        // accept defaults, app name, component name, url, token, save? no
        let prompter = ScriptedPrompter::with_answers([
            "yes",
            "app1",
            "comp1",
            "https://github.com/org/gitops",
            "prompted-token-123456",
            "no",
        ]);
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let args = BootstrapArgs {
            component_name: None,
            application_name: None,
            git_repo_url: None,
            secret: None,
            namespace: None,
            target_port: None,
            push_to_git: None,
            route: None,
            overwrite: false,
            save_token_keyring: false,
            private_repo_driver: None,
            output: None,
            interactive: true,
        };
        let opts = complete_interactive(&args, &collab).unwrap();
        assert_eq!(opts.application_name, "app1");
        assert_eq!(opts.component_name, "comp1");
        assert_eq!(opts.git_repo_url, "https://github.com/org/gitops.git");
        assert_eq!(opts.secret, "prompted-token-123456");
        assert_eq!(opts.target_port, DEFAULT_TARGET_PORT);
        assert_eq!(opts.namespace, DEFAULT_NAMESPACE);
        assert!(!opts.push_to_git);
        assert!(store.get("github.com").unwrap().is_none());
    }

    #[test]
    fn test_interactive_unknown_host_asks_for_driver() {
        let system = MockSystem::new().with_dir("/work");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::with_answers([
            "yes",
            "app1",
            "comp1",
            "https://git.corp.example/org/gitops",
            "gitlab",
            "prompted-token-123456",
            "no",
        ]);
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let args = BootstrapArgs {
            component_name: None,
            application_name: None,
            git_repo_url: None,
            secret: None,
            namespace: None,
            target_port: None,
            push_to_git: None,
            route: None,
            overwrite: false,
            save_token_keyring: false,
            private_repo_driver: None,
            output: None,
            interactive: true,
        };
        let opts = complete_interactive(&args, &collab).unwrap();
        assert_eq!(
            opts.private_repo_driver,
            Some(crate::hosting::Driver::Gitlab)
        );
    }

    #[test]
    fn test_interactive_cancellation_stops_the_run() {
        let system = MockSystem::new().with_dir("/work");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::with_answers(["yes", "app1"]);
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let args = BootstrapArgs {
            component_name: None,
            application_name: None,
            git_repo_url: None,
            secret: None,
            namespace: None,
            target_port: None,
            push_to_git: None,
            route: None,
            overwrite: false,
            save_token_keyring: false,
            private_repo_driver: None,
            output: None,
            interactive: true,
        };
        let err = complete_interactive(&args, &collab).unwrap_err();
        assert!(matches!(err, ScaffoldError::Cancelled));
        assert!(executor.calls().is_empty());
    }
}
