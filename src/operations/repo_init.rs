//! `init`: create the remote repository and wire the local folder to it

use super::{
    Collaborators, check_mandatory_flags, org_repo_from_url, parse_driver_flag,
    prompt_existing_path, prompt_repo_url, require_application_root, resolve_output, run_git,
};
use crate::cli::InitArgs;
use crate::error::ScaffoldError;
use crate::hosting::{Driver, HostingClient, connect};
use crate::layout::state::has_git_dir;
use crate::secrets::{add_git_suffix, host_from_url, resolve_secret};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything the run phase needs, fully resolved
#[derive(Debug)]
struct InitPlan {
    application_folder: PathBuf,
    git_repo_url: String,
    secret: String,
    driver: Driver,
    host: String,
}

pub fn execute(args: &InitArgs, collab: &Collaborators) -> Result<()> {
    let plan = if args.interactive || !args.any_flag_set() {
        complete_interactive(args, collab)?
    } else {
        complete_non_interactive(args, collab)?
    };
    let client = connect(plan.driver, &plan.host, &plan.secret)?;
    run(&plan, collab, client.as_ref())
}

fn complete_non_interactive(
    args: &InitArgs,
    collab: &Collaborators,
) -> Result<InitPlan, ScaffoldError> {
    check_mandatory_flags(&[(
        "application-folder",
        &args
            .application_folder
            .as_deref()
            .unwrap_or(Path::new(""))
            .display()
            .to_string(),
    )])?;
    let application_folder = resolve_output(
        collab.system,
        args.application_folder.as_deref().unwrap_or(Path::new(".")),
    );
    check_folder(collab, &application_folder)?;

    let Some(raw_url) = args.git_repo_url.as_deref().filter(|u| !u.is_empty()) else {
        return Err(ScaffoldError::invalid_url(
            "a git repository cannot be initialized without --git-repo-url",
        ));
    };
    let git_repo_url = add_git_suffix(raw_url);
    let host = host_from_url(&git_repo_url)?;
    org_repo_from_url(&git_repo_url)?;

    let driver = resolve_driver(args, &host)?;
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

    Ok(InitPlan {
        application_folder,
        git_repo_url,
        secret: resolved.secret,
        driver,
        host,
    })
}

fn complete_interactive(
    args: &InitArgs,
    collab: &Collaborators,
) -> Result<InitPlan, ScaffoldError> {
    println!("Starting interactive prompt");
    let prompter = collab.prompter;

    let application_folder = loop {
        let candidate = match &args.application_folder {
            Some(path) => resolve_output(collab.system, path),
            None => prompt_existing_path(
                collab.system,
                prompter,
                "Provide the path of the bootstrapped application folder",
            )?,
        };
        match check_folder(collab, &candidate) {
            Ok(()) => break candidate,
            // A flag-supplied folder that fails its checks is terminal even
            // in interactive mode; only prompted answers are re-asked.
            Err(err) if args.application_folder.is_some() => return Err(err),
            Err(err) => println!("{err}"),
        }
    };

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
    let mut resolver = super::build_resolver(&host, flag_driver);
    if resolver.resolve(&host).is_none() {
        let choice = prompter.select(
            &format!("Which type of service does {host} run?"),
            "Only github and gitlab hosted services are supported",
            &Driver::NAMES,
            Some(0),
        )?;
        resolver = resolver.with_mapping(&host, choice.parse()?);
    }
    let Some(driver) = resolver.resolve(&host) else {
        return Err(ScaffoldError::invalid_driver(host));
    };

    let resolved = resolve_secret(
        collab.system,
        collab.store,
        &git_repo_url,
        args.secret.as_deref().unwrap_or_default(),
        args.save_token_keyring,
        Some(prompter),
        !args.save_token_keyring,
    )?;

    Ok(InitPlan {
        application_folder,
        git_repo_url,
        secret: resolved.secret,
        driver,
        host,
    })
}

fn check_folder(collab: &Collaborators, folder: &Path) -> Result<(), ScaffoldError> {
    require_application_root(collab.system, folder)?;
    if has_git_dir(collab.system, folder) {
        return Err(ScaffoldError::path_state(format!(
            "a git repository has already been initialized in {}",
            folder.display()
        )));
    }
    Ok(())
}

fn resolve_driver(args: &InitArgs, host: &str) -> Result<Driver, ScaffoldError> {
    let flag_driver = parse_driver_flag(args.private_repo_driver.as_deref())?;
    super::build_resolver(host, flag_driver)
        .resolve(host)
        .ok_or_else(|| {
            ScaffoldError::hosting(format!(
                "no hosting driver is known for {host}; pass --private-repo-driver github|gitlab"
            ))
        })
}

fn run(plan: &InitPlan, collab: &Collaborators, client: &dyn HostingClient) -> Result<()> {
    let (org, repo_name) = org_repo_from_url(&plan.git_repo_url)?;

    // Repositories under the authenticated user are created through the
    // user endpoint, not the org endpoint.
    let current_user = client.current_user()?;
    let org_param = if current_user == org {
        None
    } else {
        Some(org.as_str())
    };
    debug!(org, repo_name, current_user, "creating remote repository");
    if let Err(err) = client.create_repo(org_param, &repo_name, "Bootstrapped GitOps repository") {
        if client.repo_exists(&org, &repo_name).unwrap_or(false) {
            return Err(ScaffoldError::hosting(format!(
                "failed to create repository {org}/{repo_name}, repo already exists"
            ))
            .into());
        }
        return Err(err.into());
    }

    let executor = collab.executor;
    let dir = &plan.application_folder;
    run_git(executor, dir, &["init", "."], "failed to initialize the git repository")?;
    run_git(
        executor,
        dir,
        &["branch", "-m", "main"],
        "failed to rename the default branch",
    )?;
    run_git(
        executor,
        dir,
        &["remote", "add", "origin", &plan.git_repo_url],
        "failed to add the origin remote",
    )?;

    println!(
        "Created repository {}/{} on {} and initialized {}",
        org,
        repo_name,
        plan.host,
        dir.display()
    );
    println!(
        "Next: run 'gitopsmith push --application-folder {} --commit-message <message>' \
         to push the resources",
        dir.display()
    );
    Ok(())
}
