//! `push`: commit the application folder and push it to its remote

use super::{
    Collaborators, check_mandatory_flags, prompt_existing_path, require_application_root,
    resolve_output, run_git,
};
use crate::cli::PushArgs;
use crate::error::ScaffoldError;
use crate::layout::state::has_git_dir;
use anyhow::Result;
use std::path::{Path, PathBuf};

struct PushPlan {
    application_folder: PathBuf,
    commit_message: String,
}

pub fn execute(args: &PushArgs, collab: &Collaborators) -> Result<()> {
    let plan = if args.interactive || !args.any_flag_set() {
        complete_interactive(args, collab)?
    } else {
        complete_non_interactive(args, collab)?
    };
    run(&plan, collab)
}

fn complete_non_interactive(
    args: &PushArgs,
    collab: &Collaborators,
) -> Result<PushPlan, ScaffoldError> {
    check_mandatory_flags(&[
        (
            "application-folder",
            &args
                .application_folder
                .as_deref()
                .unwrap_or(Path::new(""))
                .display()
                .to_string(),
        ),
        (
            "commit-message",
            args.commit_message.as_deref().unwrap_or(""),
        ),
    ])?;
    let application_folder = resolve_output(
        collab.system,
        args.application_folder.as_deref().unwrap_or(Path::new(".")),
    );
    require_application_root(collab.system, &application_folder)?;
    Ok(PushPlan {
        application_folder,
        commit_message: args.commit_message.clone().unwrap_or_default(),
    })
}

fn complete_interactive(
    args: &PushArgs,
    collab: &Collaborators,
) -> Result<PushPlan, ScaffoldError> {
    println!("Starting interactive prompt");
    let prompter = collab.prompter;

    let application_folder = loop {
        let candidate = match &args.application_folder {
            Some(path) => resolve_output(collab.system, path),
            None => prompt_existing_path(
                collab.system,
                prompter,
                "Provide the path of the application folder to push",
            )?,
        };
        match require_application_root(collab.system, &candidate) {
            Ok(()) => break candidate,
            Err(err) if args.application_folder.is_some() => return Err(err),
            Err(err) => println!("{err}"),
        }
    };

    let commit_message = match args.commit_message.as_deref() {
        Some(message) if !message.is_empty() => message.to_owned(),
        _ => loop {
            let answer = prompter.input("Provide a commit message for the push", "", None)?;
            if !answer.is_empty() {
                break answer;
            }
            println!("the commit message must not be empty");
        },
    };

    Ok(PushPlan {
        application_folder,
        commit_message,
    })
}

fn run(plan: &PushPlan, collab: &Collaborators) -> Result<()> {
    let dir = &plan.application_folder;
    // Refuse before issuing any git command; init must have run first.
    if !has_git_dir(collab.system, dir) {
        return Err(ScaffoldError::path_state(format!(
            "no git repository has been initialized in {}",
            dir.display()
        ))
        .into());
    }

    let executor = collab.executor;
    run_git(executor, dir, &["add", "."], "failed to stage the changes")?;
    run_git(
        executor,
        dir,
        &["commit", "-m", &plan.commit_message],
        "failed to commit the changes",
    )?;
    run_git(
        executor,
        dir,
        &["push", "-u", "origin", "main"],
        "failed to push to the remote repository",
    )?;

    println!("Pushed {} to the origin remote", dir.display());
    Ok(())
}
