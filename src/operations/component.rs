//! `component add` / `component delete`

use super::{
    Collaborators, check_mandatory_flags, prompt_existing_path, prompt_for_optionals,
    prompt_route, prompt_target_port, require_application_root, resolve_output,
    resolve_valid_name, run_git,
};
use crate::cli::{ComponentAddArgs, ComponentDeleteArgs};
use crate::error::ScaffoldError;
use crate::generator::{ComponentSpec, delete_component, generate_component};
use crate::layout::names::{validate_name, validate_target_port};
use crate::layout::state::{application_path, component_exists, has_git_dir, list_components};
use crate::operations::bootstrap::{DEFAULT_NAMESPACE, DEFAULT_TARGET_PORT};
use anyhow::Result;
use std::path::{Path, PathBuf};

// ==================== add ====================

struct AddPlan {
    output: PathBuf,
    application_name: String,
    component_name: String,
    namespace: String,
    target_port: u32,
    route: Option<String>,
}

pub fn execute_add(args: &ComponentAddArgs, collab: &Collaborators) -> Result<()> {
    let plan = if args.interactive || !args.any_flag_set() {
        complete_add_interactive(args, collab)?
    } else {
        complete_add_non_interactive(args, collab)?
    };

    generate_component(
        collab.system,
        &plan.output,
        &ComponentSpec {
            application: plan.application_name.clone(),
            component: plan.component_name.clone(),
            namespace: plan.namespace.clone(),
            target_port: plan.target_port,
            route: plan.route.clone(),
        },
    )?;
    println!(
        "Created component {} in application {}",
        plan.component_name, plan.application_name
    );
    println!(
        "Next: run 'gitopsmith push --application-folder {}' to push the new component",
        application_path(&plan.output, &plan.application_name).display()
    );
    Ok(())
}

fn complete_add_non_interactive(
    args: &ComponentAddArgs,
    collab: &Collaborators,
) -> Result<AddPlan, ScaffoldError> {
    check_mandatory_flags(&[
        ("application-name", args.application_name.as_deref().unwrap_or("")),
        ("component-name", args.component_name.as_deref().unwrap_or("")),
    ])?;
    let application_name = args.application_name.clone().unwrap_or_default();
    let component_name = args.component_name.clone().unwrap_or_default();
    validate_name(&application_name)?;
    validate_name(&component_name)?;

    let target_port = args.target_port.unwrap_or(DEFAULT_TARGET_PORT);
    validate_target_port(target_port)?;

    let output = resolve_output(
        collab.system,
        args.output.as_deref().unwrap_or(Path::new(".")),
    );
    check_application(collab, &output, &application_name)?;
    if component_exists(collab.system, &output, &application_name, &component_name) {
        return Err(ScaffoldError::path_state(format!(
            "the component {component_name} already exists in application {application_name}"
        )));
    }

    Ok(AddPlan {
        output,
        application_name,
        component_name,
        namespace: args
            .namespace
            .clone()
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned()),
        target_port,
        route: args.route.clone(),
    })
}

fn complete_add_interactive(
    args: &ComponentAddArgs,
    collab: &Collaborators,
) -> Result<AddPlan, ScaffoldError> {
    println!("Starting interactive prompt");
    let prompter = collab.prompter;
    let prompt_all = prompt_for_optionals(prompter)?;

    let output = resolve_existing_output(collab, args.output.as_deref())?;
    let application_name = resolve_application(
        collab,
        &output,
        args.application_name.as_deref(),
        "Provide the name of the application to add the component to",
    )?;

    let component_name = loop {
        let name = resolve_valid_name(
            prompter,
            args.component_name.as_deref(),
            "Provide the name of the new component",
        )?;
        if !component_exists(collab.system, &output, &application_name, &name) {
            break name;
        }
        let err = ScaffoldError::path_state(format!(
            "the component {name} already exists in application {application_name}"
        ));
        if args.component_name.as_deref() == Some(name.as_str()) {
            return Err(err);
        }
        println!("{err}");
    };

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

    Ok(AddPlan {
        output,
        application_name,
        component_name,
        namespace,
        target_port,
        route,
    })
}

// ==================== delete ====================

struct DeletePlan {
    output: PathBuf,
    application_name: String,
    component_name: String,
    push_to_git: bool,
}

pub fn execute_delete(args: &ComponentDeleteArgs, collab: &Collaborators) -> Result<()> {
    let plan = if args.interactive || !args.any_flag_set() {
        complete_delete_interactive(args, collab)?
    } else {
        complete_delete_non_interactive(args, collab)?
    };

    delete_component(
        collab.system,
        &plan.output,
        &plan.application_name,
        &plan.component_name,
    )?;

    if plan.push_to_git {
        let application_dir = application_path(&plan.output, &plan.application_name);
        if !has_git_dir(collab.system, &application_dir) {
            return Err(ScaffoldError::path_state(format!(
                "no git repository has been initialized in {}",
                application_dir.display()
            ))
            .into());
        }
        let message = format!("Removed component {}", plan.component_name);
        run_git(
            collab.executor,
            &application_dir,
            &["add", "."],
            "failed to stage the deletion",
        )?;
        run_git(
            collab.executor,
            &application_dir,
            &["commit", "-m", &message],
            "failed to commit the deletion",
        )?;
        run_git(
            collab.executor,
            &application_dir,
            &["push", "-u", "origin", "main"],
            "failed to push to the remote repository",
        )?;
    }

    println!(
        "Deleted component {} from application {}",
        plan.component_name, plan.application_name
    );
    Ok(())
}

fn complete_delete_non_interactive(
    args: &ComponentDeleteArgs,
    collab: &Collaborators,
) -> Result<DeletePlan, ScaffoldError> {
    check_mandatory_flags(&[
        ("application-name", args.application_name.as_deref().unwrap_or("")),
        ("component-name", args.component_name.as_deref().unwrap_or("")),
    ])?;
    let application_name = args.application_name.clone().unwrap_or_default();
    let component_name = args.component_name.clone().unwrap_or_default();
    validate_name(&application_name)?;
    validate_name(&component_name)?;

    let output = resolve_output(
        collab.system,
        args.output.as_deref().unwrap_or(Path::new(".")),
    );
    check_application(collab, &output, &application_name)?;
    require_components_present(collab, &output, &application_name)?;
    if !component_exists(collab.system, &output, &application_name, &component_name) {
        return Err(ScaffoldError::path_state(format!(
            "the component {component_name} does not exist in application {application_name}"
        )));
    }

    Ok(DeletePlan {
        output,
        application_name,
        component_name,
        push_to_git: args.push_to_git.unwrap_or(false),
    })
}

fn complete_delete_interactive(
    args: &ComponentDeleteArgs,
    collab: &Collaborators,
) -> Result<DeletePlan, ScaffoldError> {
    println!("Starting interactive prompt");
    let prompter = collab.prompter;

    let output = resolve_existing_output(collab, args.output.as_deref())?;
    let application_name = resolve_application(
        collab,
        &output,
        args.application_name.as_deref(),
        "Provide the name of the application to delete the component from",
    )?;

    let components = list_components(collab.system, &output, &application_name);
    if components.is_empty() {
        return Err(ScaffoldError::path_state(format!(
            "there are no components in the {application_name} application at {}",
            output.display()
        )));
    }
    let component_name = match args.component_name.as_deref() {
        Some(name) if components.iter().any(|c| c == name) => name.to_owned(),
        Some(name) => {
            return Err(ScaffoldError::path_state(format!(
                "the component {name} does not exist in application {application_name}"
            )));
        }
        None => {
            let options: Vec<&str> = components.iter().map(String::as_str).collect();
            prompter.select(
                "Select the component to delete",
                "The component folder and its overlays are removed",
                &options,
                Some(0),
            )?
        }
    };

    let push_to_git = match args.push_to_git {
        Some(push) => push,
        None => prompter.confirm(
            "Do you want to commit and push the deletion to the remote repository?",
            "",
            false,
        )?,
    };

    Ok(DeletePlan {
        output,
        application_name,
        component_name,
        push_to_git,
    })
}

// ==================== shared checks ====================

fn check_application(
    collab: &Collaborators,
    output: &Path,
    application: &str,
) -> Result<(), ScaffoldError> {
    if !collab.system.exists(output) {
        return Err(ScaffoldError::path_state(format!(
            "the given path {} does not exist",
            output.display()
        )));
    }
    require_application_root(collab.system, &application_path(output, application))
}

fn require_components_present(
    collab: &Collaborators,
    output: &Path,
    application: &str,
) -> Result<(), ScaffoldError> {
    if list_components(collab.system, output, application).is_empty() {
        return Err(ScaffoldError::path_state(format!(
            "there are no components in the {application} application at {}",
            output.display()
        )));
    }
    Ok(())
}

pub(super) fn resolve_existing_output(
    collab: &Collaborators,
    provided: Option<&Path>,
) -> Result<PathBuf, ScaffoldError> {
    if let Some(path) = provided {
        let resolved = resolve_output(collab.system, path);
        if collab.system.exists(&resolved) {
            return Ok(resolved);
        }
        println!("the given path {} does not exist", resolved.display());
    }
    prompt_existing_path(
        collab.system,
        collab.prompter,
        "Provide the path containing the application",
    )
}

pub(super) fn resolve_application(
    collab: &Collaborators,
    output: &Path,
    provided: Option<&str>,
    message: &str,
) -> Result<String, ScaffoldError> {
    loop {
        let name = resolve_valid_name(collab.prompter, provided, message)?;
        match require_application_root(collab.system, &application_path(output, &name)) {
            Ok(()) => return Ok(name),
            Err(err) if provided == Some(name.as_str()) => return Err(err),
            Err(err) => println!("{err}"),
        }
    }
}
