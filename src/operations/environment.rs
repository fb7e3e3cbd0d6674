//! `env add`: scaffold an environment overlay for a component

use super::{Collaborators, check_mandatory_flags, resolve_output, resolve_valid_name};
use crate::cli::EnvAddArgs;
use crate::error::ScaffoldError;
use crate::generator::generate_environment;
use crate::layout::names::validate_name;
use crate::layout::state::{
    application_path, component_exists, environment_exists, environment_path, list_components,
};
use anyhow::Result;
use std::path::{Path, PathBuf};

struct EnvPlan {
    output: PathBuf,
    application_name: String,
    component_name: String,
    environment_name: String,
}

pub fn execute(args: &EnvAddArgs, collab: &Collaborators) -> Result<()> {
    let plan = if args.interactive || !args.any_flag_set() {
        complete_interactive(args, collab)?
    } else {
        complete_non_interactive(args, collab)?
    };

    generate_environment(
        collab.system,
        &plan.output,
        &plan.application_name,
        &plan.component_name,
        &plan.environment_name,
    )?;
    println!(
        "Created environment {} for component {} in application {}",
        plan.environment_name, plan.component_name, plan.application_name
    );
    println!(
        "Customize {} to tune the deployment for this environment",
        environment_path(
            &plan.output,
            &plan.application_name,
            &plan.component_name,
            &plan.environment_name,
        )
        .join("deployment-patch.yaml")
        .display()
    );
    Ok(())
}

fn complete_non_interactive(
    args: &EnvAddArgs,
    collab: &Collaborators,
) -> Result<EnvPlan, ScaffoldError> {
    check_mandatory_flags(&[
        ("application-name", args.application_name.as_deref().unwrap_or("")),
        ("component-name", args.component_name.as_deref().unwrap_or("")),
        ("env-name", args.env_name.as_deref().unwrap_or("")),
    ])?;
    let application_name = args.application_name.clone().unwrap_or_default();
    let component_name = args.component_name.clone().unwrap_or_default();
    let environment_name = args.env_name.clone().unwrap_or_default();
    validate_name(&application_name)?;
    validate_name(&component_name)?;
    validate_name(&environment_name)?;

    let output = resolve_output(
        collab.system,
        args.output.as_deref().unwrap_or(Path::new(".")),
    );
    super::require_application_root(collab.system, &application_path(&output, &application_name))?;
    if !component_exists(collab.system, &output, &application_name, &component_name) {
        return Err(ScaffoldError::path_state(format!(
            "the component {component_name} does not exist in application {application_name}"
        )));
    }
    if environment_exists(
        collab.system,
        &output,
        &application_name,
        &component_name,
        &environment_name,
    ) {
        return Err(ScaffoldError::path_state(format!(
            "the environment {environment_name} already exists for component {component_name}"
        )));
    }

    Ok(EnvPlan {
        output,
        application_name,
        component_name,
        environment_name,
    })
}

fn complete_interactive(
    args: &EnvAddArgs,
    collab: &Collaborators,
) -> Result<EnvPlan, ScaffoldError> {
    println!("Starting interactive prompt");
    let prompter = collab.prompter;

    let output = super::component::resolve_existing_output(collab, args.output.as_deref())?;
    let application_name = super::component::resolve_application(
        collab,
        &output,
        args.application_name.as_deref(),
        "Provide the name of the application",
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
                "Select the component to add the environment overlay to",
                "",
                &options,
                Some(0),
            )?
        }
    };

    let environment_name = loop {
        let name = resolve_valid_name(
            prompter,
            args.env_name.as_deref(),
            "Provide the name of the new environment",
        )?;
        if !environment_exists(
            collab.system,
            &output,
            &application_name,
            &component_name,
            &name,
        ) {
            break name;
        }
        let err = ScaffoldError::path_state(format!(
            "the environment {name} already exists for component {component_name}"
        ));
        if args.env_name.as_deref() == Some(name.as_str()) {
            return Err(err);
        }
        println!("{err}");
    };

    Ok(EnvPlan {
        output,
        application_name,
        component_name,
        environment_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::ScriptedPrompter;
    use crate::secrets::MemoryStore;
    use crate::system::{MockExecutor, MockSystem, System as _};

    fn args() -> EnvAddArgs {
        EnvAddArgs {
            env_name: Some("stage".to_owned()),
            component_name: Some("comp1".to_owned()),
            application_name: Some("app1".to_owned()),
            output: Some(PathBuf::from("/gitops")),
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
    fn test_env_add_writes_overlay() {
        let system = MockSystem::new().with_dir("/gitops/app1/components/comp1/base");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        execute(&args(), &collab).unwrap();

        let patch = system
            .read_to_string(Path::new(
                "/gitops/app1/components/comp1/overlays/stage/deployment-patch.yaml",
            ))
            .unwrap();
        assert!(patch.contains("replicas: 1"));
        assert!(patch.contains("cpu: '1'"));
        assert!(patch.contains("memory: 256Mi"));
        let kustomization = system
            .read_to_string(Path::new(
                "/gitops/app1/components/comp1/overlays/stage/kustomization.yaml",
            ))
            .unwrap();
        assert!(kustomization.contains("../../base"));
    }

    #[test]
    fn test_env_add_rejects_duplicate_environment() {
        let system =
            MockSystem::new().with_dir("/gitops/app1/components/comp1/overlays/stage");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let err = execute(&args(), &collab).unwrap_err();
        let scaffold = err.downcast_ref::<ScaffoldError>().unwrap();
        assert!(scaffold.to_string().contains("already exists"));
    }

    #[test]
    fn test_env_add_rejects_missing_component() {
        let system = MockSystem::new().with_dir("/gitops/app1/components");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let err = execute(&args(), &collab).unwrap_err();
        let scaffold = err.downcast_ref::<ScaffoldError>().unwrap();
        assert!(scaffold.to_string().contains("does not exist"));
    }

    #[test]
    fn test_env_add_reports_all_missing_flags() {
        let system = MockSystem::new();
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::default();
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let args = EnvAddArgs {
            env_name: None,
            component_name: None,
            application_name: Some("app1".to_owned()),
            output: None,
            interactive: false,
        };
        let err = execute(&args, &collab).unwrap_err();
        let scaffold = err.downcast_ref::<ScaffoldError>().unwrap();
        assert_eq!(
            scaffold.to_string(),
            "required flag(s) \"component-name\", \"env-name\" not set"
        );
    }

    #[test]
    fn test_interactive_env_add_selects_component() {
        let system = MockSystem::new().with_dir("/gitops/app1/components/comp1/base");
        let executor = MockExecutor::new();
        let prompter = ScriptedPrompter::with_answers(["/gitops", "app1", "comp1", "prod"]);
        let store = MemoryStore::new();
        let collab = collaborators(&system, &executor, &prompter, &store);

        let args = EnvAddArgs {
            env_name: None,
            component_name: None,
            application_name: None,
            output: None,
            interactive: true,
        };
        execute(&args, &collab).unwrap();
        assert!(system.exists(Path::new(
            "/gitops/app1/components/comp1/overlays/prod/kustomization.yaml"
        )));
    }
}
