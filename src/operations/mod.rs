//! Command operations
//!
//! One module per subcommand. Each operation picks its mode once at entry
//! (interactive when no flags were given or `--interactive` was passed),
//! completes the parameter bag, then drives the generator / git executor.

pub mod bootstrap;
pub mod component;
pub mod describe;
pub mod environment;
pub mod push;
pub mod repo_init;

use crate::error::ScaffoldError;
use crate::hosting::Driver;
use crate::layout::names::validate_name;
use crate::layout::state::{FolderState, classify_application_root};
use crate::prompts::Prompter;
use crate::secrets::SecretStore;
use crate::system::{Executor, System};
use std::path::{Path, PathBuf};

/// The flattened parameter bag threaded through every command. This is
/// configuration, not a stateful entity: each run re-probes the filesystem
/// from scratch and nothing here is mutated after completion.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    pub output: PathBuf,
    pub component_name: String,
    pub application_name: String,
    pub secret: String,
    pub git_repo_url: String,
    pub namespace: String,
    pub target_port: u32,
    pub push_to_git: bool,
    pub route: Option<String>,
    pub overwrite: bool,
    pub save_token_keyring: bool,
    pub private_repo_driver: Option<Driver>,
    pub environment_name: String,
    pub application_folder: PathBuf,
    pub commit_message: String,
}

/// The external collaborators every operation works against. Constructed
/// once per invocation; swap in mocks for tests.
pub struct Collaborators<'a> {
    pub system: &'a dyn System,
    pub executor: &'a dyn Executor,
    pub prompter: &'a dyn Prompter,
    pub store: &'a dyn SecretStore,
}

/// Check that all mandatory flags carry a value, reporting every missing
/// flag at once, sorted, for deterministic output.
pub fn check_mandatory_flags(flags: &[(&str, &str)]) -> Result<(), ScaffoldError> {
    let mut sorted: Vec<&(&str, &str)> = flags.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);
    let missing: Vec<String> = sorted
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| format!("{name:?}"))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(ScaffoldError::missing_flags(missing))
}

/// Run one git command, turning a failed exit into an `ExternalTool` error
/// carrying the combined output for diagnosis.
pub fn run_git(
    executor: &dyn Executor,
    dir: &Path,
    args: &[&str],
    context: &str,
) -> Result<String, ScaffoldError> {
    let result = executor.execute(dir, "git", args).map_err(|e| {
        ScaffoldError::external_tool(format!("{context} in {}: {e}", dir.display()))
    })?;
    if !result.success {
        return Err(ScaffoldError::external_tool(format!(
            "{context} in {}: {}",
            dir.display(),
            result.output.trim()
        )));
    }
    Ok(result.output)
}

/// Resolve the output path, substituting the current working directory for
/// the `.` default so later messages show a concrete location.
pub fn resolve_output(system: &dyn System, output: &Path) -> PathBuf {
    if output == Path::new(".") || output == Path::new("./") {
        if let Ok(cwd) = system.current_dir() {
            return cwd;
        }
    }
    output.to_path_buf()
}

/// Require that a path is a valid application root, mapping each folder
/// state to its error. `InvalidApplicationRoot` is fatal in every mode:
/// working around unrelated contents risks destroying user data.
pub fn require_application_root(system: &dyn System, path: &Path) -> Result<(), ScaffoldError> {
    match classify_application_root(system, path) {
        FolderState::ValidApplicationRoot => Ok(()),
        FolderState::Absent => Err(ScaffoldError::path_state(format!(
            "the given path {} does not exist",
            path.display()
        ))),
        FolderState::EmptyOrUnrelated => Err(ScaffoldError::path_state(format!(
            "the given path {} is not a correct path for an application",
            path.display()
        ))),
        FolderState::InvalidApplicationRoot => Err(invalid_root_error(path)),
    }
}

/// The fatal error for a folder with unrelated contents
pub fn invalid_root_error(path: &Path) -> ScaffoldError {
    ScaffoldError::path_state(format!(
        "the given path {} exists but is not a valid application root; \
         refusing to modify it",
        path.display()
    ))
}

/// Split a repository URL into its organization and repository name.
/// Nested GitLab groups keep their full path as the organization.
pub fn org_repo_from_url(repo_url: &str) -> Result<(String, String), ScaffoldError> {
    let parsed = url::Url::parse(repo_url)
        .map_err(|e| ScaffoldError::invalid_url(format!("failed to parse {repo_url}: {e}")))?;
    let segments: Vec<&str> = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let Some((last, init)) = segments.split_last() else {
        return Err(ScaffoldError::invalid_url(format!(
            "{repo_url} is not a valid repository URL: expected an <org>/<repository> path"
        )));
    };
    if init.is_empty() {
        return Err(ScaffoldError::invalid_url(format!(
            "{repo_url} is not a valid repository URL: expected an <org>/<repository> path"
        )));
    }
    let name = last.trim_end_matches(".git");
    if name.is_empty() {
        return Err(ScaffoldError::invalid_url(format!(
            "{repo_url} is not a valid repository URL: empty repository name"
        )));
    }
    Ok((init.join("/"), name.to_owned()))
}

/// Parse the `--private-repo-driver` flag value, if given
pub fn parse_driver_flag(flag: Option<&str>) -> Result<Option<Driver>, ScaffoldError> {
    flag.map(str::parse).transpose()
}

/// Build the host-to-driver mapping for this invocation. A driver flag
/// overrides whatever the host would imply.
pub fn build_resolver(host: &str, flag_driver: Option<Driver>) -> crate::hosting::DriverResolver {
    let resolver = crate::hosting::DriverResolver::new();
    match flag_driver {
        Some(driver) => resolver.with_mapping(host, driver),
        None => resolver,
    }
}

// ==================== interactive prompt loops ====================
//
// Each loop re-asks for a single field until its value validates, and only
// a cancellation from the prompter breaks out early. Loops are explicit
// (not recursive) so cancellation is a first-class exit path.

/// Ask whether to accept default values and only be prompted for required
/// options. Returns true when the user wants the full set of questions.
pub fn prompt_for_optionals(prompter: &dyn Prompter) -> Result<bool, ScaffoldError> {
    let answer = prompter.select(
        "Do you want to accept all default values and be prompted only for the minimum required options?",
        "Select yes to accept default values or no to be prompted for every option \
         that was not already specified on the command line",
        &["yes", "no"],
        Some(0),
    )?;
    Ok(answer == "no")
}

/// Prompt until a valid DNS-1123 name is supplied
pub fn prompt_name(prompter: &dyn Prompter, message: &str) -> Result<String, ScaffoldError> {
    loop {
        let name = prompter.input(message, "Required field", None)?;
        match validate_name(&name) {
            Ok(()) => return Ok(name),
            Err(err) => println!("{err}"),
        }
    }
}

/// Use a flag-provided name when it validates, otherwise fall back to the
/// prompt loop (announcing why the provided value was rejected).
pub fn resolve_valid_name(
    prompter: &dyn Prompter,
    provided: Option<&str>,
    message: &str,
) -> Result<String, ScaffoldError> {
    if let Some(name) = provided {
        match validate_name(name) {
            Ok(()) => return Ok(name.to_owned()),
            Err(err) => println!("{err}"),
        }
    }
    prompt_name(prompter, message)
}

/// Prompt until a repository URL with a valid host and an `org/repo` path
/// is supplied; the returned URL carries the `.git` suffix.
pub fn prompt_repo_url(prompter: &dyn Prompter) -> Result<String, ScaffoldError> {
    loop {
        let answer = prompter.input(
            "Provide the URL of the remote git repository to push the GitOps resources to",
            "The repository is created on the hosting service if it does not exist yet",
            None,
        )?;
        match org_repo_from_url(&answer) {
            Ok(_) => return Ok(crate::secrets::add_git_suffix(&answer)),
            Err(err) => println!("{err}"),
        }
    }
}

/// Prompt until an existing directory path is supplied
pub fn prompt_existing_path(
    system: &dyn System,
    prompter: &dyn Prompter,
    message: &str,
) -> Result<PathBuf, ScaffoldError> {
    loop {
        let answer = prompter.input(
            message,
            "This is the path where the GitOps configuration is stored locally \
             before you push it to the remote repository",
            None,
        )?;
        let path = resolve_output(system, Path::new(&answer));
        if system.exists(&path) {
            return Ok(path);
        }
        println!("the given path {} does not exist", path.display());
    }
}

/// Prompt until a valid target port is supplied
pub fn prompt_target_port(prompter: &dyn Prompter) -> Result<u32, ScaffoldError> {
    loop {
        let answer = prompter.input("Provide the target port", "", Some("8080"))?;
        match answer.parse::<u32>() {
            Ok(port) if crate::layout::names::validate_target_port(port).is_ok() => {
                return Ok(port);
            }
            _ => println!("{answer} is not a valid target port"),
        }
    }
}

/// Prompt for an optional route host; an empty answer means no route
pub fn prompt_route(prompter: &dyn Prompter) -> Result<Option<String>, ScaffoldError> {
    let answer = prompter.input(
        "Provide a route hostname to expose the component with (leave empty for none)",
        "If provided, it will be referenced in the generated route.yaml",
        Some(""),
    )?;
    if answer.is_empty() {
        return Ok(None);
    }
    Ok(Some(answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::ScriptedPrompter;
    use crate::system::MockSystem;

    #[test]
    fn test_check_mandatory_flags_reports_single_missing_flag() {
        let err = check_mandatory_flags(&[("component-name", ""), ("application-name", "x")])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "required flag(s) \"component-name\" not set"
        );
    }

    #[test]
    fn test_check_mandatory_flags_reports_all_missing_sorted() {
        let err = check_mandatory_flags(&[("component-name", ""), ("application-name", "")])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "required flag(s) \"application-name\", \"component-name\" not set"
        );
    }

    #[test]
    fn test_check_mandatory_flags_passes_when_all_set() {
        assert!(check_mandatory_flags(&[("a", "1"), ("b", "2")]).is_ok());
    }

    #[test]
    fn test_require_application_root_states() {
        let system = MockSystem::new()
            .with_dir("/valid/components")
            .with_dir("/empty")
            .with_file("/unrelated/readme.md", b"hi");
        assert!(require_application_root(&system, Path::new("/valid")).is_ok());
        assert!(require_application_root(&system, Path::new("/missing")).is_err());
        assert!(require_application_root(&system, Path::new("/empty")).is_err());
        let err = require_application_root(&system, Path::new("/unrelated")).unwrap_err();
        assert!(err.to_string().contains("refusing to modify"));
    }

    #[test]
    fn test_prompt_name_reasks_until_valid() {
        let prompter = ScriptedPrompter::with_answers(["Bad_Name", "good-name"]);
        let name = prompt_name(&prompter, "Provide the component name").unwrap();
        assert_eq!(name, "good-name");
        assert_eq!(prompter.transcript().len(), 2);
    }

    #[test]
    fn test_prompt_existing_path_reasks_until_found() {
        let system = MockSystem::new().with_dir("/gitops");
        let prompter = ScriptedPrompter::with_answers(["/nope", "/gitops"]);
        let path = prompt_existing_path(&system, &prompter, "Provide a path").unwrap();
        assert_eq!(path, PathBuf::from("/gitops"));
    }

    #[test]
    fn test_org_repo_from_url() {
        assert_eq!(
            org_repo_from_url("https://github.com/org/repo.git").unwrap(),
            ("org".to_owned(), "repo".to_owned())
        );
        assert_eq!(
            org_repo_from_url("https://gitlab.com/group/subgroup/repo").unwrap(),
            ("group/subgroup".to_owned(), "repo".to_owned())
        );
        assert!(org_repo_from_url("https://github.com/justarepo").is_err());
        assert!(org_repo_from_url("not a url").is_err());
    }

    #[test]
    fn test_prompt_repo_url_reasks_until_parseable() {
        let prompter = ScriptedPrompter::with_answers([
            "github.com/org/repo",
            "https://github.com/org/repo",
        ]);
        let url = prompt_repo_url(&prompter).unwrap();
        assert_eq!(url, "https://github.com/org/repo.git");
    }

    #[test]
    fn test_resolve_output_substitutes_cwd_for_dot() {
        let system = MockSystem::new().with_current_dir("/work");
        assert_eq!(
            resolve_output(&system, Path::new(".")),
            PathBuf::from("/work")
        );
        assert_eq!(
            resolve_output(&system, Path::new("/explicit")),
            PathBuf::from("/explicit")
        );
    }
}
