//! `describe`: read-only summary of an application folder

use super::{Collaborators, check_mandatory_flags, require_application_root, resolve_output};
use crate::cli::DescribeArgs;
use crate::error::ScaffoldError;
use crate::layout::state::{list_components, list_environments};
use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn execute(args: &DescribeArgs, collab: &Collaborators) -> Result<()> {
    let folder = resolve_folder(args, collab)?;
    let mut stdout = std::io::stdout();
    render(&folder, collab, &mut stdout)?;
    Ok(())
}

/// `--application-name` plus `--output` is accepted as an alias and
/// canonicalized to the folder they point at.
fn resolve_folder(args: &DescribeArgs, collab: &Collaborators) -> Result<PathBuf, ScaffoldError> {
    let folder = match (&args.application_folder, &args.application_name) {
        (Some(folder), _) => folder.clone(),
        (None, Some(name)) => args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(name),
        (None, None) => {
            return check_mandatory_flags(&[("application-folder", "")])
                .map(|()| PathBuf::new());
        }
    };
    let folder = resolve_output(collab.system, &folder);
    require_application_root(collab.system, &folder)?;
    Ok(folder)
}

fn render(folder: &Path, collab: &Collaborators, out: &mut dyn Write) -> Result<()> {
    // The listing works on the folder itself: its parent is the output
    // directory, its file name the application name.
    let application = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output = folder.parent().unwrap_or(folder);

    let components = list_components(collab.system, output, &application);
    if components.is_empty() {
        writeln!(out, "No component is present in your application")?;
        return Ok(());
    }

    writeln!(out, "Application {application}")?;
    for component in &components {
        writeln!(out, " - {component}")?;
        let environments = list_environments(collab.system, output, &application, component);
        if environments.is_empty() {
            continue;
        }
        writeln!(out, "   Environments:")?;
        for environment in environments {
            writeln!(out, "     - {environment}")?;
        }
    }
    Ok(())
}
