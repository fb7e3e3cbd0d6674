//! Version-control executor abstraction
//!
//! Git plumbing is invoked as an external tool with a working directory and
//! an argument list, returning the combined stdout/stderr for diagnosis.
//! Nothing here knows git semantics; command drivers decide what to run.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

/// Result of one external command invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Combined stdout and stderr
    pub output: String,
    /// Whether the process exited successfully
    pub success: bool,
}

/// Trait for invoking external commands in a working directory
///
/// # Implementations
/// - `RealExecutor`: spawns the process via `std::process::Command`
/// - `MockExecutor`: records invocations and returns scripted results
pub trait Executor: Send + Sync {
    /// Run `program args...` inside `dir`, capturing combined output.
    ///
    /// An `Err` means the process could not be spawned at all; a completed
    /// process with a non-zero status is `Ok` with `success == false`.
    fn execute(&self, dir: &Path, program: &str, args: &[&str]) -> io::Result<CommandOutput>;
}

/// Production executor spawning real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct RealExecutor;

impl RealExecutor {
    /// Create a new `RealExecutor` instance
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Executor for RealExecutor {
    fn execute(&self, dir: &Path, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            output: combined,
            success: output.status.success(),
        })
    }
}

/// A single recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

impl RecordedCall {
    /// Render the call as a single command line, e.g. `git add .`
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Test executor recording every call and returning scripted results
#[derive(Clone, Default)]
pub struct MockExecutor {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    failures: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockExecutor {
    /// Create a new `MockExecutor` where every command succeeds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a failure: any command line containing `fragment` fails with
    /// the given combined output.
    #[must_use]
    pub fn with_failure(self, fragment: &str, output: &str) -> Self {
        self.failures
            .lock()
            .expect("mock executor lock poisoned")
            .push((fragment.to_owned(), output.to_owned()));
        self
    }

    /// All invocations recorded so far
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .expect("mock executor lock poisoned")
            .clone()
    }

    /// Rendered command lines of all invocations, in order
    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCall::command_line).collect()
    }
}

impl Executor for MockExecutor {
    fn execute(&self, dir: &Path, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let call = RecordedCall {
            dir: dir.to_path_buf(),
            program: program.to_owned(),
            args: args.iter().map(|a| (*a).to_owned()).collect(),
        };
        let line = call.command_line();
        self.calls
            .lock()
            .expect("mock executor lock poisoned")
            .push(call);

        let failures = self.failures.lock().expect("mock executor lock poisoned");
        for (fragment, output) in failures.iter() {
            if line.contains(fragment) {
                return Ok(CommandOutput {
                    output: output.clone(),
                    success: false,
                });
            }
        }
        Ok(CommandOutput {
            output: String::new(),
            success: true,
        })
    }
}
