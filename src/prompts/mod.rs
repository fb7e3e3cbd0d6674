//! Interactive prompting
//!
//! The mode selectors never talk to a terminal directly; they go through
//! the `Prompter` trait so interactive flows can be exercised in tests with
//! a scripted fake. A terminal interrupt surfaces as
//! `ScaffoldError::Cancelled` and terminates the run immediately.

use crate::error::ScaffoldError;
use dialoguer::{Confirm, Error as DialoguerError, Input, Password, Select};
use std::io::ErrorKind;
use std::sync::Mutex;
use tracing::debug;

/// External prompting boundary: show a message with help text, return a
/// typed answer.
pub trait Prompter: Send + Sync {
    /// Free-form text input; `default` is offered when the user submits
    /// an empty line.
    fn input(
        &self,
        message: &str,
        help: &str,
        default: Option<&str>,
    ) -> Result<String, ScaffoldError>;

    /// Hidden input for secrets
    fn password(&self, message: &str, help: &str) -> Result<String, ScaffoldError>;

    /// Pick one of `options`; returns the chosen option text
    fn select(
        &self,
        message: &str,
        help: &str,
        options: &[&str],
        default: Option<usize>,
    ) -> Result<String, ScaffoldError>;

    /// Yes/no question
    fn confirm(&self, message: &str, help: &str, default: bool) -> Result<bool, ScaffoldError>;
}

fn map_dialoguer_error(err: DialoguerError) -> ScaffoldError {
    match err {
        DialoguerError::IO(io_err) if io_err.kind() == ErrorKind::Interrupted => {
            ScaffoldError::Cancelled
        }
        DialoguerError::IO(io_err) => {
            ScaffoldError::external_tool(format!("failed to read prompt answer: {io_err}"))
        }
    }
}

/// Terminal prompter backed by dialoguer
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Create a new `TerminalPrompter`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn input(
        &self,
        message: &str,
        help: &str,
        default: Option<&str>,
    ) -> Result<String, ScaffoldError> {
        debug!(help, "prompting for input");
        let mut prompt = Input::<String>::new().with_prompt(message);
        if let Some(value) = default {
            prompt = prompt.default(value.to_owned()).show_default(true);
        }
        prompt
            .interact_text()
            .map(|s| s.trim().to_owned())
            .map_err(map_dialoguer_error)
    }

    fn password(&self, message: &str, help: &str) -> Result<String, ScaffoldError> {
        debug!(help, "prompting for secret");
        Password::new()
            .with_prompt(message)
            .allow_empty_password(false)
            .interact()
            .map_err(map_dialoguer_error)
    }

    fn select(
        &self,
        message: &str,
        help: &str,
        options: &[&str],
        default: Option<usize>,
    ) -> Result<String, ScaffoldError> {
        debug!(help, "prompting for selection");
        let index = Select::new()
            .with_prompt(message)
            .items(options)
            .default(default.unwrap_or(0))
            .interact()
            .map_err(map_dialoguer_error)?;
        Ok(options[index].to_owned())
    }

    fn confirm(&self, message: &str, help: &str, default: bool) -> Result<bool, ScaffoldError> {
        debug!(help, "prompting for confirmation");
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(map_dialoguer_error)
    }
}

/// Scripted prompter for tests: answers are consumed in order; running out
/// of answers behaves like a cancellation.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<Vec<String>>,
    transcript: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    /// Build a prompter that will return the given answers, in order.
    /// Confirmations expect `"yes"`/`"no"`.
    #[must_use]
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// The prompt messages shown so far, in order
    #[must_use]
    pub fn transcript(&self) -> Vec<String> {
        self.transcript
            .lock()
            .expect("scripted prompter lock poisoned")
            .clone()
    }

    fn next_answer(&self, message: &str) -> Result<String, ScaffoldError> {
        self.transcript
            .lock()
            .expect("scripted prompter lock poisoned")
            .push(message.to_owned());
        let mut answers = self
            .answers
            .lock()
            .expect("scripted prompter lock poisoned");
        if answers.is_empty() {
            return Err(ScaffoldError::Cancelled);
        }
        Ok(answers.remove(0))
    }
}

impl Prompter for ScriptedPrompter {
    fn input(
        &self,
        message: &str,
        _help: &str,
        default: Option<&str>,
    ) -> Result<String, ScaffoldError> {
        let answer = self.next_answer(message)?;
        if answer.is_empty() {
            if let Some(value) = default {
                return Ok(value.to_owned());
            }
        }
        Ok(answer)
    }

    fn password(&self, message: &str, _help: &str) -> Result<String, ScaffoldError> {
        self.next_answer(message)
    }

    fn select(
        &self,
        message: &str,
        _help: &str,
        options: &[&str],
        _default: Option<usize>,
    ) -> Result<String, ScaffoldError> {
        let answer = self.next_answer(message)?;
        if !options.contains(&answer.as_str()) {
            return Err(ScaffoldError::external_tool(format!(
                "scripted answer {answer:?} is not one of {options:?}"
            )));
        }
        Ok(answer)
    }

    fn confirm(&self, message: &str, _help: &str, _default: bool) -> Result<bool, ScaffoldError> {
        let answer = self.next_answer(message)?;
        Ok(matches!(answer.as_str(), "yes" | "y" | "true"))
    }
}
