//! Shell error types, dispatch, and error reporting.

use std::io;

use strsim::levenshtein;

use crate::config::ConfigError;
use crate::errors::NetworkError;
use crate::forms::FormError;
use crate::table::TableError;

use super::io as cli_io;
use super::output;
use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failures that stop the shell from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Command(String),
}

/// Failures reported inline by a single command; the shell keeps running.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl ShellContext {
    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(definition) = self.registry.get(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let handler = definition.handler;
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    /// Runs one already-read line through tokenising and dispatch.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let lowered = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &lowered), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}

/// Splits `field=value` arguments. Values may be empty; names may not.
pub(crate) fn parse_assignments<'a>(
    args: &[&'a str],
) -> Result<Vec<(&'a str, &'a str)>, CommandError> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
            _ => Err(CommandError::InvalidArguments(format!(
                "expected `field=value`, got `{}`",
                arg
            ))),
        })
        .collect()
}

/// Parses a 1-based table row number.
pub(crate) fn parse_row(arg: Option<&&str>, usage: &str) -> Result<usize, CommandError> {
    let raw = arg.ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?;
    raw.parse::<usize>()
        .ok()
        .filter(|row| *row > 0)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("row must be a positive number, got `{}`", raw))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_first_equals() {
        let parsed = parse_assignments(&["name=Ada", "note=a=b", "phone="]).unwrap();
        assert_eq!(parsed, vec![("name", "Ada"), ("note", "a=b"), ("phone", "")]);
    }

    #[test]
    fn assignments_require_a_name() {
        assert!(parse_assignments(&["=x"]).is_err());
        assert!(parse_assignments(&["name"]).is_err());
    }

    #[test]
    fn rows_are_positive_numbers() {
        assert_eq!(parse_row(Some(&"3"), "edit <row>").unwrap(), 3);
        assert!(parse_row(Some(&"0"), "edit <row>").is_err());
        assert!(parse_row(Some(&"x"), "edit <row>").is_err());
        assert!(parse_row(None, "edit <row>").is_err());
    }
}
