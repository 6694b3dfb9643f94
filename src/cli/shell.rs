use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, LoopControl};
use crate::cli::output;
use crate::cli::shell_context::{CliMode, ShellContext};
use crate::cli::views;

/// Setting this variable switches the shell to line-by-line stdin scripts.
pub const SCRIPT_ENV: &str = "USER_ADMIN_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    views::load_on_start(&mut context);

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    let fields = context
        .page
        .fields()
        .iter()
        .map(|field| field.name.clone())
        .collect();
    let helper = CommandHelper::new(context.command_names(), fields);
    editor.set_helper(Some(helper));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        let prompt = context.prompt();
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                match context.process_line(trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match context.process_line(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

/// Completes command names, `field=` prefixes for the form commands, and
/// `config` subcommands.
struct CommandHelper {
    commands: Vec<String>,
    fields: Vec<String>,
}

const FIELD_COMMANDS: &[&str] = &["add", "edit", "set"];
const CONFIG_SUBCOMMANDS: &[&str] = &["path", "save", "show"];

impl CommandHelper {
    fn new(names: Vec<&'static str>, fields: Vec<String>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands, fields }
    }

    fn candidates(&self, line: &str, start: usize, word: &str) -> Vec<String> {
        if start == 0 {
            return matching(self.commands.iter().map(String::as_str), word);
        }

        let command = line.split_whitespace().next().unwrap_or_default();
        let command = command.to_ascii_lowercase();
        if FIELD_COMMANDS.contains(&command.as_str()) && !word.contains('=') {
            matching(self.fields.iter().map(String::as_str), word)
                .into_iter()
                .map(|field| format!("{field}="))
                .collect()
        } else if command == "config" {
            matching(CONFIG_SUBCOMMANDS.iter().copied(), word)
        } else {
            Vec::new()
        }
    }
}

fn matching<'a>(options: impl Iterator<Item = &'a str>, word: &str) -> Vec<String> {
    let needle = word.to_ascii_lowercase();
    options
        .filter(|option| option.starts_with(&needle))
        .map(str::to_string)
        .collect()
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);

        let candidates = self
            .candidates(prefix, start, &prefix[start..])
            .into_iter()
            .map(|text| Pair {
                display: text.clone(),
                replacement: text,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_respects_quotes() {
        let tokens = parse_command_line(r#"add name="Ada Lovelace" email=ada@example.com"#).unwrap();
        assert_eq!(
            tokens,
            vec!["add", "name=Ada Lovelace", "email=ada@example.com"]
        );
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line(r#"add name="Ada"#).is_err());
    }

    fn helper() -> CommandHelper {
        CommandHelper::new(
            vec!["add", "config", "delete", "edit", "list"],
            vec!["name".into(), "email".into(), "phone".into()],
        )
    }

    #[test]
    fn completes_command_names_at_line_start() {
        assert_eq!(helper().candidates("de", 0, "de"), vec!["delete"]);
        assert_eq!(helper().candidates("e", 0, "e"), vec!["edit"]);
    }

    #[test]
    fn completes_field_assignments_for_form_commands() {
        assert_eq!(helper().candidates("add na", 4, "na"), vec!["name="]);
        assert_eq!(helper().candidates("edit 2 ", 7, ""), vec!["name=", "email=", "phone="]);
        assert!(helper().candidates("add name=A", 4, "name=A").is_empty());
        assert!(helper().candidates("delete 1", 7, "1").is_empty());
    }

    #[test]
    fn completes_config_subcommands() {
        assert_eq!(helper().candidates("config s", 7, "s"), vec!["save", "show"]);
    }
}
