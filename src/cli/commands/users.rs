use super::CommandDefinition;
use crate::cli::core::{parse_assignments, parse_row, CommandError, CommandResult};
use crate::cli::forms::run_modal;
use crate::cli::output;
use crate::cli::shell_context::{CliMode, ShellContext};
use crate::cli::views;
use crate::core::users_page::ModalState;
use crate::forms::FormMode;
use crate::table::{RecordTable, RowAction};

const ADDED: &str = "User added.";
const UPDATED: &str = "User updated.";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("list", "Show the user table", "list", cmd_list)
            .with_aliases(&["ls"]),
        CommandDefinition::new(
            "reload",
            "Fetch the user list from the server again",
            "reload",
            cmd_reload,
        ),
        CommandDefinition::new(
            "add",
            "Open the form to create a user (submits at once when values are given)",
            "add [field=value ...]",
            cmd_add,
        ),
        CommandDefinition::new(
            "edit",
            "Open the form seeded with a row (submits at once when values are given)",
            "edit <row> [field=value ...]",
            cmd_edit,
        ),
        CommandDefinition::new("delete", "Delete the user in a row", "delete <row>", cmd_delete)
            .with_aliases(&["rm"]),
        CommandDefinition::new(
            "set",
            "Change values in the open form",
            "set field=value [field=value ...]",
            cmd_set,
        ),
        CommandDefinition::new("submit", "Validate and save the open form", "submit", cmd_submit),
        CommandDefinition::new("form", "Show the open form", "form", cmd_form),
        CommandDefinition::new("cancel", "Close the open form", "cancel", cmd_cancel),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    views::render_page(context);
    Ok(())
}

fn cmd_reload(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let outcome = context.page.reload();
    if views::report_outcome(&outcome, "Users reloaded.") {
        views::render_page(context);
    }
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let assignments = parse_assignments(args)?;
    context.page.open_create();
    fill_and_submit(context, &assignments, ADDED)
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let row = parse_row(args.first(), "edit <row> [field=value ...]")?;
    let assignments = parse_assignments(&args[1..])?;

    let fields = context.page.fields().to_vec();
    let records = context.page.records().to_vec();
    let outcome =
        RecordTable::new(&fields, &records).trigger(row, RowAction::Edit, &mut context.page)?;
    if !outcome.is_completed() {
        views::report_outcome(&outcome, "");
        return Ok(());
    }
    fill_and_submit(context, &assignments, UPDATED)
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let row = parse_row(args.first(), "delete <row>")?;
    let fields = context.page.fields().to_vec();
    let records = context.page.records().to_vec();
    let outcome =
        RecordTable::new(&fields, &records).trigger(row, RowAction::Delete, &mut context.page)?;
    if views::report_outcome(&outcome, "User deleted.") {
        views::render_page(context);
    }
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: set field=value [field=value ...]".into(),
        ));
    }
    for (name, value) in parse_assignments(args)? {
        context.page.set_field(name, value)?;
    }
    views::render_form(&context.page);
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let success = match context.page.modal() {
        ModalState::Open(FormMode::Edit(_)) => UPDATED,
        _ => ADDED,
    };
    submit_once(context, success);
    Ok(())
}

fn cmd_form(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    views::render_form(&context.page);
    Ok(())
}

fn cmd_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.page.is_modal_open() {
        context.page.close();
        output::info("Form closed without saving.");
    } else {
        output::info("No form is open.");
    }
    Ok(())
}

/// Applies `field=value` pairs and submits once, or hands over to the
/// interactive prompts when no values were given.
fn fill_and_submit(
    context: &mut ShellContext,
    assignments: &[(&str, &str)],
    success: &str,
) -> CommandResult {
    if assignments.is_empty() {
        return match context.mode() {
            CliMode::Interactive => run_modal(context, success),
            CliMode::Script => {
                views::render_form(&context.page);
                Ok(())
            }
        };
    }

    for (name, value) in assignments {
        context.page.set_field(name, *value)?;
    }
    submit_once(context, success);
    Ok(())
}

fn submit_once(context: &mut ShellContext, success: &str) {
    let outcome = context.page.submit();
    if views::report_outcome(&outcome, success) {
        views::render_page(context);
    } else if context.page.is_modal_open() {
        output::hint("The form is still open; use `set`, `submit`, or `cancel`.");
    }
}
