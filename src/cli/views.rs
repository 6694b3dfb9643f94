//! Text rendering of the page, the modal form, and action outcomes.

use crossterm::terminal;

use crate::core::users_page::{ActionOutcome, IgnoreReason, UsersPage};
use crate::forms::ErrorSet;
use crate::table::RecordTable;

use super::output::{self, current_preferences};
use super::shell_context::{CliMode, ShellContext};

const PAGE_TITLE: &str = "User Management";
const MIN_CELL_WIDTH: usize = 8;

/// Fetches the list once when the shell opens and shows the result.
pub fn load_on_start(context: &mut ShellContext) {
    output::info("Loading users...");
    let outcome = context.page.start();
    if report_outcome(&outcome, "Users loaded.") {
        render_page(context);
    }
}

pub fn render_page(context: &ShellContext) {
    let page = &context.page;
    output::section(PAGE_TITLE);

    let mut summary = format!("{} user(s)", page.records().len());
    if let Some(loaded) = page.last_loaded() {
        summary.push_str(&format!(
            ", refreshed {}",
            loaded.with_timezone(&chrono::Local).format("%H:%M:%S")
        ));
    }
    output::info(summary);

    let table = RecordTable::new(page.fields(), page.records())
        .plain(current_preferences().plain_mode)
        .max_cell_width(cell_width_limit(context));
    output::block(table.render());

    if page.records().is_empty() {
        output::hint("No users yet. Use `add` to create one.");
    }
}

/// Shows the open modal: title, each field with its value and error, and the
/// submit control.
pub fn render_form(page: &UsersPage) {
    let Some(title) = page.title() else {
        output::info("No form is open. Use `add` or `edit <row>`.");
        return;
    };
    output::section(title);

    let form = page.form();
    for field in form.fields() {
        let marker = if field.required { "*" } else { "" };
        let value = form.draft().get(&field.name);
        let mut line = format!("{}{} ({}): {}", field.label, marker, field.name, value);
        if let Some(message) = form.error_for(&field.name) {
            line.push_str(&format!("  <- {}", message));
        }
        output::block(line);
    }

    let control = if form.can_submit() {
        format!("[{}]", form.submit_label())
    } else {
        format!("[{}] (disabled)", form.submit_label())
    };
    output::block(control);
}

pub fn render_errors(errors: &ErrorSet) {
    for (field, message) in errors.iter() {
        output::error(format!("{}: {}", field, message));
    }
}

/// Prints a one-line report for `outcome`. Returns `true` on completion.
pub fn report_outcome(outcome: &ActionOutcome, success: &str) -> bool {
    match outcome {
        ActionOutcome::Completed => {
            output::success(success);
            true
        }
        ActionOutcome::Invalid(errors) => {
            output::warning("Please fix the highlighted fields.");
            render_errors(errors);
            false
        }
        ActionOutcome::Failed(message) => {
            output::error(message);
            false
        }
        ActionOutcome::Ignored(reason) => {
            output::warning(ignore_message(*reason));
            false
        }
    }
}

fn ignore_message(reason: IgnoreReason) -> &'static str {
    match reason {
        IgnoreReason::AlreadySaving => "A save is already in progress.",
        IgnoreReason::ModalClosed => "No form is open. Use `add` or `edit <row>`.",
        IgnoreReason::MissingId => "That record has not been saved yet.",
        IgnoreReason::FormNotReady => "The form has no fields configured.",
    }
}

fn cell_width_limit(context: &ShellContext) -> Option<usize> {
    if context.mode != CliMode::Interactive {
        return None;
    }
    let (columns, _) = terminal::size().ok()?;
    let fields = context.page.fields().len().max(1);
    // Row number and actions take roughly twenty columns.
    let available = (columns as usize).saturating_sub(20);
    Some((available / fields).max(MIN_CELL_WIDTH))
}
