//! Interactive driver for the record form modal.
//!
//! Prompts every field in order with its current draft value pre-filled,
//! then submits. Validation failures re-open the prompts with the errors
//! shown. A failed save can be retried without re-entering anything.

use crate::core::users_page::ActionOutcome;

use super::core::CommandError;
use super::io::{self as cli_io, FieldInput, CANCEL_TOKEN};
use super::output;
use super::shell_context::ShellContext;
use super::views;

pub(crate) fn run_modal(context: &mut ShellContext, success: &str) -> Result<(), CommandError> {
    loop {
        views::render_form(&context.page);
        output::hint(format!(
            "Enter a value per field, or `{}` to close the form.",
            CANCEL_TOKEN
        ));

        if !prompt_fields(context)? {
            context.page.close();
            output::info("Form closed without saving.");
            return Ok(());
        }

        loop {
            let outcome = context.page.submit();
            let saved = views::report_outcome(&outcome, success);
            match outcome {
                ActionOutcome::Invalid(_) => break,
                ActionOutcome::Failed(_) => {
                    if !cli_io::confirm_action(&context.theme, "Try saving again?", true)? {
                        output::hint("The form is still open; use `submit` or `cancel`.");
                        return Ok(());
                    }
                }
                _ => {
                    if saved {
                        views::render_page(context);
                    }
                    return Ok(());
                }
            }
        }
    }
}

/// Returns `false` when the user asked to cancel.
fn prompt_fields(context: &mut ShellContext) -> Result<bool, CommandError> {
    let fields = context.page.form().fields().to_vec();
    for field in &fields {
        let form = context.page.form();
        let current = form.draft().get(&field.name).to_string();
        let error = form.error_for(&field.name).map(str::to_string);

        match cli_io::prompt_field(&context.theme, field, &current, error.as_deref())? {
            FieldInput::Cancel => return Ok(false),
            FieldInput::Value(value) => context.page.set_field(&field.name, value)?,
        }
    }
    Ok(true)
}
