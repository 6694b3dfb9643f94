//! Dialoguer prompts used while the modal form is driven interactively.

use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::cli::core::CommandError;
use crate::domain::FieldDefinition;

/// Typing this at any field prompt abandons the form.
pub const CANCEL_TOKEN: &str = ":cancel";

/// What the user typed at a field prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Value(String),
    Cancel,
}

pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Prompts for one field, pre-filled with `current`. Empty input is accepted
/// so optional fields can be cleared.
pub fn prompt_field(
    theme: &ColorfulTheme,
    field: &FieldDefinition,
    current: &str,
    error: Option<&str>,
) -> Result<FieldInput, CommandError> {
    let value = Input::<String>::with_theme(theme)
        .with_prompt(field_prompt(field, error))
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;

    if value.trim() == CANCEL_TOKEN {
        Ok(FieldInput::Cancel)
    } else {
        Ok(FieldInput::Value(value))
    }
}

fn field_prompt(field: &FieldDefinition, error: Option<&str>) -> String {
    let mut prompt = field.label.clone();
    if field.required {
        prompt.push('*');
    }
    if let Some(message) = error {
        prompt.push_str(&format!(" ({})", message));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldType;

    #[test]
    fn prompt_marks_required_fields_and_errors() {
        let email = FieldDefinition::new("email", "Email", FieldType::Email).required();
        assert_eq!(field_prompt(&email, None), "Email*");
        assert_eq!(
            field_prompt(&email, Some("Invalid email format")),
            "Email* (Invalid email format)"
        );

        let phone = FieldDefinition::new("phone", "Phone", FieldType::Tel);
        assert_eq!(field_prompt(&phone, None), "Phone");
    }
}
