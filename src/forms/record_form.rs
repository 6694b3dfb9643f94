//! Record form state machine.
//!
//! The form owns the draft for one editing session. The page hands it a field
//! set and an optional seed record, feeds it keystrokes through
//! [`RecordForm::set_field`], and asks it to submit. Submission validates the
//! draft first and only passes it on when every rule holds.

use thiserror::Error;

use crate::domain::{Draft, FieldDefinition, Record, RecordId};

use super::validation::{validate, ErrorSet};

pub const SUBMIT_LABEL: &str = "Submit";
pub const SAVING_LABEL: &str = "Saving...";

/// Lifecycle of a form session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// No field set has been supplied yet.
    Uninitialized,
    /// Accepting edits and submit attempts.
    Ready,
    /// A valid draft has been handed to the submit handler.
    Submitting,
}

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

/// Reasons a submit attempt did not reach the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    NotReady,
    Busy,
    Invalid(ErrorSet),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("form has no fields yet")]
    NotReady,
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

#[derive(Debug, Clone)]
pub struct RecordForm {
    fields: Vec<FieldDefinition>,
    draft: Draft,
    errors: ErrorSet,
    state: FormState,
    busy: bool,
}

impl Default for RecordForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordForm {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            draft: Draft::new(),
            errors: ErrorSet::new(),
            state: FormState::Uninitialized,
            busy: false,
        }
    }

    /// Builds a form that is already synchronised to `fields` and `seed`.
    pub fn with_fields(fields: &[FieldDefinition], seed: Option<&Record>) -> Self {
        let mut form = Self::new();
        form.sync(fields, seed);
        form
    }

    /// Replaces the draft with the seed's values for every defined field.
    ///
    /// In-progress edits and previous errors are discarded. An empty field set
    /// leaves the form uninitialised.
    pub fn sync(&mut self, fields: &[FieldDefinition], seed: Option<&Record>) {
        self.fields = fields.to_vec();
        self.errors = ErrorSet::new();
        self.draft = fields
            .iter()
            .map(|field| {
                let value = seed.map(|record| record.text(&field.name)).unwrap_or_default();
                (field.name.clone(), value)
            })
            .collect();
        self.state = if fields.is_empty() {
            FormState::Uninitialized
        } else {
            FormState::Ready
        };
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Busy is owned by the caller while an external save is outstanding.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn can_submit(&self) -> bool {
        self.state == FormState::Ready && !self.busy
    }

    pub fn submit_label(&self) -> &'static str {
        if self.busy {
            SAVING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// Updates a single draft value. Existing errors stay until the next submit.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        if self.state == FormState::Uninitialized {
            return Err(FormError::NotReady);
        }
        if !self.fields.iter().any(|field| field.name == name) {
            return Err(FormError::UnknownField(name.to_string()));
        }
        self.draft.insert(name, value);
        Ok(())
    }

    /// Validates the draft and, when it passes, moves to `Submitting` and
    /// returns a snapshot for the caller to persist.
    pub fn begin_submit(&mut self) -> Result<Draft, SubmitRejection> {
        match self.state {
            FormState::Uninitialized => return Err(SubmitRejection::NotReady),
            FormState::Submitting => return Err(SubmitRejection::Busy),
            FormState::Ready if self.busy => return Err(SubmitRejection::Busy),
            FormState::Ready => {}
        }

        self.errors = validate(&self.fields, &self.draft);
        if !self.errors.is_empty() {
            return Err(SubmitRejection::Invalid(self.errors.clone()));
        }

        self.state = FormState::Submitting;
        Ok(self.draft.clone())
    }

    /// Returns to `Ready` once the caller's save has settled either way.
    pub fn finish_submit(&mut self) {
        if self.state == FormState::Submitting {
            self.state = FormState::Ready;
        }
    }

    /// Validates and, when valid, invokes `handler` exactly once with the draft.
    pub fn submit<R>(&mut self, handler: impl FnOnce(&Draft) -> R) -> Result<R, SubmitRejection> {
        let draft = self.begin_submit()?;
        let outcome = handler(&draft);
        self.finish_submit();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::default_user_fields;
    use crate::domain::FieldType;

    fn seeded() -> Record {
        Record::new()
            .with_id(RecordId::Number(4))
            .with_field("name", "Grace")
            .with_field("email", "grace@example.com")
            .with_field("company", "Navy")
    }

    #[test]
    fn new_form_is_uninitialized_and_rejects_input() {
        let mut form = RecordForm::new();
        assert_eq!(form.state(), FormState::Uninitialized);
        assert_eq!(form.set_field("name", "x"), Err(FormError::NotReady));
        assert_eq!(form.begin_submit(), Err(SubmitRejection::NotReady));
    }

    #[test]
    fn sync_seeds_only_defined_fields_with_empty_defaults() {
        let form = RecordForm::with_fields(&default_user_fields(), Some(&seeded()));
        assert_eq!(form.state(), FormState::Ready);
        assert_eq!(form.draft().get("name"), "Grace");
        assert_eq!(form.draft().get("phone"), "");
        assert!(form.draft().contains("phone"));
        assert!(!form.draft().contains("company"));
        assert_eq!(form.draft().len(), 3);
    }

    #[test]
    fn resync_discards_edits_and_errors() {
        let fields = default_user_fields();
        let mut form = RecordForm::with_fields(&fields, Some(&seeded()));
        form.set_field("name", "").unwrap();
        assert!(form.begin_submit().is_err());
        assert!(form.errors().has_error("name"));

        form.sync(&fields, Some(&seeded()));
        assert_eq!(form.draft().get("name"), "Grace");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn typing_does_not_clear_errors() {
        let mut form = RecordForm::with_fields(&default_user_fields(), None);
        assert!(matches!(form.begin_submit(), Err(SubmitRejection::Invalid(_))));
        form.set_field("name", "Ada").unwrap();
        assert_eq!(form.error_for("name"), Some("Name is required"));
        assert_eq!(form.state(), FormState::Ready);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut form = RecordForm::with_fields(&default_user_fields(), None);
        assert_eq!(
            form.set_field("nickname", "x"),
            Err(FormError::UnknownField("nickname".into()))
        );
        assert!(!form.draft().contains("nickname"));
    }

    #[test]
    fn valid_submit_calls_handler_once_with_every_field() {
        let fields = default_user_fields();
        let mut form = RecordForm::with_fields(&fields, None);
        form.set_field("name", "Ada").unwrap();
        form.set_field("email", "ada@example.com").unwrap();

        let mut calls = Vec::new();
        let result = form.submit(|draft| {
            calls.push(draft.clone());
            "saved"
        });

        assert_eq!(result, Ok("saved"));
        assert_eq!(calls.len(), 1);
        let names: Vec<&str> = calls[0].names().collect();
        for field in &fields {
            assert!(names.contains(&field.name.as_str()));
        }
        assert_eq!(form.state(), FormState::Ready);
    }

    #[test]
    fn invalid_submit_never_reaches_handler() {
        let fields = vec![FieldDefinition::new("email", "Email", FieldType::Email).required()];
        let mut form = RecordForm::with_fields(&fields, None);
        form.set_field("email", "a@b").unwrap();

        let mut called = false;
        let result = form.submit(|_| called = true);

        assert!(!called);
        let Err(SubmitRejection::Invalid(errors)) = result else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.get("email"), Some("Invalid email format"));
        assert_eq!(form.state(), FormState::Ready);
    }

    #[test]
    fn busy_flag_blocks_submit_and_swaps_label() {
        let mut form = RecordForm::with_fields(&default_user_fields(), Some(&seeded()));
        assert_eq!(form.submit_label(), SUBMIT_LABEL);
        form.set_busy(true);
        assert!(!form.can_submit());
        assert_eq!(form.submit_label(), SAVING_LABEL);
        assert_eq!(form.begin_submit(), Err(SubmitRejection::Busy));
        form.set_busy(false);
        assert!(form.can_submit());
    }

    #[test]
    fn begin_submit_exposes_submitting_state() {
        let mut form = RecordForm::with_fields(&default_user_fields(), Some(&seeded()));
        let draft = form.begin_submit().unwrap();
        assert_eq!(draft.get("email"), "grace@example.com");
        assert_eq!(form.state(), FormState::Submitting);
        assert_eq!(form.begin_submit(), Err(SubmitRejection::Busy));
        form.finish_submit();
        assert_eq!(form.state(), FormState::Ready);
    }
}
