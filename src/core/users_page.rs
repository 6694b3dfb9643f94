//! Page controller for the user-management screen.
//!
//! [`UsersPage`] owns the record list, the modal, and the form. Every event
//! handler returns an [`ActionOutcome`] instead of an error: service failures
//! are logged and swallowed here, and the loading/saving indicators are always
//! cleared before the handler returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::core::services::{ServiceResult, UserApi};
use crate::core::store::UserStore;
use crate::domain::{Draft, FieldDefinition, Record, RecordId};
use crate::forms::{ErrorSet, FormError, FormMode, RecordForm, SubmitRejection};
use crate::table::RowActions;

/// How a newly created record gets its identifier in the local list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// Keep the id returned by the server, unless it is missing or already taken.
    #[default]
    TrustServer,
    /// Always assign a locally generated temporary id.
    ///
    /// Local ids are still sent on edit and delete. A backend that never
    /// stored the record answers those with an error until the next reload
    /// replaces the row.
    LocalTemporary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open(FormMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    AlreadySaving,
    ModalClosed,
    MissingId,
    FormNotReady,
}

/// Result of a page event handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Completed,
    Ignored(IgnoreReason),
    /// Validation failed; the modal stays open with these errors.
    Invalid(ErrorSet),
    /// The service call failed. The message has already been logged.
    Failed(String),
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed)
    }
}

pub struct UsersPage {
    api: Box<dyn UserApi>,
    fields: Vec<FieldDefinition>,
    store: UserStore,
    form: RecordForm,
    modal: ModalState,
    loading: bool,
    saving: bool,
    id_policy: IdPolicy,
    last_loaded: Option<DateTime<Utc>>,
}

impl UsersPage {
    pub fn new(api: Box<dyn UserApi>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            api,
            fields,
            store: UserStore::new(),
            form: RecordForm::new(),
            modal: ModalState::Closed,
            loading: false,
            saving: false,
            id_policy: IdPolicy::default(),
            last_loaded: None,
        }
    }

    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    pub fn records(&self) -> &[Record] {
        self.store.list()
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn form(&self) -> &RecordForm {
        &self.form
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn is_modal_open(&self) -> bool {
        matches!(self.modal, ModalState::Open(_))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    pub fn last_loaded(&self) -> Option<DateTime<Utc>> {
        self.last_loaded
    }

    /// Dialog title for the current modal, if one is open.
    pub fn title(&self) -> Option<&'static str> {
        match &self.modal {
            ModalState::Closed => None,
            ModalState::Open(FormMode::Create) => Some("Add User"),
            ModalState::Open(FormMode::Edit(_)) => Some("Edit User"),
        }
    }

    /// Initial load when the page is first shown.
    pub fn start(&mut self) -> ActionOutcome {
        self.reload()
    }

    /// Replaces the record list with a fresh listing from the server.
    pub fn reload(&mut self) -> ActionOutcome {
        self.loading = true;
        let result = self.api.list();
        self.loading = false;

        match result {
            Ok(records) => {
                self.store.replace(records);
                self.last_loaded = Some(Utc::now());
                info!(count = self.store.len(), "loaded users");
                ActionOutcome::Completed
            }
            Err(err) => {
                error!(error = %err, "failed to load users");
                ActionOutcome::Failed(err.to_string())
            }
        }
    }

    pub fn open_create(&mut self) {
        self.form.sync(&self.fields, None);
        self.modal = ModalState::Open(FormMode::Create);
    }

    pub fn open_edit(&mut self, record: &Record) -> ActionOutcome {
        let Some(id) = record.id.clone() else {
            warn!("cannot edit a record that has no id");
            return ActionOutcome::Ignored(IgnoreReason::MissingId);
        };
        self.form.sync(&self.fields, Some(record));
        self.modal = ModalState::Open(FormMode::Edit(id));
        ActionOutcome::Completed
    }

    pub fn close(&mut self) {
        self.modal = ModalState::Closed;
    }

    /// Forwards one keystroke-level change to the open form.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        if !self.is_modal_open() {
            return Err(FormError::NotReady);
        }
        self.form.set_field(name, value)
    }

    /// Deletes on the server, then drops the record locally. No confirmation.
    pub fn delete(&mut self, id: &RecordId) -> ActionOutcome {
        warn_if_local(id);
        match self.api.delete(id) {
            Ok(()) => {
                self.store.remove(id);
                info!(%id, "deleted user");
                ActionOutcome::Completed
            }
            Err(err) => {
                error!(%id, error = %err, "failed to delete user");
                ActionOutcome::Failed(err.to_string())
            }
        }
    }

    /// Validates the form and persists it according to the modal mode.
    ///
    /// The modal closes only on success. Saving is cleared either way.
    pub fn submit(&mut self) -> ActionOutcome {
        match self.begin_save() {
            Ok(pending) => self.complete_save(pending),
            Err(outcome) => outcome,
        }
    }

    /// First half of [`submit`](Self::submit): validates the form and marks
    /// the page and form as saving. The returned draft must be handed to
    /// [`complete_save`](Self::complete_save).
    pub fn begin_save(&mut self) -> Result<PendingSave, ActionOutcome> {
        let ModalState::Open(mode) = self.modal.clone() else {
            return Err(ActionOutcome::Ignored(IgnoreReason::ModalClosed));
        };
        if self.saving {
            return Err(ActionOutcome::Ignored(IgnoreReason::AlreadySaving));
        }

        let draft = self.form.begin_submit().map_err(|rejection| match rejection {
            SubmitRejection::Invalid(errors) => ActionOutcome::Invalid(errors),
            SubmitRejection::Busy => ActionOutcome::Ignored(IgnoreReason::AlreadySaving),
            SubmitRejection::NotReady => ActionOutcome::Ignored(IgnoreReason::FormNotReady),
        })?;

        self.set_saving(true);
        Ok(PendingSave { mode, draft })
    }

    /// Second half of [`submit`](Self::submit): runs the service call, clears
    /// the saving state, and closes the modal on success.
    pub fn complete_save(&mut self, pending: PendingSave) -> ActionOutcome {
        let PendingSave { mode, draft } = pending;
        let result = match &mode {
            FormMode::Edit(id) => self.persist_update(id, &draft),
            FormMode::Create => self.persist_create(&draft),
        };
        self.set_saving(false);
        self.form.finish_submit();

        match result {
            Ok(()) => {
                self.close();
                ActionOutcome::Completed
            }
            Err(err) => {
                error!(error = %err, "failed to save user");
                ActionOutcome::Failed(err.to_string())
            }
        }
    }

    fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
        self.form.set_busy(saving);
    }

    fn persist_update(&mut self, id: &RecordId, draft: &Draft) -> ServiceResult<()> {
        warn_if_local(id);
        let updated = self.api.update(id, &Record::from(draft))?;
        if self.store.contains(id) {
            self.store.upsert(id.clone(), &updated);
            info!(%id, "updated user");
        } else {
            warn!(%id, "updated user is no longer listed; skipping local merge");
        }
        Ok(())
    }

    fn persist_create(&mut self, draft: &Draft) -> ServiceResult<()> {
        let created = self.api.create(&Record::from(draft))?;
        let id = self.assign_create_id(created.id.clone());
        info!(%id, "created user");
        self.store.upsert(id, &created);
        Ok(())
    }

    fn assign_create_id(&self, server_id: Option<RecordId>) -> RecordId {
        match (self.id_policy, server_id) {
            (IdPolicy::LocalTemporary, _) => RecordId::local(),
            (IdPolicy::TrustServer, Some(id)) if !self.store.contains(&id) => id,
            (IdPolicy::TrustServer, Some(id)) => {
                warn!(%id, "server returned an id that is already listed; using a local id");
                RecordId::local()
            }
            (IdPolicy::TrustServer, None) => {
                warn!("server response carried no id; using a local id");
                RecordId::local()
            }
        }
    }
}

/// A validated draft between [`UsersPage::begin_save`] and
/// [`UsersPage::complete_save`].
#[derive(Debug)]
pub struct PendingSave {
    mode: FormMode,
    draft: Draft,
}

impl PendingSave {
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }
}

fn warn_if_local(id: &RecordId) {
    if id.is_local() {
        warn!(%id, "record was never confirmed by the server; the request may be rejected");
    }
}

impl RowActions for UsersPage {
    type Output = ActionOutcome;

    fn on_edit(&mut self, record: &Record) -> ActionOutcome {
        self.open_edit(record)
    }

    fn on_delete(&mut self, id: &RecordId) -> ActionOutcome {
        self.delete(id)
    }
}
