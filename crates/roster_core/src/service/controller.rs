//! Form controller: the single owner of roster application state.
//!
//! # Responsibility
//! - Route form actions through the validator into store mutations.
//! - Keep the edit session, form fields and error slot consistent.
//! - Re-render rows after load and after every successful mutation.
//!
//! # Invariants
//! - Failed actions never mutate the store; their reason lands in the
//!   error slot.
//! - Successful create/update clears the form and the error slot.
//! - Row triggers dispatch by `RowKey`, resolved to an index at call time.

use crate::model::record::{RecordInput, RecordValidationError};
use crate::repo::record_repo::{RecordRepository, RepoResult};
use crate::service::record_store::{LoadOutcome, RecordStore, RowKey, StoreError};
use crate::service::session::EditSession;
use crate::service::view::{render_rows, FormMode, RowView};
use crate::storage::KvStore;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Prompt shown before a row is deleted.
pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this record?";

/// Interactive yes/no confirmation supplied by the UI.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> ConfirmPrompt for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug)]
pub enum ControllerError {
    Validation(RecordValidationError),
    Store(StoreError),
    /// Update requested while in create mode.
    NotEditing,
    /// Create requested while a record is being edited.
    EditInProgress,
    /// Row trigger refers to a row that no longer exists.
    UnknownRow(RowKey),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::NotEditing => f.write_str("no record is being edited"),
            Self::EditInProgress => f.write_str("finish or cancel the current edit first"),
            Self::UnknownRow(key) => write!(f, "record {key} no longer exists"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for ControllerError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// One of the four form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Id,
    Email,
    Contact,
}

/// Current form inputs plus the visible error slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub fields: RecordInput,
    pub error: Option<String>,
}

impl FormState {
    fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_clear(&self) -> bool {
        self.fields.is_blank() && self.error.is_none()
    }
}

/// Roster application state and its form-level actions.
pub struct RosterController<K: KvStore> {
    store: RecordStore<K>,
    session: EditSession,
    form: FormState,
    rows: Vec<RowView>,
    render_generation: u64,
}

impl<K: KvStore> RosterController<K> {
    /// Loads the store and renders the initial rows.
    ///
    /// A corrupt slot starts an empty roster and leaves a notice in the
    /// error slot.
    pub fn open(repo: RecordRepository<K>) -> RepoResult<(Self, LoadOutcome)> {
        let (store, outcome) = RecordStore::load(repo)?;
        let mut controller = Self {
            store,
            session: EditSession::Creating,
            form: FormState::default(),
            rows: Vec::new(),
            render_generation: 0,
        };
        if let LoadOutcome::RecoveredFromCorrupt(_) = &outcome {
            controller.form.error =
                Some("saved records could not be read; starting with an empty list".to_string());
        }
        controller.render();
        info!(
            "event=controller_open module=controller status=ok len={}",
            controller.store.len()
        );
        Ok((controller, outcome))
    }

    pub fn store(&self) -> &RecordStore<K> {
        &self.store
    }

    pub fn session(&self) -> EditSession {
        self.session
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mode(&self) -> FormMode {
        FormMode::for_session(self.session)
    }

    /// Rows from the latest render.
    pub fn rows(&self) -> &[RowView] {
        &self.rows
    }

    /// Bumped on every render.
    pub fn render_generation(&self) -> u64 {
        self.render_generation
    }

    /// Mirrors one input field as the user types.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        let fields = &mut self.form.fields;
        match field {
            FormField::Name => fields.name = value,
            FormField::Id => fields.id = value,
            FormField::Email => fields.email = value,
            FormField::Contact => fields.contact = value,
        }
    }

    /// Validates `input` and appends it. Only valid in create mode.
    pub fn submit_create(&mut self, input: RecordInput) -> Result<RowKey, ControllerError> {
        if self.session.is_editing() {
            return Err(self.fail(ControllerError::EditInProgress));
        }
        self.form.fields = input;

        let record = match self.form.fields.validate() {
            Ok(record) => record,
            Err(err) => return Err(self.fail(err.into())),
        };
        let key = self
            .store
            .append(record)
            .map_err(|err| self.fail(err.into()))?;

        self.form.clear();
        self.render();
        Ok(key)
    }

    /// Submits the current form fields as a new record.
    pub fn submit_form(&mut self) -> Result<RowKey, ControllerError> {
        let input = self.form.fields.clone();
        self.submit_create(input)
    }

    /// Enters edit mode for `index` and fills the form from that record.
    pub fn begin_edit(&mut self, index: usize) -> Result<(), ControllerError> {
        let Some(record) = self.store.get(index) else {
            let len = self.store.len();
            return Err(self.fail(StoreError::IndexOutOfRange { index, len }.into()));
        };

        self.form.fields = RecordInput::from(record);
        self.form.error = None;
        self.session.begin(index);
        debug!("event=edit_begin module=controller index={index}");
        Ok(())
    }

    /// Row-trigger variant of `begin_edit`.
    pub fn begin_edit_row(&mut self, key: RowKey) -> Result<(), ControllerError> {
        let index = self.resolve(key)?;
        self.begin_edit(index)
    }

    /// Validates `input` and replaces the edited record, then returns to
    /// create mode. On failure the session stays in edit mode.
    pub fn commit_edit(&mut self, input: RecordInput) -> Result<(), ControllerError> {
        self.form.fields = input;
        let Some(index) = self.session.editing_index() else {
            return Err(self.fail(ControllerError::NotEditing));
        };

        let record = match self.form.fields.validate() {
            Ok(record) => record,
            Err(err) => return Err(self.fail(err.into())),
        };
        if let Err(err) = self.store.replace_at(index, record) {
            // Unreachable while every removal goes through `delete_at`, which
            // retargets the session; kept so a desync cannot pin edit mode.
            if matches!(err, StoreError::IndexOutOfRange { .. }) {
                warn!("event=edit_commit module=controller status=error reason=stale_session");
                self.session.reset();
            }
            return Err(self.fail(err.into()));
        }

        self.session.reset();
        self.form.clear();
        self.render();
        Ok(())
    }

    /// Commits the current form fields to the edited record.
    pub fn update_form(&mut self) -> Result<(), ControllerError> {
        let input = self.form.fields.clone();
        self.commit_edit(input)
    }

    /// Leaves edit mode, clearing the form and the error slot.
    pub fn cancel_edit(&mut self) {
        self.session.reset();
        self.form.clear();
        debug!("event=edit_cancel module=controller");
    }

    /// Deletes the record at `index` once `prompt` confirms.
    ///
    /// Returns `Ok(false)` when the user declined.
    pub fn delete_at(
        &mut self,
        index: usize,
        prompt: &mut impl ConfirmPrompt,
    ) -> Result<bool, ControllerError> {
        if index >= self.store.len() {
            let len = self.store.len();
            return Err(self.fail(StoreError::IndexOutOfRange { index, len }.into()));
        }
        if !prompt.confirm(DELETE_CONFIRM_PROMPT) {
            debug!("event=record_delete module=controller status=declined");
            return Ok(false);
        }

        self.store
            .remove_at(index)
            .map_err(|err| self.fail(err.into()))?;
        if self.session.on_row_removed(index) {
            self.form.clear();
        }
        self.render();
        Ok(true)
    }

    /// Row-trigger variant of `delete_at`.
    pub fn delete_row(
        &mut self,
        key: RowKey,
        prompt: &mut impl ConfirmPrompt,
    ) -> Result<bool, ControllerError> {
        let index = self.resolve(key)?;
        self.delete_at(index, prompt)
    }

    fn resolve(&mut self, key: RowKey) -> Result<usize, ControllerError> {
        match self.store.index_of(key) {
            Some(index) => Ok(index),
            None => Err(self.fail(ControllerError::UnknownRow(key))),
        }
    }

    fn fail(&mut self, err: ControllerError) -> ControllerError {
        debug!("event=form_action module=controller status=rejected reason={err}");
        self.form.error = Some(err.to_string());
        err
    }

    fn render(&mut self) {
        self.rows = render_rows(&self.store);
        self.render_generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{ControllerError, FormField, RosterController};
    use crate::model::record::RecordInput;
    use crate::repo::record_repo::RecordRepository;
    use crate::service::session::EditSession;
    use crate::storage::MemoryKvStore;

    fn controller() -> RosterController<MemoryKvStore> {
        RosterController::open(RecordRepository::new(MemoryKvStore::new()))
            .unwrap()
            .0
    }

    #[test]
    fn typed_fields_submit_through_submit_form() {
        let mut roster = controller();
        roster.set_field(FormField::Name, " Ada Lovelace ");
        roster.set_field(FormField::Id, "7");
        roster.set_field(FormField::Email, "ada@analytical.org");
        roster.set_field(FormField::Contact, "1234567890");

        roster.submit_form().unwrap();
        assert_eq!(roster.rows()[0].name, "Ada Lovelace");
        assert!(roster.form().is_clear());
    }

    #[test]
    fn validation_failure_keeps_input_and_sets_reason() {
        let mut roster = controller();
        let input = RecordInput::new("Ada", "7", "ada-at-home", "1234567890");

        let err = roster.submit_create(input.clone()).unwrap_err();
        assert!(matches!(err, ControllerError::Validation(_)));
        assert_eq!(roster.form().fields, input);
        assert_eq!(roster.form().error.as_deref(), Some("invalid email"));
        assert!(roster.store().is_empty());
        assert_eq!(roster.render_generation(), 1);
    }

    #[test]
    fn submit_while_editing_is_rejected() {
        let mut roster = controller();
        roster
            .submit_create(RecordInput::new("Ada", "7", "a@b.co", "1234567890"))
            .unwrap();
        roster.begin_edit(0).unwrap();

        let err = roster
            .submit_create(RecordInput::new("Bob", "8", "b@b.co", "1234567890"))
            .unwrap_err();
        assert!(matches!(err, ControllerError::EditInProgress));
        assert_eq!(roster.form().fields.name, "Ada");
        assert_eq!(roster.store().len(), 1);
        assert_eq!(roster.session(), EditSession::Editing { index: 0 });
    }

    #[test]
    fn update_without_session_is_rejected() {
        let mut roster = controller();
        let err = roster.update_form().unwrap_err();
        assert!(matches!(err, ControllerError::NotEditing));
        assert!(roster.form().error.is_some());
    }
}
