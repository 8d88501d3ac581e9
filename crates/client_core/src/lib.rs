use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{
    domain::{AccountDraft, AccountField, AccountId},
    error::ValidationError,
    protocol::AccountRecord,
};
use tracing::{error, info, warn};

pub mod error;
pub mod guard;
pub mod service;
pub mod session;
pub mod status;
pub mod store;

pub use error::{AccountError, WriteOperation};
pub use guard::{GuardBusy, MutationGuard, MutationPermit};
pub use service::{AccountService, HttpAccountService};
pub use session::FormSession;
pub use status::{StatusLevel, StatusMessage, StatusNotifier};
pub use store::AccountListStore;

const ACCOUNT_CREATED: &str = "Account added successfully!";
const ACCOUNT_UPDATED: &str = "Account updated successfully!";
const ACCOUNT_DELETED: &str = "Account deleted successfully!";

/// Everything the presentation layer reads, owned in one place.
#[derive(Debug, Default)]
pub struct ControllerState {
    pub store: AccountListStore,
    pub session: FormSession,
    pub status: StatusNotifier,
}

/// Drives the add/edit form against the account service.
///
/// Writes go through the [`MutationGuard`], so reconciliations into the
/// local list are strictly sequential. The state mutex is never held across
/// a remote call.
pub struct AccountController {
    service: Arc<dyn AccountService>,
    guard: MutationGuard,
    state: Mutex<ControllerState>,
}

impl AccountController {
    pub fn new(service: Arc<dyn AccountService>) -> Self {
        Self {
            service,
            guard: MutationGuard::new(),
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Replaces the local list with the service's listing. Shares the write
    /// guard so a stale listing can never overwrite a confirmed write.
    pub async fn load(&self) -> Result<usize, AccountError> {
        let _permit = self.guard.try_acquire().map_err(|busy| {
            warn!("account list load rejected: a write is in flight");
            busy
        })?;

        let mut fresh = AccountListStore::new();
        let loaded = fresh.load(self.service.as_ref()).await;
        match loaded {
            Ok(count) => {
                self.state().store = fresh;
                info!(count, "account list loaded");
                Ok(count)
            }
            Err(err) => {
                error!(error = %err, "account list load failed");
                self.state()
                    .status
                    .error(format!("Could not load accounts: {err}"));
                Err(err)
            }
        }
    }

    /// Creates from the draft or updates the record under edit, depending on
    /// the current form mode. Returns the server's record.
    pub async fn submit(&self) -> Result<AccountRecord, AccountError> {
        let session = self.state().session.clone();
        match session {
            FormSession::NewDraft(draft) => self.create(draft).await,
            FormSession::Editing(record) => self.update(record).await,
        }
    }

    pub async fn delete_record(&self, id: &AccountId) -> Result<(), AccountError> {
        let _permit = self.begin_write(WriteOperation::Delete)?;

        if let Err(source) = self.service.delete_account(id).await {
            return Err(self.remote_failure(WriteOperation::Delete, source));
        }

        let mut state = self.state();
        let removed = state.store.reconcile_deleted(id);
        if state.session.editing_id() == Some(id) {
            state.session = FormSession::default();
        }
        state.status.success(ACCOUNT_DELETED);
        info!(account_id = %id, removed, "account deleted");
        Ok(())
    }

    pub fn select_for_edit(&self, record: &AccountRecord) -> Result<(), AccountError> {
        if self.guard.is_held() {
            warn!(account_id = %record.id, "edit selection rejected while a write is in flight");
            return Err(GuardBusy.into());
        }
        self.state().session = FormSession::Editing(record.clone());
        Ok(())
    }

    /// Selects a record from the local list by id.
    pub fn select_account(&self, id: &AccountId) -> Result<(), AccountError> {
        let record = self
            .state()
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| AccountError::NotFound { id: id.clone() })?;
        self.select_for_edit(&record)
    }

    pub fn cancel_edit(&self) {
        self.state().session = FormSession::default();
    }

    pub fn edit_field(&self, field: AccountField, value: &str) -> Result<(), ValidationError> {
        self.state().session.edit_field(field, value)
    }

    pub fn accounts(&self) -> Vec<AccountRecord> {
        self.state().store.records().to_vec()
    }

    pub fn session(&self) -> FormSession {
        self.state().session.clone()
    }

    pub fn status(&self) -> Option<StatusMessage> {
        self.state().status.current().cloned()
    }

    pub fn clear_status(&self) {
        self.state().status.clear();
    }

    /// Mutation affordances should be disabled while this is true.
    pub fn is_busy(&self) -> bool {
        self.guard.is_held()
    }

    pub fn form_title(&self) -> &'static str {
        self.state().session.title()
    }

    pub fn submit_label(&self) -> &'static str {
        self.state().session.submit_label()
    }

    async fn create(&self, draft: AccountDraft) -> Result<AccountRecord, AccountError> {
        if self.guard.is_held() {
            warn!(
                operation = %WriteOperation::Create,
                "account write rejected: another write is in flight"
            );
            return Err(GuardBusy.into());
        }
        let new_account = match draft.validate() {
            Ok(new_account) => new_account,
            Err(err) => {
                self.state().status.error(err.to_string());
                return Err(err.into());
            }
        };
        let _permit = self.begin_write(WriteOperation::Create)?;

        let created = match self.service.create_account(&new_account).await {
            Ok(created) => created,
            Err(source) => return Err(self.remote_failure(WriteOperation::Create, source)),
        };

        let mut state = self.state();
        if let Err(err) = state.store.reconcile_inserted(created.clone()) {
            state.status.error(err.to_string());
            return Err(err);
        }
        state.session = FormSession::default();
        state.status.success(ACCOUNT_CREATED);
        info!(account_id = %created.id, "account created");
        Ok(created)
    }

    async fn update(&self, edited: AccountRecord) -> Result<AccountRecord, AccountError> {
        let _permit = self.begin_write(WriteOperation::Update)?;

        let updated = match self.service.update_account(&edited).await {
            Ok(updated) => updated,
            Err(source) => return Err(self.remote_failure(WriteOperation::Update, source)),
        };

        let mut state = self.state();
        let reconciled = if updated.id != edited.id {
            warn!(
                requested = %edited.id,
                returned = %updated.id,
                "account service answered an update with a different id"
            );
            Err(AccountError::Consistency {
                id: updated.id.clone(),
                reason: "update response carries a different id",
            })
        } else {
            state.store.reconcile_updated(updated.clone())
        };
        if let Err(err) = reconciled {
            state.status.error(err.to_string());
            return Err(err);
        }
        state.session = FormSession::default();
        state.status.success(ACCOUNT_UPDATED);
        info!(account_id = %updated.id, "account updated");
        Ok(updated)
    }

    /// Busy rejections leave the status untouched; a started write clears it.
    fn begin_write(&self, operation: WriteOperation) -> Result<MutationPermit, AccountError> {
        let permit = self.guard.try_acquire().map_err(|busy| {
            warn!(%operation, "account write rejected: another write is in flight");
            busy
        })?;
        self.state().status.clear();
        Ok(permit)
    }

    fn remote_failure(&self, operation: WriteOperation, source: anyhow::Error) -> AccountError {
        let err = AccountError::Remote { operation, source };
        error!(%operation, error = %err, "account service call failed");
        self.state().status.error(err.to_string());
        err
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
