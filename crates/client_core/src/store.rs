//! Local mirror of the account service. Mutated only from confirmed responses.

use std::collections::HashSet;

use shared::{domain::AccountId, protocol::AccountRecord};
use tracing::warn;

use crate::{error::AccountError, service::AccountService};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountListStore {
    records: Vec<AccountRecord>,
}

impl AccountListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[AccountRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &AccountId) -> Option<&AccountRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.get(id).is_some()
    }

    /// Replaces the collection with the service's full listing. On any
    /// failure the previous collection is kept as is.
    pub async fn load(&mut self, service: &dyn AccountService) -> Result<usize, AccountError> {
        let records = service
            .list_accounts()
            .await
            .map_err(|source| AccountError::Fetch { source })?;
        self.replace_all(records)?;
        Ok(self.records.len())
    }

    pub fn replace_all(&mut self, records: Vec<AccountRecord>) -> Result<(), AccountError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            check_identity(&record.id)?;
            if !seen.insert(&record.id) {
                warn!(account_id = %record.id, "account listing contains a duplicate id");
                return Err(AccountError::Consistency {
                    id: record.id.clone(),
                    reason: "duplicate id in account listing",
                });
            }
        }
        self.records = records;
        Ok(())
    }

    pub fn reconcile_inserted(&mut self, record: AccountRecord) -> Result<(), AccountError> {
        check_identity(&record.id)?;
        if self.contains(&record.id) {
            warn!(account_id = %record.id, "created account collides with a known id");
            return Err(AccountError::Consistency {
                id: record.id,
                reason: "created account id is already present",
            });
        }
        self.records.push(record);
        Ok(())
    }

    pub fn reconcile_updated(&mut self, record: AccountRecord) -> Result<(), AccountError> {
        let Some(slot) = self.records.iter_mut().find(|r| r.id == record.id) else {
            warn!(account_id = %record.id, "updated account is missing from the local list");
            return Err(AccountError::NotFound { id: record.id });
        };
        *slot = record;
        Ok(())
    }

    /// Idempotent. Returns whether a record was removed.
    pub fn reconcile_deleted(&mut self, id: &AccountId) -> bool {
        let before = self.records.len();
        self.records.retain(|record| &record.id != id);
        self.records.len() != before
    }
}

fn check_identity(id: &AccountId) -> Result<(), AccountError> {
    if id.is_blank() {
        return Err(AccountError::Consistency {
            id: id.clone(),
            reason: "account id is empty",
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
