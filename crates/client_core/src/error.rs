use std::fmt;

use shared::{domain::AccountId, error::ValidationError};
use thiserror::Error;

use crate::guard::GuardBusy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("failed to load accounts: {source:#}")]
    Fetch { source: anyhow::Error },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("inconsistent account list for id '{id}': {reason}")]
    Consistency { id: AccountId, reason: &'static str },
    #[error("account {id} is not present in the local list")]
    NotFound { id: AccountId },
    #[error(transparent)]
    Busy(#[from] GuardBusy),
    #[error("account {operation} failed: {source:#}")]
    Remote {
        operation: WriteOperation,
        source: anyhow::Error,
    },
}

impl AccountError {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }
}
