use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::AccountField;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    Missing(AccountField),
    #[error("invalid value {value:?} for `{field}`: {reason}")]
    Invalid {
        field: AccountField,
        value: String,
        reason: String,
    },
    #[error("unknown account field `{0}`")]
    UnknownField(String),
}

impl ValidationError {
    pub fn field(&self) -> Option<AccountField> {
        match self {
            Self::Missing(field) | Self::Invalid { field, .. } => Some(*field),
            Self::UnknownField(_) => None,
        }
    }
}

/// Error payload the account service may attach to a non-2xx response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl RemoteErrorBody {
    pub fn summary(&self) -> Option<String> {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
            .map(str::to_string)
    }
}
