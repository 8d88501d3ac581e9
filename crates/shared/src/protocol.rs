use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{AccountField, AccountId, AccountType},
    error::ValidationError,
};

pub const CREATION_DATE_FORMAT: &str = "%Y-%m-%d";

/// A persisted account as returned by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    #[serde(rename = "solde")]
    pub balance: Decimal,
    #[serde(rename = "dateCreation")]
    pub creation_date: NaiveDate,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
}

impl AccountRecord {
    /// Parses `value` into `field`. The record is left untouched when parsing fails.
    pub fn apply(&mut self, field: AccountField, value: &str) -> Result<(), ValidationError> {
        match field {
            AccountField::Balance => self.balance = parse_balance(value)?,
            AccountField::CreationDate => self.creation_date = parse_creation_date(value)?,
            AccountField::AccountType => self.account_type = value.parse()?,
        }
        Ok(())
    }
}

/// Body of a create request: `{solde, dateCreation, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    #[serde(rename = "solde")]
    pub balance: Decimal,
    #[serde(rename = "dateCreation")]
    pub creation_date: NaiveDate,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
}

impl NewAccount {
    pub fn with_id(self, id: AccountId) -> AccountRecord {
        AccountRecord {
            id,
            balance: self.balance,
            creation_date: self.creation_date,
            account_type: self.account_type,
        }
    }
}

pub fn parse_balance(value: &str) -> Result<Decimal, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(AccountField::Balance));
    }
    Decimal::from_str(trimmed).map_err(|err| ValidationError::Invalid {
        field: AccountField::Balance,
        value: value.to_string(),
        reason: err.to_string(),
    })
}

pub fn parse_creation_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(AccountField::CreationDate));
    }
    NaiveDate::parse_from_str(trimmed, CREATION_DATE_FORMAT).map_err(|err| {
        ValidationError::Invalid {
            field: AccountField::CreationDate,
            value: value.to_string(),
            reason: err.to_string(),
        }
    })
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
