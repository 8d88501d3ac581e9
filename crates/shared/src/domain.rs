use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::ValidationError,
    protocol::{parse_balance, parse_creation_date, NewAccount},
};

/// Server-assigned account identity. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// The account service issues numeric ids; other deployments use strings.
impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(value) => Self(value),
            RawId::Signed(value) => Self(value.to_string()),
            RawId::Unsigned(value) => Self(value.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccountType {
    #[default]
    #[serde(rename = "COURANT", alias = "CURRENT")]
    Current,
    #[serde(rename = "EPARGNE", alias = "SAVINGS")]
    Savings,
}

impl AccountType {
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Current => "COURANT",
            Self::Savings => "EPARGNE",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for AccountType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "COURANT" | "CURRENT" => Ok(Self::Current),
            "EPARGNE" | "SAVINGS" => Ok(Self::Savings),
            _ => Err(ValidationError::Invalid {
                field: AccountField::AccountType,
                value: value.to_string(),
                reason: "expected COURANT or EPARGNE".to_string(),
            }),
        }
    }
}

/// Editable fields shared by drafts and records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountField {
    Balance,
    CreationDate,
    AccountType,
}

impl AccountField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::CreationDate => "creation_date",
            Self::AccountType => "account_type",
        }
    }
}

impl fmt::Display for AccountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AccountField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "balance" | "solde" => Ok(Self::Balance),
            "creation_date" | "creationDate" | "dateCreation" => Ok(Self::CreationDate),
            "account_type" | "accountType" | "type" => Ok(Self::AccountType),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

/// In-progress account under composition. Holds raw form input and never an id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountDraft {
    #[serde(rename = "solde")]
    pub balance: String,
    #[serde(rename = "dateCreation")]
    pub creation_date: String,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
}

impl AccountDraft {
    pub fn set(&mut self, field: AccountField, value: &str) -> Result<(), ValidationError> {
        match field {
            AccountField::Balance => self.balance = value.to_string(),
            AccountField::CreationDate => self.creation_date = value.to_string(),
            AccountField::AccountType => self.account_type = value.parse()?,
        }
        Ok(())
    }

    /// Checks that the required fields are present, then converts the raw
    /// input into a typed create request.
    pub fn validate(&self) -> Result<NewAccount, ValidationError> {
        let balance = required(AccountField::Balance, &self.balance)?;
        let creation_date = required(AccountField::CreationDate, &self.creation_date)?;

        Ok(NewAccount {
            balance: parse_balance(balance)?,
            creation_date: parse_creation_date(creation_date)?,
            account_type: self.account_type,
        })
    }
}

fn required(field: AccountField, value: &str) -> Result<&str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
