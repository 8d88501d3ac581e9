use shared::{
    domain::{AccountDraft, AccountField, AccountId},
    error::ValidationError,
    protocol::AccountRecord,
};

/// The shared add/edit form. Exactly one of the two modes is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSession {
    NewDraft(AccountDraft),
    Editing(AccountRecord),
}

impl Default for FormSession {
    fn default() -> Self {
        Self::NewDraft(AccountDraft::default())
    }
}

impl FormSession {
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    pub fn editing_id(&self) -> Option<&AccountId> {
        match self {
            Self::Editing(record) => Some(&record.id),
            Self::NewDraft(_) => None,
        }
    }

    /// Updates the working copy only; the stored record is untouched until
    /// the service confirms an update.
    pub fn edit_field(&mut self, field: AccountField, value: &str) -> Result<(), ValidationError> {
        match self {
            Self::NewDraft(draft) => draft.set(field, value),
            Self::Editing(record) => record.apply(field, value),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::NewDraft(_) => "Add an account",
            Self::Editing(_) => "Update an account",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            Self::NewDraft(_) => "Add",
            Self::Editing(_) => "Update",
        }
    }
}
