use thiserror::Error;

use crate::domain::{Cents, RecordId, format_cents};
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Amount must be greater than 0 (got {})", format_cents(*.0))]
    InvalidAmount(Cents),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown expense type '{expense_type}' for category {category}")]
    UnknownExpenseType {
        category: String,
        expense_type: String,
    },

    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("No expense at position {index} (ledger has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Expense not found: {0}")]
    RecordNotFound(RecordId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; nothing was changed.
    Validation,
    /// The addressed record does not exist; nothing was changed.
    NotFound,
    /// The stored data could not be read. Fatal at load.
    Parse,
    /// The file system refused a read or write.
    Storage,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAmount(_)
            | LedgerError::UnknownCategory(_)
            | LedgerError::UnknownExpenseType { .. }
            | LedgerError::InvalidDate(_)
            | LedgerError::InvalidMonth(_) => ErrorKind::Validation,
            LedgerError::IndexOutOfRange { .. } | LedgerError::RecordNotFound(_) => {
                ErrorKind::NotFound
            }
            LedgerError::Store(e) if e.is_parse_error() => ErrorKind::Parse,
            LedgerError::Store(_) => ErrorKind::Storage,
        }
    }
}
