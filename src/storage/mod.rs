mod budget_store;
mod expense_store;
mod schema;

pub use budget_store::*;
pub use expense_store::*;
pub use schema::*;

use thiserror::Error;

use crate::domain::ParseCentsError;

/// Failures reading or writing the flat files.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Line {line}: invalid amount '{value}' ({source})")]
    InvalidAmount {
        line: usize,
        value: String,
        source: ParseCentsError,
    },

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Line {line}: invalid budget row ({reason})")]
    InvalidBudget { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl StoreError {
    /// True for content errors in an existing file, as opposed to I/O failures.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidAmount { .. }
                | StoreError::MissingColumn(_)
                | StoreError::InvalidBudget { .. }
        )
    }
}
