use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type RecordId = Uuid;

/// Date format used for stored dates and day bucket keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single expense entry.
///
/// The date is kept as text: a stored row whose date does not parse still
/// loads, it is only left out of time-bucketed totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// In-memory identity, assigned when the record enters a ledger. Never persisted.
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: RecordId,
    pub date: String,
    pub category: String,
    /// Auxiliary classification (e.g. "Lunch"), ignored by aggregation
    pub expense_type: Option<String>,
    pub amount_cents: Cents,
    pub description: String,
}

impl ExpenseRecord {
    pub fn new(date: NaiveDate, category: impl Into<String>, amount_cents: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: date.format(DATE_FORMAT).to_string(),
            category: category.into(),
            expense_type: None,
            amount_cents,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_expense_type(mut self, expense_type: impl Into<String>) -> Self {
        self.expense_type = Some(expense_type.into());
        self
    }

    /// Parsed calendar date, or `None` if the stored text is not `YYYY-MM-DD`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    /// Two records are the same expense if everything but the in-memory id matches.
    pub fn same_entry(&self, other: &ExpenseRecord) -> bool {
        self.date == other.date
            && self.category == other.category
            && self.expense_type == other.expense_type
            && self.amount_cents == other.amount_cents
            && self.description == other.description
    }
}

/// Restricts a query to one category or leaves it open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(name) => name == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    /// "All" (any case) means no filter.
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }
}

impl From<Option<String>> for CategoryFilter {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(name) => CategoryFilter::from(name.as_str()),
            None => CategoryFilter::All,
        }
    }
}
