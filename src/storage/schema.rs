use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::domain::{ExpenseRecord, format_cents, parse_positive_cents};

use super::StoreError;

/// Column layout of the expenses file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordSchema {
    /// `Date,Category,Amount,Description`
    Basic,
    /// `Date,Category,Type,Amount,Description`
    #[default]
    Typed,
    /// `Date,Expense_Type,Category,Amount,Description`
    TypeFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Date,
    Category,
    Type,
    Amount,
    Description,
}

impl RecordSchema {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSchema::Basic => "basic",
            RecordSchema::Typed => "typed",
            RecordSchema::TypeFirst => "type-first",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(RecordSchema::Basic),
            "typed" => Some(RecordSchema::Typed),
            "type-first" | "type_first" => Some(RecordSchema::TypeFirst),
            _ => None,
        }
    }

    fn columns(&self) -> &'static [Column] {
        match self {
            RecordSchema::Basic => &[
                Column::Date,
                Column::Category,
                Column::Amount,
                Column::Description,
            ],
            RecordSchema::Typed => &[
                Column::Date,
                Column::Category,
                Column::Type,
                Column::Amount,
                Column::Description,
            ],
            RecordSchema::TypeFirst => &[
                Column::Date,
                Column::Type,
                Column::Category,
                Column::Amount,
                Column::Description,
            ],
        }
    }

    pub fn header(&self) -> Vec<&'static str> {
        self.columns()
            .iter()
            .map(|column| match (self, column) {
                (_, Column::Date) => "Date",
                (_, Column::Category) => "Category",
                (RecordSchema::TypeFirst, Column::Type) => "Expense_Type",
                (_, Column::Type) => "Type",
                (_, Column::Amount) => "Amount",
                (_, Column::Description) => "Description",
            })
            .collect()
    }

    /// Render a record as one row in this layout.
    pub fn to_row(&self, record: &ExpenseRecord) -> Vec<String> {
        self.columns()
            .iter()
            .map(|column| match column {
                Column::Date => record.date.clone(),
                Column::Category => record.category.clone(),
                Column::Type => record.expense_type.clone().unwrap_or_default(),
                Column::Amount => format_cents(record.amount_cents),
                Column::Description => record.description.clone(),
            })
            .collect()
    }
}

impl std::fmt::Display for RecordSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column positions resolved from a file's header row.
///
/// Files are read by header name, so a file written under one layout loads
/// under any configured layout.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    date: usize,
    category: usize,
    expense_type: Option<usize>,
    amount: usize,
    description: Option<usize>,
}

impl HeaderMap {
    pub fn resolve(header: &StringRecord) -> Result<Self, StoreError> {
        Ok(Self {
            date: find_column(header, &["Date"]).ok_or(StoreError::MissingColumn("Date"))?,
            category: find_column(header, &["Category"])
                .ok_or(StoreError::MissingColumn("Category"))?,
            expense_type: find_column(header, &["Type", "Expense_Type"]),
            amount: find_column(header, &["Amount"]).ok_or(StoreError::MissingColumn("Amount"))?,
            description: find_column(header, &["Description"]),
        })
    }

    /// Build a record from a data row. `line` is the 1-based file line, used in errors.
    /// Missing trailing fields read as empty.
    pub fn read(&self, row: &StringRecord, line: usize) -> Result<ExpenseRecord, StoreError> {
        let field = |index: usize| row.get(index).unwrap_or("");

        let raw_amount = field(self.amount);
        let amount_cents = parse_positive_cents(raw_amount).map_err(|source| StoreError::InvalidAmount {
            line,
            value: raw_amount.to_string(),
            source,
        })?;

        let expense_type = self
            .expense_type
            .map(field)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(ExpenseRecord {
            id: uuid::Uuid::new_v4(),
            date: field(self.date).trim().to_string(),
            category: field(self.category).to_string(),
            expense_type,
            amount_cents,
            description: self.description.map(field).unwrap_or("").to_string(),
        })
    }
}

fn find_column(header: &StringRecord, names: &[&str]) -> Option<usize> {
    header.iter().position(|h| {
        // Spreadsheet exports may start with a byte order mark
        let h = h.trim_start_matches('\u{feff}').trim();
        names.iter().any(|n| h.eq_ignore_ascii_case(n))
    })
}
