use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{MonthlyBudget, format_cents, parse_month, parse_positive_cents};

use super::StoreError;

const BUDGET_HEADER: [&str; 3] = ["Month", "Year", "Budget"];
/// The budget row always follows the header.
const BUDGET_LINE: usize = 2;

/// Single-row file holding the most recently saved monthly budget.
#[derive(Debug, Clone)]
pub struct BudgetStore {
    path: PathBuf,
}

impl BudgetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved budget, or `None` when none has been set.
    pub fn load(&self) -> Result<Option<MonthlyBudget>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;

        let Some(result) = reader.records().next() else {
            return Ok(None);
        };
        let row = result?;
        let line = row.position().map(|p| p.line() as usize).unwrap_or(BUDGET_LINE);

        let invalid = |reason: &str| StoreError::InvalidBudget {
            line,
            reason: reason.to_string(),
        };

        let month = row
            .get(0)
            .and_then(parse_month)
            .ok_or_else(|| invalid("unknown month"))?;
        let year = row
            .get(1)
            .and_then(|y| y.trim().parse::<i32>().ok())
            .ok_or_else(|| invalid("invalid year"))?;
        let amount_cents = match row.get(2).map(parse_positive_cents) {
            Some(Ok(cents)) => cents,
            Some(Err(e)) => return Err(invalid(&e.to_string())),
            None => return Err(invalid("missing amount")),
        };

        Ok(Some(MonthlyBudget::new(month, year, amount_cents)))
    }

    /// Overwrite the file with `budget` as its only row.
    /// A budget that is not positive is rejected and the file is left alone.
    pub fn save(&self, budget: &MonthlyBudget) -> Result<(), StoreError> {
        if budget.amount_cents <= 0 {
            return Err(StoreError::InvalidBudget {
                line: BUDGET_LINE,
                reason: format!("amount {} is not positive", format_cents(budget.amount_cents)),
            });
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(BUDGET_HEADER)?;
        writer.write_record([
            budget.month.name().to_string(),
            budget.year.to_string(),
            format_cents(budget.amount_cents),
        ])?;
        writer.flush()?;

        debug!(path = %self.path.display(), month = %budget.month_key(), "saved budget");
        Ok(())
    }
}
