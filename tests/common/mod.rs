// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use spendlog::Ledger;
use spendlog::domain::{Catalog, default_catalog};
use spendlog::storage::{ExpenseStore, RecordSchema};
use tempfile::TempDir;

/// Helper to open a ledger backed by a file in a temporary directory
pub fn test_ledger() -> Result<(Ledger, TempDir)> {
    test_ledger_with(RecordSchema::Typed, Catalog::open())
}

/// Same as `test_ledger` but with the default category catalog
pub fn test_ledger_with_catalog() -> Result<(Ledger, TempDir)> {
    test_ledger_with(RecordSchema::Typed, default_catalog())
}

pub fn test_ledger_with(schema: RecordSchema, catalog: Catalog) -> Result<(Ledger, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = ExpenseStore::new(temp_dir.path().join("expenses.csv"), schema);
    let ledger = Ledger::load(store, catalog)?;
    Ok((ledger, temp_dir))
}

/// Reopen the ledger from the same file, as a fresh process would
pub fn reload(ledger: &Ledger) -> Result<Ledger> {
    Ok(Ledger::load(ledger.store().clone(), ledger.catalog().clone())?)
}

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: the three-expense ledger used by the scenario tests
pub struct SampleExpenses;

impl SampleExpenses {
    /// Food 100 on 2024-01-05, Food 50 on 2024-01-20, Transport 30 on 2024-02-01
    pub fn create(ledger: &mut Ledger) -> Result<()> {
        ledger.add(parse_date("2024-01-05"), "Food", 10000, "", None)?;
        ledger.add(parse_date("2024-01-20"), "Food", 5000, "", None)?;
        ledger.add(parse_date("2024-02-01"), "Transport", 3000, "", None)?;
        Ok(())
    }
}
