use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::ExpenseRecord;

use super::{HeaderMap, RecordSchema, StoreError};

/// The expenses file. Every save truncates and rewrites it in full.
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    path: PathBuf,
    schema: RecordSchema,
}

impl ExpenseStore {
    pub fn new(path: impl Into<PathBuf>, schema: RecordSchema) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> RecordSchema {
        self.schema
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every record. A missing file is an empty ledger.
    pub fn load(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no expenses file yet, starting empty");
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)?;
        let records = read_records(file)?;
        debug!(path = %self.path.display(), count = records.len(), "loaded expenses");
        Ok(records)
    }

    /// Replace the file contents with `records`.
    pub fn save(&self, records: &[ExpenseRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        write_records(file, self.schema, records)?;
        debug!(path = %self.path.display(), count = records.len(), "saved expenses");
        Ok(())
    }
}

/// Parse delimited expense rows, taking column order from the header row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<ExpenseRecord>, StoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let header = csv_reader.headers()?.clone();
    if header.iter().all(|h| h.trim().is_empty()) {
        return Ok(Vec::new());
    }
    let columns = HeaderMap::resolve(&header)?;

    let mut records = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let row = result?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        // +2 for the header and 1-based numbering
        let line = row
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 2);
        records.push(columns.read(&row, line)?);
    }

    Ok(records)
}

/// Write a header and one row per record in the given layout.
pub fn write_records<W: Write>(
    writer: W,
    schema: RecordSchema,
    records: &[ExpenseRecord],
) -> Result<usize, StoreError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(schema.header())?;

    for record in records {
        csv_writer.write_record(schema.to_row(record))?;
    }

    csv_writer.flush()?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;

    fn record(date: &str, category: &str, amount: i64) -> ExpenseRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        ExpenseRecord::new(date, category, amount)
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let store = ExpenseStore::new(temp.path().join("expenses.csv"), RecordSchema::Typed);

        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let store = ExpenseStore::new(temp.path().join("expenses.csv"), RecordSchema::Typed);
        let records = vec![
            record("2024-01-05", "Food", 10000)
                .with_expense_type("Lunch")
                .with_description("team lunch, downtown"),
            record("2024-02-01", "Transport", 3000),
        ];

        store.save(&records).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.len(), 2);
        assert!(loaded[0].same_entry(&records[0]));
        assert!(loaded[1].same_entry(&records[1]));
    }

    #[test]
    fn test_save_truncates_previous_contents() {
        let temp = TempDir::new().unwrap();
        let store = ExpenseStore::new(temp.path().join("expenses.csv"), RecordSchema::Basic);

        store
            .save(&[record("2024-01-05", "Food", 100), record("2024-01-06", "Food", 200)])
            .unwrap();
        store.save(&[record("2024-01-07", "Food", 300)]).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "Date,Category,Amount,Description\n2024-01-07,Food,3.00,\n");
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp = TempDir::new().unwrap();
        let store = ExpenseStore::new(
            temp.path().join("nested").join("expenses.csv"),
            RecordSchema::Basic,
        );

        store.save(&[]).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_read_python_float_amounts() {
        let data = "Date,Category,Type,Amount,Description\n2024-01-05,Food,Lunch,100.0,\n";
        let records = read_records(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount_cents, 10000);
    }

    #[test]
    fn test_invalid_amount_is_fatal_with_line() {
        let data = "Date,Category,Amount,Description\n2024-01-05,Food,1,\n2024-01-06,Food,oops,\n";
        match read_records(data.as_bytes()) {
            Err(StoreError::InvalidAmount { line, value, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "oops");
            }
            other => panic!("expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let records = read_records("".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let data = "Date,Category,Amount,Description\n\n2024-01-05,Food,1,\n";
        let records = read_records(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }
}
