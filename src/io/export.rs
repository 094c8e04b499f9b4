use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::application::Ledger;
use crate::domain::{Bucket, CategoryFilter, ExpenseRecord, format_cents};
use crate::storage::write_records;

/// Turns ledger contents into downloadable delimited text.
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Every record, in the same layout as the expenses file.
    pub fn export_records_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let schema = self.ledger.store().schema();
        Ok(write_records(writer, schema, self.ledger.records())?)
    }

    /// Only the records matching `filter`, in store layout.
    pub fn export_filtered_csv<W: Write>(&self, filter: &CategoryFilter, writer: W) -> Result<usize> {
        let records: Vec<ExpenseRecord> = self
            .ledger
            .records()
            .iter()
            .filter(|r| filter.matches(&r.category))
            .cloned()
            .collect();
        Ok(write_records(writer, self.ledger.store().schema(), &records)?)
    }

    /// Per-period totals: `Date|Week|Month,Amount`.
    pub fn export_buckets_csv<W: Write>(
        &self,
        bucket: Bucket,
        filter: &CategoryFilter,
        writer: W,
    ) -> Result<usize> {
        let totals = self.ledger.aggregate_by(bucket, filter);
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([bucket.column_label(), "Amount"])?;
        for (period, total) in &totals {
            csv_writer.write_record([period.as_str(), format_cents(*total).as_str()])?;
        }

        csv_writer.flush()?;
        Ok(totals.len())
    }

    /// Per-category totals: `Category,Amount`.
    pub fn export_categories_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let totals = self.ledger.aggregate_by_category();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["Category", "Amount"])?;
        for entry in &totals {
            csv_writer.write_record([entry.category.as_str(), format_cents(entry.total).as_str()])?;
        }

        csv_writer.flush()?;
        Ok(totals.len())
    }
}

/// Pretty JSON for any report.
pub fn export_json<T: Serialize, W: Write>(report: &T, mut writer: W) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
