use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Bucket, CategoryFilter, Cents, DATE_FORMAT, ExpenseRecord};

/// Total spent in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Cents,
    pub count: usize,
}

/// Sum amounts per bucket key, optionally restricted to one category.
/// Records whose date does not parse are skipped.
pub fn totals_by_bucket(
    records: &[ExpenseRecord],
    bucket: Bucket,
    filter: &CategoryFilter,
) -> BTreeMap<String, Cents> {
    let mut totals: BTreeMap<String, Cents> = BTreeMap::new();

    for record in records.iter().filter(|r| filter.matches(&r.category)) {
        let Some(date) = record.parsed_date() else {
            debug!(date = %record.date, "skipping record with unparsable date");
            continue;
        };
        let total = totals.entry(bucket.key(date)).or_insert(0);
        *total = total.saturating_add(record.amount_cents);
    }

    totals
}

/// Sum amounts per category, in the order categories first appear.
pub fn totals_by_category(records: &[ExpenseRecord]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for record in records {
        match totals.iter_mut().find(|t| t.category == record.category) {
            Some(entry) => {
                entry.total = entry.total.saturating_add(record.amount_cents);
                entry.count += 1;
            }
            None => totals.push(CategoryTotal {
                category: record.category.clone(),
                total: record.amount_cents,
                count: 1,
            }),
        }
    }

    totals
}

/// Sum of every record's amount, dated or not.
pub fn total_amount(records: &[ExpenseRecord]) -> Cents {
    sum_cents(records.iter().map(|r| r.amount_cents))
}

/// Sum amounts, pinning at `Cents::MAX` / `Cents::MIN` instead of wrapping.
pub fn sum_cents(amounts: impl IntoIterator<Item = Cents>) -> Cents {
    amounts.into_iter().fold(0, Cents::saturating_add)
}

/// Records logged on `date`, in ledger order.
pub fn records_on(records: &[ExpenseRecord], date: NaiveDate) -> Vec<&ExpenseRecord> {
    let wanted = date.format(DATE_FORMAT).to_string();
    records
        .iter()
        .filter(|r| r.date.trim() == wanted)
        .collect()
}

/// Records in `category`, in ledger order.
pub fn records_in<'a>(records: &'a [ExpenseRecord], category: &str) -> Vec<&'a ExpenseRecord> {
    records.iter().filter(|r| r.category == category).collect()
}
