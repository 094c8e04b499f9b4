use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{
    Bucket, BudgetStatus, Catalog, CatalogViolation, CategoryFilter, CategoryTotal, Cents,
    DATE_FORMAT, ExpenseRecord, MonthlyBudget, RecordId, records_in, records_on, total_amount,
    totals_by_bucket, totals_by_category,
};
use crate::storage::ExpenseStore;

use super::LedgerError;

/// Owner of the expense sequence.
///
/// Every mutation rewrites the backing file before returning, so a query made
/// right after a mutation always observes it. If the write fails the mutation
/// is undone in memory and the storage error is returned.
pub struct Ledger {
    records: Vec<ExpenseRecord>,
    store: ExpenseStore,
    catalog: Catalog,
}

impl Ledger {
    /// Load the ledger from its store. A missing file gives an empty ledger;
    /// an unreadable amount anywhere in the file fails the whole load.
    pub fn load(store: ExpenseStore, catalog: Catalog) -> Result<Self, LedgerError> {
        let records = store.load()?;
        info!(
            path = %store.path().display(),
            count = records.len(),
            "ledger loaded"
        );
        Ok(Self {
            records,
            store,
            catalog,
        })
    }

    pub fn store(&self) -> &ExpenseStore {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ExpenseRecord> {
        self.records.get(index)
    }

    /// Current position of a record in the full sequence.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    // ========================
    // Mutations
    // ========================

    /// Append an expense and persist. Returns its position.
    pub fn add(
        &mut self,
        date: NaiveDate,
        category: &str,
        amount_cents: Cents,
        description: &str,
        expense_type: Option<&str>,
    ) -> Result<usize, LedgerError> {
        if amount_cents <= 0 {
            return Err(LedgerError::InvalidAmount(amount_cents));
        }

        let expense_type = expense_type.map(str::trim).filter(|t| !t.is_empty());
        match self.catalog.check(category, expense_type) {
            Ok(()) => {}
            Err(CatalogViolation::UnknownCategory) => {
                return Err(LedgerError::UnknownCategory(category.to_string()));
            }
            Err(CatalogViolation::UnknownExpenseType) => {
                return Err(LedgerError::UnknownExpenseType {
                    category: category.to_string(),
                    expense_type: expense_type.unwrap_or_default().to_string(),
                });
            }
        }

        let mut record = ExpenseRecord::new(date, category, amount_cents).with_description(description);
        if let Some(t) = expense_type {
            record = record.with_expense_type(t);
        }

        self.records.push(record);
        if let Err(e) = self.store.save(&self.records) {
            self.records.pop();
            warn!(error = %e, "failed to persist new expense, rolled back");
            return Err(e.into());
        }

        let index = self.records.len() - 1;
        info!(index, date = %self.records[index].date, category, amount_cents, "expense added");
        Ok(index)
    }

    /// Remove the record at `index` in the full sequence and persist.
    pub fn remove(&mut self, index: usize) -> Result<ExpenseRecord, LedgerError> {
        if index >= self.records.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }

        let removed = self.records.remove(index);
        if let Err(e) = self.store.save(&self.records) {
            self.records.insert(index, removed);
            warn!(error = %e, "failed to persist removal, rolled back");
            return Err(e.into());
        }

        info!(index, date = %removed.date, category = %removed.category, "expense removed");
        Ok(removed)
    }

    /// Remove a record by identity. Safe to use from filtered views.
    pub fn remove_by_id(&mut self, id: RecordId) -> Result<ExpenseRecord, LedgerError> {
        let index = self.position(id).ok_or(LedgerError::RecordNotFound(id))?;
        self.remove(index)
    }

    // ========================
    // Queries
    // ========================

    /// Sum amounts per bucket key in ascending key order. Records with
    /// unparsable dates are left out.
    pub fn aggregate_by(&self, bucket: Bucket, filter: &CategoryFilter) -> BTreeMap<String, Cents> {
        let totals = totals_by_bucket(&self.records, bucket, filter);
        debug!(%bucket, buckets = totals.len(), "aggregated");
        totals
    }

    /// Sum amounts per category in first-seen order.
    pub fn aggregate_by_category(&self) -> Vec<CategoryTotal> {
        totals_by_category(&self.records)
    }

    pub fn filter_by_date(&self, date: NaiveDate) -> Vec<&ExpenseRecord> {
        records_on(&self.records, date)
    }

    pub fn filter_by_category(&self, category: &str) -> Vec<&ExpenseRecord> {
        records_in(&self.records, category)
    }

    /// Sum of every amount in the ledger.
    pub fn total(&self) -> Cents {
        total_amount(&self.records)
    }

    /// Spending in one calendar month.
    pub fn month_total(&self, year: i32, month: u32, filter: &CategoryFilter) -> Cents {
        let key = format!("{}-{:02}", year, month);
        self.aggregate_by(Bucket::Month, filter)
            .get(&key)
            .copied()
            .unwrap_or(0)
    }

    /// Spending in the budget's month compared with its target.
    pub fn budget_status(&self, budget: &MonthlyBudget) -> BudgetStatus {
        let spent = self.month_total(budget.year, budget.month_number(), &CategoryFilter::All);
        BudgetStatus::compute(budget.clone(), spent)
    }
}

/// Parse a `YYYY-MM-DD` date supplied by a caller.
pub fn parse_date(input: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDate(input.to_string()))
}
