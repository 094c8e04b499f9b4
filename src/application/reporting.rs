use serde::{Deserialize, Serialize};

use crate::domain::{Bucket, CategoryFilter, Cents, sum_cents};

use super::Ledger;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketReport {
    pub bucket: Bucket,
    /// `None` when every category is included
    pub category: Option<String>,
    pub periods: Vec<PeriodTotal>,
    pub total: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub period: String,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    pub percentage: f64,
}

impl BucketReport {
    pub fn build(ledger: &Ledger, bucket: Bucket, filter: &CategoryFilter) -> Self {
        let periods: Vec<PeriodTotal> = ledger
            .aggregate_by(bucket, filter)
            .into_iter()
            .map(|(period, total)| PeriodTotal { period, total })
            .collect();
        let total = sum_cents(periods.iter().map(|p| p.total));

        let category = match filter {
            CategoryFilter::All => None,
            CategoryFilter::Only(name) => Some(name.clone()),
        };

        Self {
            bucket,
            category,
            periods,
            total,
        }
    }
}

impl CategoryReport {
    pub fn build(ledger: &Ledger) -> Self {
        let totals = ledger.aggregate_by_category();
        let total = sum_cents(totals.iter().map(|t| t.total));

        let categories = totals
            .into_iter()
            .map(|t| CategorySummary {
                percentage: if total > 0 {
                    t.total as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
                category: t.category,
                total: t.total,
                count: t.count,
            })
            .collect();

        Self { categories, total }
    }
}
