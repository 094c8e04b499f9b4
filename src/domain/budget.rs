use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Cents;

/// Spending target for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub month: Month,
    pub year: i32,
    pub amount_cents: Cents,
}

impl MonthlyBudget {
    pub fn new(month: Month, year: i32, amount_cents: Cents) -> Self {
        Self {
            month,
            year,
            amount_cents,
        }
    }

    /// Budget for the month containing `date`.
    pub fn for_date(date: NaiveDate, amount_cents: Cents) -> Self {
        let month = month_from_number(date.month()).unwrap_or(Month::January);
        Self::new(month, date.year(), amount_cents)
    }

    pub fn month_number(&self) -> u32 {
        self.month.number_from_month()
    }

    /// Bucket key of the budgeted month, comparable with month totals.
    pub fn month_key(&self) -> String {
        format!("{}-{:02}", self.year, self.month_number())
    }
}

/// Parse a month given as an English name ("March", "mar") or a number 1-12.
pub fn parse_month(input: &str) -> Option<Month> {
    let input = input.trim();
    if let Ok(number) = input.parse::<u32>() {
        return month_from_number(number);
    }
    input.parse::<Month>().ok()
}

pub fn month_from_number(number: u32) -> Option<Month> {
    u8::try_from(number)
        .ok()
        .and_then(|n| Month::try_from(n).ok())
}

/// Spending measured against a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget: MonthlyBudget,
    pub spent: Cents,
    /// Negative once spending passes the budget
    pub remaining: Cents,
}

impl BudgetStatus {
    pub fn compute(budget: MonthlyBudget, spent: Cents) -> Self {
        let remaining = budget.amount_cents.saturating_sub(spent);
        Self {
            budget,
            spent,
            remaining,
        }
    }

    pub fn over_budget(&self) -> bool {
        self.remaining < 0
    }

    /// Share of the budget already used, in percent.
    pub fn used_percentage(&self) -> f64 {
        if self.budget.amount_cents == 0 {
            return 0.0;
        }
        self.spent as f64 / self.budget.amount_cents as f64 * 100.0
    }
}
