use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::DATE_FORMAT;

/// Time grouping used when summing expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Day,
    #[serde(rename = "week")]
    IsoWeek,
    Month,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Day => "day",
            Bucket::IsoWeek => "week",
            Bucket::Month => "month",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "day" | "daily" => Some(Bucket::Day),
            "week" | "weekly" | "isoweek" | "iso-week" => Some(Bucket::IsoWeek),
            "month" | "monthly" => Some(Bucket::Month),
            _ => None,
        }
    }

    /// Column header used when grouped totals are exported.
    pub fn column_label(&self) -> &'static str {
        match self {
            Bucket::Day => "Date",
            Bucket::IsoWeek => "Week",
            Bucket::Month => "Month",
        }
    }

    /// Grouping key for a date.
    ///
    /// Weeks follow ISO-8601: week 1 is the one holding the year's first
    /// Thursday, so late-December dates can land in the next ISO year.
    pub fn key(&self, date: NaiveDate) -> String {
        match self {
            Bucket::Day => date.format(DATE_FORMAT).to_string(),
            Bucket::IsoWeek => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Bucket::Month => format!("{}-{:02}", date.year(), date.month()),
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_bucket_roundtrip() {
        for bucket in [Bucket::Day, Bucket::IsoWeek, Bucket::Month] {
            assert_eq!(Bucket::from_str(bucket.as_str()), Some(bucket));
        }
        assert_eq!(Bucket::from_str("Monthly"), Some(Bucket::Month));
        assert_eq!(Bucket::from_str("fortnight"), None);
    }

    #[test]
    fn test_day_and_month_keys() {
        assert_eq!(Bucket::Day.key(date("2024-01-05")), "2024-01-05");
        assert_eq!(Bucket::Month.key(date("2024-01-05")), "2024-01");
        assert_eq!(Bucket::Month.key(date("2024-11-30")), "2024-11");
    }

    #[test]
    fn test_iso_week_crosses_into_next_year() {
        // Monday 2024-12-30 shares its week with Thursday 2025-01-02
        assert_eq!(Bucket::IsoWeek.key(date("2024-12-30")), "2025-W01");
        assert_eq!(Bucket::IsoWeek.key(date("2024-12-29")), "2024-W52");
    }

    #[test]
    fn test_iso_week_belongs_to_previous_year() {
        // Friday 2021-01-01 falls in the last ISO week of 2020
        assert_eq!(Bucket::IsoWeek.key(date("2021-01-01")), "2020-W53");
        assert_eq!(Bucket::IsoWeek.key(date("2024-01-08")), "2024-W02");
    }
}
