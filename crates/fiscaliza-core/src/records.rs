//! Expense, vote and proposition records produced by the source connectors.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One reimbursement line for a legislator, before persistence assigns it
/// an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExpense {
    pub politician_id: i64,
    pub year: i32,
    /// 1–12.
    pub month: i32,
    pub category: String,
    pub description: Option<String>,
    pub value: Decimal,
    pub date: NaiveDate,
}

/// One recorded floor vote by one legislator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVote {
    pub politician_id: i64,
    /// `"unknown"` when the source omits it.
    pub proposition_id: String,
    pub proposition_title: String,
    /// Free-text label such as `"Sim"`, `"Não"` or `"Não registrado"`.
    pub vote: String,
    pub date: NaiveDate,
}

/// A bill, amendment or provisional measure under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    pub id: String,
    /// Type code: `PL`, `PEC`, `MP`, ...
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
    pub year: i32,
    pub summary: String,
    pub author: String,
    pub status: String,
    pub date: NaiveDate,
}

/// Optional month/year constraint for expense-derived views.
///
/// Both fields `None` means "all time".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    pub month: Option<i32>,
    pub year: Option<i32>,
}

impl PeriodFilter {
    #[must_use]
    pub fn all_time() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn matches(&self, year: i32, month: i32) -> bool {
        self.month.is_none_or(|m| m == month) && self.year.is_none_or(|y| y == year)
    }

    #[must_use]
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        #[allow(clippy::cast_possible_wrap)]
        let month = date.month() as i32;
        self.matches(date.year(), month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_time_matches_everything() {
        let filter = PeriodFilter::all_time();
        assert!(filter.matches(2019, 1));
        assert!(filter.matches(2025, 12));
    }

    #[test]
    fn month_and_year_must_both_match() {
        let filter = PeriodFilter {
            month: Some(3),
            year: Some(2025),
        };
        assert!(filter.matches(2025, 3));
        assert!(!filter.matches(2024, 3));
        assert!(!filter.matches(2025, 4));
    }

    #[test]
    fn month_only_matches_across_years() {
        let filter = PeriodFilter {
            month: Some(7),
            year: None,
        };
        assert!(filter.matches(2023, 7));
        assert!(filter.matches(2025, 7));
    }

    #[test]
    fn matches_date_uses_calendar_fields() {
        let filter = PeriodFilter {
            month: Some(2),
            year: Some(2024),
        };
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date");
        assert!(filter.matches_date(date));
    }

    #[test]
    fn proposition_serializes_kind_as_type() {
        let prop = Proposition {
            id: "2345678".to_string(),
            kind: "PEC".to_string(),
            number: "45".to_string(),
            year: 2025,
            summary: "Altera o sistema tributário".to_string(),
            author: "Câmara dos Deputados".to_string(),
            status: "Em tramitação".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 2).expect("valid date"),
        };
        let json = serde_json::to_value(&prop).expect("serialize");
        assert_eq!(json["type"], "PEC");
    }
}
