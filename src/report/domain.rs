//! The report domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use crate::{Error, category::CategoryType, user::UserID};

/// The ID of a report row.
pub type ReportId = i64;

/// The window a report covers, ending on the day it was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// The last 7 days.
    Weekly,
    /// The last 30 days.
    Monthly,
}

impl ReportType {
    /// The string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Weekly => "weekly",
            ReportType::Monthly => "monthly",
        }
    }

    /// How far back the report window reaches from its end date.
    pub fn window(&self) -> Duration {
        match self {
            ReportType::Weekly => Duration::days(7),
            ReportType::Monthly => Duration::days(30),
        }
    }
}

impl Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(ReportType::Weekly),
            "monthly" => Ok(ReportType::Monthly),
            other => Err(Error::InvalidReportType(other.to_owned())),
        }
    }
}

/// A snapshot of a user's income and expenses over a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// The report's ID in the application database.
    pub id: ReportId,
    /// The user the report was generated for.
    pub user_id: UserID,
    /// The window the report covers.
    pub report_type: ReportType,
    /// The first day of the window.
    pub start_date: Date,
    /// The last day of the window.
    pub end_date: Date,
    /// The sum of income-typed transactions in the window.
    pub total_income: f64,
    /// The sum of expense-typed transactions in the window.
    pub total_expense: f64,
    /// When the snapshot was generated, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Report {
    /// What was left over: income minus expenses.
    pub fn net_amount(&self) -> f64 {
        self.total_income - self.total_expense
    }
}

/// One line of a report's per-category breakdown.
///
/// The category name is a denormalized copy taken at generation time, so the
/// breakdown survives the category being renamed or deleted later.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCategoryRow {
    /// The name of the category as it was when the report was generated.
    pub category_name: String,
    /// Whether the category counted income or expenses.
    pub transaction_type: CategoryType,
    /// The summed transaction amounts for the category within the window.
    pub amount: f64,
}

/// The raw data from the report generation form.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportFormData {
    pub report_type: String,
}


#[cfg(test)]
mod report_tests {
    use time::{OffsetDateTime, macros::date};

    use crate::{
        report::{Report, ReportType},
        user::UserID,
    };

    #[test]
    fn net_amount_is_income_minus_expense() {
        let report = Report {
            id: 1,
            user_id: UserID::new(1),
            report_type: ReportType::Monthly,
            start_date: date!(2026 - 07 - 29),
            end_date: date!(2026 - 08 - 28),
            total_income: 1000.0,
            total_expense: 50.0,
            created_at: OffsetDateTime::now_utc(),
        };

        assert_eq!(report.net_amount(), 950.0);
    }
}
