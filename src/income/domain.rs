//! The expected income domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, user::UserID};

/// The ID of an expected income row.
pub type IncomeId = i64;

/// How often an expected income recurs.
///
/// Expected incomes recur weekly, monthly or yearly. Budgets use a different
/// set of periods, so the two do not share a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomePeriod {
    /// Once a week.
    Weekly,
    /// Once a month.
    Monthly,
    /// Once a year.
    Yearly,
}

impl IncomePeriod {
    /// The string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomePeriod::Weekly => "weekly",
            IncomePeriod::Monthly => "monthly",
            IncomePeriod::Yearly => "yearly",
        }
    }
}

impl Display for IncomePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IncomePeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(IncomePeriod::Weekly),
            "monthly" => Ok(IncomePeriod::Monthly),
            "yearly" => Ok(IncomePeriod::Yearly),
            other => Err(Error::InvalidPeriod(other.to_owned())),
        }
    }
}

/// A non-empty description of where an expected income comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSource(String);

impl IncomeSource {
    /// Create and validate an income source.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyIncomeSource] if `source` is empty or only
    /// whitespace.
    pub fn new(source: &str) -> Result<Self, Error> {
        let trimmed = source.trim();

        if trimmed.is_empty() {
            return Err(Error::EmptyIncomeSource);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Create an income source without validation, e.g. from a database row.
    pub fn new_unchecked(source: &str) -> Self {
        Self(source.to_owned())
    }
}

impl AsRef<str> for IncomeSource {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for IncomeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recurring income expectation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectedIncome {
    /// The expected income's ID in the application database.
    pub id: IncomeId,
    /// The owning user.
    pub user_id: UserID,
    /// Where the income comes from, e.g. "Salary".
    pub source: IncomeSource,
    /// The amount expected per period.
    pub amount: f64,
    /// How often the income recurs.
    pub period: IncomePeriod,
}

/// The data needed to create an expected income.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpectedIncome {
    /// The owning user.
    pub user_id: UserID,
    /// Where the income comes from.
    pub source: IncomeSource,
    /// The amount expected per period. Must be positive.
    pub amount: f64,
    /// How often the income recurs.
    pub period: IncomePeriod,
}

/// The raw data from the expected income create and edit forms.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeFormData {
    pub source: String,
    pub amount: f64,
    pub period: String,
}
