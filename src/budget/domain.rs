//! The budget domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, category::CategoryId, user::UserID};

/// The ID of a budget row.
pub type BudgetId = i64;

/// How often a budget resets.
///
/// The period determines the start of the date window used to compute how
/// much of the budget has been spent; the window always ends today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// The window covers just today.
    Daily,
    /// The window starts on the most recent Monday.
    Weekly,
    /// The window starts on the first of the current month.
    Monthly,
}

impl Period {
    /// The string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            other => Err(Error::InvalidPeriod(other.to_owned())),
        }
    }
}

/// A spending cap for one category over a recurring period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    /// The budget's ID in the application database.
    pub id: BudgetId,
    /// The owning user.
    pub user_id: UserID,
    /// The category the cap applies to.
    pub category_id: CategoryId,
    /// The maximum amount to spend per period.
    pub amount: f64,
    /// How often the budget resets.
    pub period: Period,
}

/// The data needed to create a budget.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// The owning user.
    pub user_id: UserID,
    /// The category the cap applies to.
    pub category_id: CategoryId,
    /// The maximum amount to spend per period. Must be positive.
    pub amount: f64,
    /// How often the budget resets.
    pub period: Period,
}

/// The raw data from the budget create and edit forms.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetFormData {
    pub category_id: CategoryId,
    pub amount: f64,
    pub period: String,
}
