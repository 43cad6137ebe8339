//! The transaction domain types.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{category::CategoryId, user::UserID};

/// The ID of a transaction row.
pub type TransactionId = i64;

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The amount is always positive; whether it counts as income or expense is
/// determined by the category it is filed under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The owning user.
    pub user_id: UserID,
    /// The amount of money spent or earned, rounded to two decimal places.
    pub amount: f64,
    /// The category the transaction is filed under. `None` when the category
    /// has been deleted or was never set.
    pub category_id: Option<CategoryId>,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
}

/// The data needed to record a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The owning user.
    pub user_id: UserID,
    /// The amount of money spent or earned. Must be positive.
    pub amount: f64,
    /// The category to file the transaction under.
    pub category_id: Option<CategoryId>,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
}

/// Round `amount` to two decimal places, the precision every stored amount
/// uses.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// The raw data from the transaction create and edit forms.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionFormData {
    pub amount: f64,
    pub date: Date,
    #[serde(default)]
    pub description: String,
    /// Empty in the form when no category is selected.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}
