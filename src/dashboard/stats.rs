//! Month-to-date totals with a comparison against the previous month.

use rusqlite::Connection;
use serde::Serialize;
use time::{Date, Duration};

use crate::{Error, category::CategoryType, transaction::query::sum_by_type, user::UserID};

/// The headline numbers shown on the dashboard and the profile page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthStats {
    /// Income-typed transaction total for the current month to date.
    pub income: f64,
    /// Expense-typed transaction total for the current month to date.
    pub expenses: f64,
    /// Income minus expenses for the current month to date.
    pub savings: f64,
    /// Percentage change in income compared to the whole previous month.
    pub income_change: f64,
    /// Percentage change in expenses compared to the whole previous month.
    pub expense_change: f64,
}

/// The percentage change from `previous` to `current`.
///
/// Returns 0 when `previous` is zero or negative, since a percentage against
/// nothing is meaningless.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous <= 0.0 {
        return 0.0;
    }

    (current - previous) / previous * 100.0
}

/// Compute the month-to-date stats for `user_id`.
pub fn get_month_stats(
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<MonthStats, Error> {
    let month_start = today.replace_day(1).unwrap_or(today);
    let previous_month_end = month_start - Duration::days(1);
    let previous_month_start = previous_month_end.replace_day(1).unwrap_or(previous_month_end);

    let income = sum_by_type(user_id, month_start, today, CategoryType::Income, connection)?;
    let expenses = sum_by_type(user_id, month_start, today, CategoryType::Expense, connection)?;

    let previous_income = sum_by_type(
        user_id,
        previous_month_start,
        previous_month_end,
        CategoryType::Income,
        connection,
    )?;
    let previous_expenses = sum_by_type(
        user_id,
        previous_month_start,
        previous_month_end,
        CategoryType::Expense,
        connection,
    )?;

    Ok(MonthStats {
        income,
        expenses,
        savings: income - expenses,
        income_change: percent_change(income, previous_income),
        expense_change: percent_change(expenses, previous_expenses),
    })
}
