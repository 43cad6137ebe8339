//! Database operations for budgets.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    budget::{Budget, BudgetId, NewBudget, Period},
    category::{CategoryId, get_category},
    transaction::round_to_cents,
    user::UserID,
};

/// Create the budget table in the database.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id)
                ON UPDATE CASCADE ON DELETE CASCADE,
            category_id INTEGER NOT NULL REFERENCES category(id)
                ON UPDATE CASCADE ON DELETE CASCADE,
            amount REAL NOT NULL,
            period TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_budget_user ON budget(user_id);",
    )?;

    Ok(())
}

/// Create a budget and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::NonPositiveAmount] if the amount is zero or negative, or
/// [Error::InvalidCategory] if the category is not visible to the user.
pub fn create_budget(new_budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    if new_budget.amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    get_category(new_budget.category_id, new_budget.user_id, connection)
        .map_err(|_| Error::InvalidCategory(Some(new_budget.category_id)))?;

    let amount = round_to_cents(new_budget.amount);

    connection.execute(
        "INSERT INTO budget (user_id, category_id, amount, period) VALUES (?1, ?2, ?3, ?4)",
        (
            new_budget.user_id.as_i64(),
            new_budget.category_id,
            amount,
            new_budget.period.as_str(),
        ),
    )?;

    Ok(Budget {
        id: connection.last_insert_rowid(),
        user_id: new_budget.user_id,
        category_id: new_budget.category_id,
        amount,
        period: new_budget.period,
    })
}

/// Retrieve one of `user_id`'s budgets by its ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if the budget does not exist or belongs to
/// another user.
pub fn get_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, amount, period FROM budget
                WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &budget_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve every budget owned by `user_id`, oldest first.
pub fn get_budgets(user_id: UserID, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, amount, period FROM budget
                WHERE user_id = :user_id
                ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Update the editable fields of one of `user_id`'s budgets.
///
/// # Errors
///
/// Returns [Error::UpdateMissingBudget] if the budget does not exist or
/// belongs to another user, [Error::NonPositiveAmount] for a non-positive
/// amount and [Error::InvalidCategory] for a category that is not visible to
/// the user.
pub fn update_budget(
    budget_id: BudgetId,
    category_id: CategoryId,
    amount: f64,
    period: Period,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    get_category(category_id, user_id, connection)
        .map_err(|_| Error::InvalidCategory(Some(category_id)))?;

    let rows_affected = connection.execute(
        "UPDATE budget SET category_id = ?1, amount = ?2, period = ?3
            WHERE id = ?4 AND user_id = ?5",
        (
            category_id,
            round_to_cents(amount),
            period.as_str(),
            budget_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBudget);
    }

    Ok(())
}

/// Delete one of `user_id`'s budgets.
///
/// # Errors
///
/// Returns [Error::DeleteMissingBudget] if the budget does not exist or
/// belongs to another user.
pub fn delete_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        (budget_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let raw_user_id: i64 = row.get(1)?;
    let raw_period: String = row.get(4)?;

    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(raw_user_id),
        category_id: row.get(2)?,
        amount: row.get(3)?,
        period: raw_period.parse().unwrap_or(Period::Monthly),
    })
}
