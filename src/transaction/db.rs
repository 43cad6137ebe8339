//! Database operations for single transactions.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    category::{CategoryId, get_category},
    transaction::{NewTransaction, Transaction, TransactionId, round_to_cents},
    user::UserID,
};

/// Create the transaction table in the database.
///
/// The table name must be quoted since TRANSACTION is an SQL keyword.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id)
                ON UPDATE CASCADE ON DELETE CASCADE,
            amount REAL NOT NULL,
            category_id INTEGER REFERENCES category(id)
                ON UPDATE CASCADE ON DELETE SET NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date
            ON \"transaction\"(user_id, date);",
    )?;

    Ok(())
}

/// Record a new transaction, rounding the amount to two decimal places.
///
/// # Errors
///
/// Returns [Error::NonPositiveAmount] if the amount is zero or negative, or
/// [Error::InvalidCategory] if the category is not visible to the user.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if new_transaction.amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    check_category_visible(
        new_transaction.category_id,
        new_transaction.user_id,
        connection,
    )?;

    let amount = round_to_cents(new_transaction.amount);

    connection.execute(
        "INSERT INTO \"transaction\" (user_id, amount, category_id, description, date)
            VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            new_transaction.user_id.as_i64(),
            amount,
            new_transaction.category_id,
            &new_transaction.description,
            new_transaction.date,
        ),
    )?;

    Ok(Transaction {
        id: connection.last_insert_rowid(),
        user_id: new_transaction.user_id,
        amount,
        category_id: new_transaction.category_id,
        description: new_transaction.description,
        date: new_transaction.date,
    })
}

/// Retrieve one of `user_id`'s transactions by its ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction does not exist or belongs to
/// another user.
pub fn get_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, category_id, description, date
                FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &transaction_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Overwrite the editable fields of one of `user_id`'s transactions.
///
/// # Errors
///
/// Returns [Error::UpdateMissingTransaction] if the transaction does not
/// exist or belongs to another user, [Error::NonPositiveAmount] for a
/// non-positive amount and [Error::InvalidCategory] for a category that is
/// not visible to the user.
pub fn update_transaction(
    transaction_id: TransactionId,
    amount: f64,
    category_id: Option<CategoryId>,
    description: &str,
    date: Date,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    check_category_visible(category_id, user_id, connection)?;

    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
            SET amount = ?1, category_id = ?2, description = ?3, date = ?4
            WHERE id = ?5 AND user_id = ?6",
        (
            round_to_cents(amount),
            category_id,
            description,
            date,
            transaction_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete one of `user_id`'s transactions.
///
/// # Errors
///
/// Returns [Error::DeleteMissingTransaction] if the transaction does not
/// exist or belongs to another user.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (transaction_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

fn check_category_visible(
    category_id: Option<CategoryId>,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    if let Some(category_id) = category_id {
        get_category(category_id, user_id, connection)
            .map_err(|_| Error::InvalidCategory(Some(category_id)))?;
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_user_id: i64 = row.get(1)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(raw_user_id),
        amount: row.get(2)?,
        category_id: row.get(3)?,
        description: row.get(4)?,
        date: row.get(5)?,
    })
}
