//! Aggregation and list queries over the transaction ledger.
//!
//! These queries power the transactions page, the dashboard, budget progress
//! and report generation. Sums that filter by category type join through the
//! category table, so uncategorized transactions never contribute to them.

use rusqlite::{Connection, Row, named_params};
use time::Date;

use crate::{
    Error,
    category::{CategoryId, CategoryType},
    transaction::TransactionId,
    user::UserID,
};

/// Optional filters applied to a transaction listing.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Keep transactions dated on or after this date.
    pub start_date: Option<Date>,
    /// Keep transactions dated on or before this date.
    pub end_date: Option<Date>,
    /// Keep transactions filed under this category.
    pub category_id: Option<CategoryId>,
    /// Keep transactions whose category has this type.
    pub category_type: Option<CategoryType>,
}

/// A transaction joined with its category for display.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TransactionListItem {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The category the transaction is filed under, if any.
    pub category_id: Option<CategoryId>,
    /// The name of the category, if any.
    pub category_name: Option<String>,
    /// The type of the category. `None` for uncategorized transactions.
    pub transaction_type: Option<CategoryType>,
}

const LIST_ITEM_QUERY: &str = "SELECT \"transaction\".id, amount, date, description, \
        category_id, category.name, category.category_type \
    FROM \"transaction\" \
    LEFT JOIN category ON \"transaction\".category_id = category.id \
    WHERE \"transaction\".user_id = :user_id \
        AND (:start_date IS NULL OR date >= :start_date) \
        AND (:end_date IS NULL OR date <= :end_date) \
        AND (:category_id IS NULL OR category_id = :category_id) \
        AND (:category_type IS NULL OR category.category_type = :category_type)";

/// Retrieve the filtered transactions of `user_id`, newest first.
pub fn get_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<TransactionListItem>, Error> {
    // Sort by date, and then ID to keep transaction order stable after updates
    let query = format!("{LIST_ITEM_QUERY} ORDER BY date DESC, \"transaction\".id DESC");

    connection
        .prepare(&query)?
        .query_map(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":start_date": filter.start_date,
                ":end_date": filter.end_date,
                ":category_id": filter.category_id,
                ":category_type": filter.category_type.map(|type_| type_.as_str()),
            },
            map_list_item,
        )?
        .map(|maybe_item| maybe_item.map_err(|error| error.into()))
        .collect()
}

/// Retrieve one page of `user_id`'s transactions, newest first.
pub fn get_transaction_page(
    user_id: UserID,
    page_size: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<TransactionListItem>, Error> {
    let query =
        format!("{LIST_ITEM_QUERY} ORDER BY date DESC, \"transaction\".id DESC LIMIT :limit OFFSET :offset");

    connection
        .prepare(&query)?
        .query_map(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":start_date": None::<Date>,
                ":end_date": None::<Date>,
                ":category_id": None::<CategoryId>,
                ":category_type": None::<&str>,
                // SQLite has no unsigned integer type, so bind as i64.
                ":limit": page_size as i64,
                ":offset": offset as i64,
            },
            map_list_item,
        )?
        .map(|maybe_item| maybe_item.map_err(|error| error.into()))
        .collect()
}

/// The most recent transactions of `user_id`, up to `limit` of them.
pub fn get_recent_transactions(
    user_id: UserID,
    limit: u64,
    connection: &Connection,
) -> Result<Vec<TransactionListItem>, Error> {
    get_transaction_page(user_id, limit, 0, connection)
}

/// Count the transactions owned by `user_id`.
pub fn count_transactions(user_id: UserID, connection: &Connection) -> Result<u64, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1",
        [user_id.as_i64()],
        |row| row.get(0),
    )?;

    Ok(count as u64)
}

/// Sum the amounts of `user_id`'s transactions whose category has
/// `category_type`, dated within the inclusive window `[start, end]`.
///
/// Uncategorized transactions have no type and are never included.
pub fn sum_by_type(
    user_id: UserID,
    start: Date,
    end: Date,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM \"transaction\" \
                JOIN category ON \"transaction\".category_id = category.id \
                WHERE \"transaction\".user_id = :user_id \
                    AND category.category_type = :category_type \
                    AND date BETWEEN :start AND :end",
            named_params! {
                ":user_id": user_id.as_i64(),
                ":category_type": category_type.as_str(),
                ":start": start,
                ":end": end,
            },
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Sum the amounts of `user_id`'s transactions filed under `category_id`
/// within the inclusive window `[start, end]`.
pub fn sum_for_category(
    user_id: UserID,
    category_id: CategoryId,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM \"transaction\" \
                WHERE user_id = :user_id AND category_id = :category_id \
                    AND date BETWEEN :start AND :end",
            named_params! {
                ":user_id": user_id.as_i64(),
                ":category_id": category_id,
                ":start": start,
                ":end": end,
            },
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// A (category name, total amount) pair from a grouped sum.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategoryTotal {
    /// The name of the category.
    pub category_name: String,
    /// The summed transaction amounts for the category.
    pub amount: f64,
}

/// The expense categories `user_id` spent the most on within `[start, end]`,
/// largest first, up to `limit` of them.
pub fn top_expense_categories(
    user_id: UserID,
    start: Date,
    end: Date,
    limit: u64,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT category.name, SUM(amount) AS total FROM \"transaction\" \
                JOIN category ON \"transaction\".category_id = category.id \
                WHERE \"transaction\".user_id = :user_id \
                    AND category.category_type = 'expense' \
                    AND date BETWEEN :start AND :end \
                GROUP BY category.name \
                ORDER BY total DESC \
                LIMIT :limit",
            )?
        .query_map(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":start": start,
                ":end": end,
                ":limit": limit as i64,
            },
            |row| {
                Ok(CategoryTotal {
                    category_name: row.get(0)?,
                    amount: row.get(1)?,
                })
            },
        )?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

/// Sum `user_id`'s transactions within `[start, end]` grouped by
/// (category name, category type), largest first. Only categorized
/// transactions appear; this feeds the denormalized report rows.
pub fn sum_by_category(
    user_id: UserID,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<(String, CategoryType, f64)>, Error> {
    connection
        .prepare(
            "SELECT category.name, category.category_type, SUM(amount) AS total \
                FROM \"transaction\" \
                JOIN category ON \"transaction\".category_id = category.id \
                WHERE \"transaction\".user_id = :user_id \
                    AND date BETWEEN :start AND :end \
                GROUP BY category.name, category.category_type \
                ORDER BY total DESC",
        )?
        .query_map(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":start": start,
                ":end": end,
            },
            |row| {
                let raw_type: String = row.get(1)?;

                Ok((
                    row.get::<usize, String>(0)?,
                    raw_type.parse().unwrap_or(CategoryType::Expense),
                    row.get::<usize, f64>(2)?,
                ))
            },
        )?
        .map(|maybe_group| maybe_group.map_err(|error| error.into()))
        .collect()
}

fn map_list_item(row: &Row) -> Result<TransactionListItem, rusqlite::Error> {
    let raw_type: Option<String> = row.get(6)?;

    Ok(TransactionListItem {
        id: row.get(0)?,
        amount: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        category_id: row.get(4)?,
        category_name: row.get(5)?,
        transaction_type: raw_type.and_then(|type_| type_.parse().ok()),
    })
}
