//! Database initialization.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, budget::create_budget_table, category::create_category_table,
    family::create_family_table, income::create_expected_income_table,
    notification::create_notification_table, preferences::create_user_preference_table,
    report::create_report_tables, transaction::create_transaction_table, user::create_user_table,
};

/// Create all application tables and seed the shared default categories.
///
/// Safe to call on every startup; tables are created with IF NOT EXISTS and
/// the seed skips names that already exist.
///
/// # Errors
///
/// This function will return an error if there was an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Must run outside the transaction below; the pragma is a no-op while a
    // transaction is open. SQLite does not enforce foreign keys without it.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_family_table(&transaction)?;
    create_user_table(&transaction)?;
    create_user_preference_table(&transaction)?;
    create_notification_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_expected_income_table(&transaction)?;
    create_report_tables(&transaction)?;

    seed_default_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// The expense categories every user sees out of the box.
const DEFAULT_EXPENSE_CATEGORIES: [&str; 8] = [
    "Food & Dining",
    "Transport",
    "Housing & Rent",
    "Utilities",
    "Healthcare",
    "Entertainment",
    "Shopping",
    "Education",
];

/// The income categories every user sees out of the box.
const DEFAULT_INCOME_CATEGORIES: [&str; 4] = ["Salary", "Business", "Investments", "Gifts"];

fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement = connection.prepare(
        "INSERT INTO category (name, category_type, is_default, user_id)
            SELECT ?1, ?2, 1, NULL
            WHERE NOT EXISTS (
                SELECT 1 FROM category WHERE name = ?1 AND is_default = 1
            )",
    )?;

    for name in DEFAULT_EXPENSE_CATEGORIES {
        statement.execute((name, "expense"))?;
    }

    for name in DEFAULT_INCOME_CATEGORIES {
        statement.execute((name, "income"))?;
    }

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();

        let default_count: i64 = connection
            .query_row(
                "SELECT COUNT(id) FROM category WHERE is_default = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(default_count, 12);
    }

    #[test]
    fn initialize_creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let table_count: i64 = connection
            .query_row(
                "SELECT COUNT(name) FROM sqlite_master
                    WHERE type = 'table' AND name IN
                    ('user', 'family', 'user_preference', 'notification', 'category',
                    'transaction', 'budget', 'expected_income', 'report', 'report_category')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(table_count, 10);
    }
}
