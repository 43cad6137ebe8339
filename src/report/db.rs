//! Report generation and queries.

use rusqlite::{Connection, Row, named_params};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    category::CategoryType,
    report::{Report, ReportCategoryRow, ReportId, ReportType},
    transaction::query::{sum_by_category, sum_by_type},
    user::UserID,
};

/// Create the report and report category tables.
pub fn create_report_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS report (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id)
                ON UPDATE CASCADE ON DELETE CASCADE,
            report_type TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            total_income REAL NOT NULL,
            total_expense REAL NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS report_category (
            id INTEGER PRIMARY KEY,
            report_id INTEGER NOT NULL REFERENCES report(id) ON DELETE CASCADE,
            category_name TEXT NOT NULL,
            transaction_type TEXT NOT NULL,
            amount REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_report_user ON report(user_id);",
    )?;

    Ok(())
}

/// Generate and store a report for the window ending on `today`.
///
/// The snapshot totals come from the typed sums, so uncategorized
/// transactions contribute to neither total nor to the breakdown rows.
/// Generating again for the same window inserts a new report rather than
/// touching an existing one. The inserts are independent writes; there is no
/// rollback if a breakdown row fails partway.
pub fn generate(
    user_id: UserID,
    report_type: ReportType,
    today: Date,
    connection: &Connection,
) -> Result<Report, Error> {
    let end_date = today;
    let start_date = today - report_type.window();

    let total_income = sum_by_type(
        user_id,
        start_date,
        end_date,
        CategoryType::Income,
        connection,
    )?;
    let total_expense = sum_by_type(
        user_id,
        start_date,
        end_date,
        CategoryType::Expense,
        connection,
    )?;
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO report
            (user_id, report_type, start_date, end_date, total_income, total_expense, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            user_id.as_i64(),
            report_type.as_str(),
            start_date,
            end_date,
            total_income,
            total_expense,
            created_at,
        ),
    )?;

    let report_id = connection.last_insert_rowid();

    let mut insert_row = connection.prepare(
        "INSERT INTO report_category (report_id, category_name, transaction_type, amount)
            VALUES (?1, ?2, ?3, ?4)",
    )?;

    for (category_name, transaction_type, amount) in
        sum_by_category(user_id, start_date, end_date, connection)?
    {
        insert_row.execute((report_id, category_name, transaction_type.as_str(), amount))?;
    }

    Ok(Report {
        id: report_id,
        user_id,
        report_type,
        start_date,
        end_date,
        total_income,
        total_expense,
        created_at,
    })
}

const REPORT_COLUMNS: &str =
    "id, user_id, report_type, start_date, end_date, total_income, total_expense, created_at";

/// Retrieve one of `user_id`'s reports by its ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if the report does not exist or belongs to
/// another user.
pub fn get_report(
    report_id: ReportId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Report, Error> {
    connection
        .prepare(&format!(
            "SELECT {REPORT_COLUMNS} FROM report WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            named_params! {
                ":id": report_id,
                ":user_id": user_id.as_i64(),
            },
            map_report_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve every report generated for `user_id`, newest first.
pub fn get_reports(user_id: UserID, connection: &Connection) -> Result<Vec<Report>, Error> {
    connection
        .prepare(&format!(
            "SELECT {REPORT_COLUMNS} FROM report WHERE user_id = :user_id
                ORDER BY created_at DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_report_row)?
        .map(|maybe_report| maybe_report.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the per-category breakdown of a report, largest amount first.
pub fn get_report_categories(
    report_id: ReportId,
    connection: &Connection,
) -> Result<Vec<ReportCategoryRow>, Error> {
    connection
        .prepare(
            "SELECT category_name, transaction_type, amount FROM report_category
                WHERE report_id = :report_id
                ORDER BY amount DESC",
        )?
        .query_map(&[(":report_id", &report_id)], map_category_row)?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

fn map_report_row(row: &Row) -> Result<Report, rusqlite::Error> {
    let raw_type: String = row.get(2)?;

    Ok(Report {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        report_type: raw_type.parse().unwrap_or(ReportType::Weekly),
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        total_income: row.get(5)?,
        total_expense: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_category_row(row: &Row) -> Result<ReportCategoryRow, rusqlite::Error> {
    let raw_type: String = row.get(1)?;

    Ok(ReportCategoryRow {
        category_name: row.get(0)?,
        transaction_type: raw_type.parse().unwrap_or(CategoryType::Expense),
        amount: row.get(2)?,
    })
}

#[cfg(test)]
mod report_db_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{Category, CategoryName, CategoryType, create_category},
        report::{ReportType, generate, get_report, get_report_categories, get_reports},
        test_utils::{create_test_user, get_test_connection},
        transaction::{NewTransaction, create_transaction},
        user::User,
    };

    fn seed(connection: &Connection) -> (User, Category, Category) {
        let user = create_test_user(connection, "jane");
        let salary = create_category(
            CategoryName::new_unchecked("Wages"),
            CategoryType::Income,
            Some(user.id),
            connection,
        )
        .unwrap();
        let food = create_category(
            CategoryName::new_unchecked("Takeaways"),
            CategoryType::Expense,
            Some(user.id),
            connection,
        )
        .unwrap();

        (user, salary, food)
    }

    fn insert(
        connection: &Connection,
        user: &User,
        amount: f64,
        category_id: Option<i64>,
        date: time::Date,
    ) {
        create_transaction(
            NewTransaction {
                user_id: user.id,
                amount,
                category_id,
                description: "".to_owned(),
                date,
            },
            connection,
        )
        .unwrap();
    }

    #[test]
    fn monthly_report_snapshots_totals_and_breakdown() {
        let connection = get_test_connection();
        let (user, salary, food) = seed(&connection);
        insert(&connection, &user, 1000.0, Some(salary.id), date!(2026 - 08 - 10));
        insert(&connection, &user, 50.0, Some(food.id), date!(2026 - 08 - 11));

        let report = generate(user.id, ReportType::Monthly, date!(2026 - 08 - 28), &connection)
            .unwrap();

        assert_eq!(report.total_income, 1000.0);
        assert_eq!(report.total_expense, 50.0);
        assert_eq!(report.net_amount(), 950.0);
        assert_eq!(report.start_date, date!(2026 - 07 - 29));
        assert_eq!(report.end_date, date!(2026 - 08 - 28));

        let rows = get_report_categories(report.id, &connection).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category_name, "Wages");
        assert_eq!(rows[0].transaction_type, CategoryType::Income);
        assert_eq!(rows[0].amount, 1000.0);
        assert_eq!(rows[1].category_name, "Takeaways");
        assert_eq!(rows[1].amount, 50.0);
    }

    #[test]
    fn weekly_report_excludes_older_transactions() {
        let connection = get_test_connection();
        let (user, _, food) = seed(&connection);
        insert(&connection, &user, 10.0, Some(food.id), date!(2026 - 08 - 27));
        insert(&connection, &user, 99.0, Some(food.id), date!(2026 - 08 - 01));

        let report =
            generate(user.id, ReportType::Weekly, date!(2026 - 08 - 28), &connection).unwrap();

        assert_eq!(report.total_expense, 10.0);
        assert_eq!(report.start_date, date!(2026 - 08 - 21));
    }

    #[test]
    fn uncategorized_transactions_are_excluded() {
        let connection = get_test_connection();
        let (user, _, _) = seed(&connection);
        insert(&connection, &user, 500.0, None, date!(2026 - 08 - 27));

        let report =
            generate(user.id, ReportType::Weekly, date!(2026 - 08 - 28), &connection).unwrap();

        assert_eq!(report.total_income, 0.0);
        assert_eq!(report.total_expense, 0.0);
        assert!(get_report_categories(report.id, &connection).unwrap().is_empty());
    }

    #[test]
    fn regenerating_inserts_a_new_snapshot() {
        let connection = get_test_connection();
        let (user, _, _) = seed(&connection);

        let first =
            generate(user.id, ReportType::Weekly, date!(2026 - 08 - 28), &connection).unwrap();
        let second =
            generate(user.id, ReportType::Weekly, date!(2026 - 08 - 28), &connection).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(get_reports(user.id, &connection).unwrap().len(), 2);
    }

    #[test]
    fn get_report_round_trips() {
        let connection = get_test_connection();
        let (user, _, _) = seed(&connection);

        let generated =
            generate(user.id, ReportType::Monthly, date!(2026 - 08 - 28), &connection).unwrap();

        let selected = get_report(generated.id, user.id, &connection).unwrap();
        assert_eq!(selected.id, generated.id);
        assert_eq!(selected.report_type, ReportType::Monthly);
        assert_eq!(selected.start_date, generated.start_date);
        assert_eq!(selected.end_date, generated.end_date);
        assert_eq!(selected.total_income, generated.total_income);
        assert_eq!(selected.total_expense, generated.total_expense);
    }

    #[test]
    fn cannot_read_another_users_report() {
        let connection = get_test_connection();
        let (user, _, _) = seed(&connection);
        let other = create_test_user(&connection, "joe");

        let report =
            generate(user.id, ReportType::Weekly, date!(2026 - 08 - 28), &connection).unwrap();

        let result = get_report(report.id, other.id, &connection);
        assert_eq!(result.unwrap_err(), Error::NotFound);
        assert!(get_reports(other.id, &connection).unwrap().is_empty());
    }
}
