//! Database operations for expected incomes.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    income::{ExpectedIncome, IncomeId, IncomePeriod, IncomeSource, NewExpectedIncome},
    transaction::round_to_cents,
    user::UserID,
};

/// Create the expected income table in the database.
pub fn create_expected_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expected_income (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id)
                ON UPDATE CASCADE ON DELETE CASCADE,
            source TEXT NOT NULL,
            amount REAL NOT NULL,
            period TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expected_income_user ON expected_income(user_id);",
    )?;

    Ok(())
}

/// Create an expected income and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::NonPositiveAmount] if the amount is zero or negative.
pub fn create_expected_income(
    new_income: NewExpectedIncome,
    connection: &Connection,
) -> Result<ExpectedIncome, Error> {
    if new_income.amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    let amount = round_to_cents(new_income.amount);

    connection.execute(
        "INSERT INTO expected_income (user_id, source, amount, period) VALUES (?1, ?2, ?3, ?4)",
        (
            new_income.user_id.as_i64(),
            new_income.source.as_ref(),
            amount,
            new_income.period.as_str(),
        ),
    )?;

    Ok(ExpectedIncome {
        id: connection.last_insert_rowid(),
        user_id: new_income.user_id,
        source: new_income.source,
        amount,
        period: new_income.period,
    })
}

/// Retrieve one of `user_id`'s expected incomes by its ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if the expected income does not exist or
/// belongs to another user.
pub fn get_expected_income(
    income_id: IncomeId,
    user_id: UserID,
    connection: &Connection,
) -> Result<ExpectedIncome, Error> {
    connection
        .prepare(
            "SELECT id, user_id, source, amount, period FROM expected_income
                WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &income_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve every expected income owned by `user_id`, oldest first.
pub fn get_expected_incomes(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<ExpectedIncome>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, source, amount, period FROM expected_income
                WHERE user_id = :user_id
                ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_income| maybe_income.map_err(|error| error.into()))
        .collect()
}

/// Update the editable fields of one of `user_id`'s expected incomes.
///
/// # Errors
///
/// Returns [Error::UpdateMissingIncome] if the expected income does not
/// exist or belongs to another user, or [Error::NonPositiveAmount] for a
/// non-positive amount.
pub fn update_expected_income(
    income_id: IncomeId,
    source: IncomeSource,
    amount: f64,
    period: IncomePeriod,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    let rows_affected = connection.execute(
        "UPDATE expected_income SET source = ?1, amount = ?2, period = ?3
            WHERE id = ?4 AND user_id = ?5",
        (
            source.as_ref(),
            round_to_cents(amount),
            period.as_str(),
            income_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingIncome);
    }

    Ok(())
}

/// Delete one of `user_id`'s expected incomes.
///
/// # Errors
///
/// Returns [Error::DeleteMissingIncome] if the expected income does not
/// exist or belongs to another user.
pub fn delete_expected_income(
    income_id: IncomeId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expected_income WHERE id = ?1 AND user_id = ?2",
        (income_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingIncome);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<ExpectedIncome, rusqlite::Error> {
    let raw_user_id: i64 = row.get(1)?;
    let raw_source: String = row.get(2)?;
    let raw_period: String = row.get(4)?;

    Ok(ExpectedIncome {
        id: row.get(0)?,
        user_id: UserID::new(raw_user_id),
        source: IncomeSource::new_unchecked(&raw_source),
        amount: row.get(3)?,
        period: raw_period.parse().unwrap_or(IncomePeriod::Monthly),
    })
}

#[cfg(test)]
mod income_db_tests {
    use crate::{
        Error,
        income::{
            IncomePeriod, IncomeSource, NewExpectedIncome, create_expected_income,
            delete_expected_income, get_expected_income, get_expected_incomes,
            update_expected_income,
        },
        test_utils::{create_test_user, get_test_connection},
    };

    #[test]
    fn create_and_get_round_trips() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");

        let inserted = create_expected_income(
            NewExpectedIncome {
                user_id: user.id,
                source: IncomeSource::new_unchecked("Salary"),
                amount: 3000.0,
                period: IncomePeriod::Monthly,
            },
            &connection,
        )
        .unwrap();

        let selected = get_expected_income(inserted.id, user.id, &connection).unwrap();
        assert_eq!(inserted, selected);
    }

    #[test]
    fn create_rejects_non_positive_amount() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");

        let result = create_expected_income(
            NewExpectedIncome {
                user_id: user.id,
                source: IncomeSource::new_unchecked("Salary"),
                amount: -1.0,
                period: IncomePeriod::Monthly,
            },
            &connection,
        );

        assert_eq!(result.unwrap_err(), Error::NonPositiveAmount);
    }

    #[test]
    fn listing_is_scoped_to_the_user() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let other = create_test_user(&connection, "joe");
        create_expected_income(
            NewExpectedIncome {
                user_id: user.id,
                source: IncomeSource::new_unchecked("Salary"),
                amount: 3000.0,
                period: IncomePeriod::Monthly,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(get_expected_incomes(user.id, &connection).unwrap().len(), 1);
        assert!(get_expected_incomes(other.id, &connection).unwrap().is_empty());
    }

    #[test]
    fn update_changes_fields() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let income = create_expected_income(
            NewExpectedIncome {
                user_id: user.id,
                source: IncomeSource::new_unchecked("Salary"),
                amount: 3000.0,
                period: IncomePeriod::Monthly,
            },
            &connection,
        )
        .unwrap();

        update_expected_income(
            income.id,
            IncomeSource::new_unchecked("Consulting"),
            500.0,
            IncomePeriod::Weekly,
            user.id,
            &connection,
        )
        .unwrap();

        let updated = get_expected_income(income.id, user.id, &connection).unwrap();
        assert_eq!(updated.source.as_ref(), "Consulting");
        assert_eq!(updated.amount, 500.0);
        assert_eq!(updated.period, IncomePeriod::Weekly);
    }

    #[test]
    fn cannot_touch_another_users_income() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let other = create_test_user(&connection, "joe");
        let income = create_expected_income(
            NewExpectedIncome {
                user_id: user.id,
                source: IncomeSource::new_unchecked("Salary"),
                amount: 3000.0,
                period: IncomePeriod::Monthly,
            },
            &connection,
        )
        .unwrap();

        let get_result = get_expected_income(income.id, other.id, &connection);
        let update_result = update_expected_income(
            income.id,
            IncomeSource::new_unchecked("Hijack"),
            1.0,
            IncomePeriod::Weekly,
            other.id,
            &connection,
        );
        let delete_result = delete_expected_income(income.id, other.id, &connection);

        assert_eq!(get_result.unwrap_err(), Error::NotFound);
        assert_eq!(update_result.unwrap_err(), Error::UpdateMissingIncome);
        assert_eq!(delete_result.unwrap_err(), Error::DeleteMissingIncome);
    }
}
