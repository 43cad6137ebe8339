//! Per-user notification preferences.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, user::UserID};

/// Which automated messages a user wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserPreference {
    /// Whether the scheduled job generates and emails a weekly report.
    pub receive_weekly_reports: bool,
    /// Whether the user is alerted when a budget goes over its limit.
    pub receive_budget_alerts: bool,
}

impl Default for UserPreference {
    fn default() -> Self {
        Self {
            receive_weekly_reports: true,
            receive_budget_alerts: true,
        }
    }
}

/// Create the user preference table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_preference_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user_preference (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL UNIQUE,
                receive_weekly_reports INTEGER NOT NULL DEFAULT 1,
                receive_budget_alerts INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Get the preferences for `user_id`, creating the row with the defaults when
/// the user has none yet.
pub fn get_or_create_preferences(
    user_id: UserID,
    connection: &Connection,
) -> Result<UserPreference, Error> {
    let existing = connection
        .prepare(
            "SELECT receive_weekly_reports, receive_budget_alerts
                FROM user_preference WHERE user_id = :user_id",
        )?
        .query_row(&[(":user_id", &user_id.as_i64())], map_row);

    match existing {
        Ok(preferences) => Ok(preferences),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            let defaults = UserPreference::default();

            connection.execute(
                "INSERT INTO user_preference (user_id, receive_weekly_reports, receive_budget_alerts)
                    VALUES (?1, ?2, ?3)",
                (
                    user_id.as_i64(),
                    defaults.receive_weekly_reports,
                    defaults.receive_budget_alerts,
                ),
            )?;

            Ok(defaults)
        }
        Err(error) => Err(error.into()),
    }
}

/// Overwrite the preferences for `user_id`.
///
/// Creates the row first if the user has never saved preferences.
pub fn update_preferences(
    user_id: UserID,
    preferences: UserPreference,
    connection: &Connection,
) -> Result<(), Error> {
    get_or_create_preferences(user_id, connection)?;

    connection.execute(
        "UPDATE user_preference
            SET receive_weekly_reports = ?1, receive_budget_alerts = ?2
            WHERE user_id = ?3",
        (
            preferences.receive_weekly_reports,
            preferences.receive_budget_alerts,
            user_id.as_i64(),
        ),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<UserPreference, rusqlite::Error> {
    Ok(UserPreference {
        receive_weekly_reports: row.get(0)?,
        receive_budget_alerts: row.get(1)?,
    })
}
