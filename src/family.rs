//! Family groups that let several users share budget visibility.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, user::UserID};

/// The ID of a family row.
pub type FamilyId = i64;

/// A group of users that pool their finances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    /// The family's ID in the application database.
    pub id: FamilyId,
    /// A display name such as "The Smiths".
    pub name: String,
    /// When the family was created, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Create the family table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_family_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS family (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create a family and make `head` its family head.
///
/// The head's account is switched to the family account type as part of
/// joining.
pub fn create_family(name: &str, head: UserID, connection: &Connection) -> Result<Family, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO family (name, created_at) VALUES (?1, ?2)",
        (name, created_at),
    )?;

    let id = connection.last_insert_rowid();

    connection.execute(
        "UPDATE user SET family_id = ?1, is_family_head = 1, user_type = 'family' WHERE id = ?2",
        (id, head.as_i64()),
    )?;

    Ok(Family {
        id,
        name: name.to_owned(),
        created_at,
    })
}

/// Get the family with an ID equal to `family_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such family.
pub fn get_family(family_id: FamilyId, connection: &Connection) -> Result<Family, Error> {
    connection
        .prepare("SELECT id, name, created_at FROM family WHERE id = :id")?
        .query_row(&[(":id", &family_id)], map_row)
        .map_err(|error| error.into())
}

/// The usernames of everyone in `family_id`, ordered by username.
pub fn get_member_names(family_id: FamilyId, connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare("SELECT username FROM user WHERE family_id = :id ORDER BY username ASC")?
        .query_map(&[(":id", &family_id)], |row| row.get(0))?
        .map(|maybe_name| maybe_name.map_err(|error| error.into()))
        .collect()
}

fn map_row(row: &Row) -> Result<Family, rusqlite::Error> {
    Ok(Family {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}
