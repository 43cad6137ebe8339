//! Code for creating the user table and fetching and updating users.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Currency, Error, PasswordHash, email::Email, family::FamilyId};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether an account tracks an individual or a whole family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// A single-person account.
    Individual,
    /// An account that belongs to a family group.
    Family,
}

impl UserType {
    /// The string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Individual => "individual",
            UserType::Family => "family",
        }
    }
}

impl Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(UserType::Individual),
            "family" => Ok(UserType::Family),
            other => Err(Error::InvalidUserType(other.to_owned())),
        }
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with.
    pub username: String,
    /// Where weekly report summaries are sent. Optional.
    pub email: Option<Email>,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// The currency all of the user's amounts are displayed and stored in.
    pub currency: Currency,
    /// Whether this is an individual or family account.
    pub user_type: UserType,
    /// Staff users may create shared default categories.
    pub is_staff: bool,
    /// Whether the user is the designated head of their family.
    pub is_family_head: bool,
    /// The family the user belongs to, if any.
    pub family_id: Option<FamilyId>,
}

/// The fields needed to register a new user.
///
/// New users start as non-staff individual accounts with USD amounts.
pub struct NewUser {
    pub username: String,
    pub email: Option<Email>,
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT,
                password TEXT NOT NULL,
                currency TEXT NOT NULL DEFAULT 'USD',
                user_type TEXT NOT NULL DEFAULT 'individual',
                is_staff INTEGER NOT NULL DEFAULT 0,
                is_family_head INTEGER NOT NULL DEFAULT 0,
                family_id INTEGER REFERENCES family(id) ON DELETE SET NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::EmptyUsername] if the username is blank,
/// [Error::DuplicateUsername] if the username is taken, or [Error::SqlError]
/// if another SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    if new_user.username.trim().is_empty() {
        return Err(Error::EmptyUsername);
    }

    connection.execute(
        "INSERT INTO user (username, email, password) VALUES (?1, ?2, ?3)",
        (
            &new_user.username,
            new_user.email.as_ref().map(|email| email.to_string()),
            new_user.password_hash.as_ref(),
        ),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username: new_user.username,
        email: new_user.email,
        password_hash: new_user.password_hash,
        currency: Currency::Usd,
        user_type: UserType::Individual,
        is_staff: false,
        is_family_head: false,
        family_id: None,
    })
}

const USER_COLUMNS: &str =
    "id, username, email, password, currency, user_type, is_staff, is_family_head, family_id";

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the database.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user from the database with a username equal to `username`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the username does not belong to a registered
/// user, or [Error::SqlError] if there was an error accessing the database.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "SELECT {USER_COLUMNS} FROM user WHERE username = :username"
        ))?
        .query_row(&[(":username", &username)], map_row)
        .map_err(|error| error.into())
}

/// Get every user in the application, ordered by ID.
///
/// Used by the weekly report job to iterate all users.
pub fn get_all_users(connection: &Connection) -> Result<Vec<User>, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user ORDER BY id ASC"))?
        .query_map([], map_row)?
        .map(|maybe_user| maybe_user.map_err(|error| error.into()))
        .collect()
}

/// Update a user's email, currency and account type.
///
/// Currency conversion of the user's amounts is handled separately by
/// [crate::currency::convert_user_amounts]; this function only rewrites the
/// profile row.
pub fn update_profile(
    user_id: UserID,
    email: Option<&Email>,
    currency: Currency,
    user_type: UserType,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET email = ?1, currency = ?2, user_type = ?3 WHERE id = ?4",
        (
            email.map(|email| email.to_string()),
            currency.code(),
            user_type.as_str(),
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Replace a user's password hash. Used by the password reset CLI.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Put `user_id` into `family_id`, optionally as the family head.
pub fn set_family(
    user_id: UserID,
    family_id: FamilyId,
    is_family_head: bool,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET family_id = ?1, is_family_head = ?2 WHERE id = ?3",
        (family_id, is_family_head, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: Option<String> = row.get(2)?;
    let raw_password: String = row.get(3)?;
    let raw_currency: String = row.get(4)?;
    let raw_user_type: String = row.get(5)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        username: row.get(1)?,
        email: raw_email.map(Email::new_unchecked),
        password_hash: PasswordHash::new_unchecked(&raw_password),
        currency: raw_currency.parse().unwrap_or(Currency::Usd),
        user_type: raw_user_type.parse().unwrap_or(UserType::Individual),
        is_staff: row.get(6)?,
        is_family_head: row.get(7)?,
        family_id: row.get(8)?,
    })
}
