//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, CategoryType},
    user::UserID,
};

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category_type TEXT NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0,
            user_id INTEGER REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

/// Create a category and return it with its generated ID.
///
/// Pass `user_id` as `None` to create a shared default category. The caller
/// is responsible for checking that the user is allowed to do so.
pub fn create_category(
    name: CategoryName,
    category_type: CategoryType,
    user_id: Option<UserID>,
    connection: &Connection,
) -> Result<Category, Error> {
    let is_default = user_id.is_none();

    connection.execute(
        "INSERT INTO category (name, category_type, is_default, user_id) VALUES (?1, ?2, ?3, ?4)",
        (
            name.as_ref(),
            category_type.as_str(),
            is_default,
            user_id.map(|user_id| user_id.as_i64()),
        ),
    )?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        name,
        category_type,
        is_default,
        user_id,
    })
}

/// Retrieve a single category that is visible to `user_id`, i.e. one of their
/// own or a shared default.
///
/// # Errors
///
/// Returns [Error::NotFound] if no such category is visible to the user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, category_type, is_default, user_id FROM category
                WHERE id = :id AND (user_id = :user_id OR is_default = 1)",
        )?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve every category visible to `user_id`: their own plus the shared
/// defaults, ordered alphabetically by name.
pub fn get_visible_categories(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, category_type, is_default, user_id FROM category
                WHERE user_id = :user_id OR is_default = 1
                ORDER BY name ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Like [get_visible_categories] but filtered to one category type.
pub fn get_visible_categories_of_type(
    user_id: UserID,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, category_type, is_default, user_id FROM category
                WHERE (user_id = :user_id OR is_default = 1) AND category_type = :category_type
                ORDER BY name ASC",
        )?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":category_type": category_type.as_str(),
            },
            map_row,
        )?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Update the name and type of one of `user_id`'s own categories.
///
/// # Errors
///
/// Returns [Error::UpdateMissingCategory] if the category does not exist,
/// belongs to another user, or is a shared default.
pub fn update_category(
    category_id: CategoryId,
    name: CategoryName,
    category_type: CategoryType,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, category_type = ?2
            WHERE id = ?3 AND user_id = ?4 AND is_default = 0",
        (
            name.as_ref(),
            category_type.as_str(),
            category_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete one of `user_id`'s own categories.
///
/// # Errors
///
/// Returns [Error::DeleteMissingCategory] if the category does not exist,
/// belongs to another user, or is a shared default.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2 AND is_default = 0",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;
    let raw_type: String = row.get(2)?;
    let raw_user_id: Option<i64> = row.get(4)?;

    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        category_type: raw_type.parse().unwrap_or(CategoryType::Expense),
        is_default: row.get(3)?,
        user_id: raw_user_id.map(UserID::new),
    })
}
