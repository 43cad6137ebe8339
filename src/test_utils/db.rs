use rusqlite::Connection;

use crate::{
    PasswordHash,
    db::initialize,
    user::{NewUser, User, create_user},
};

/// Open an in-memory database with the full application schema.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user with a fake password hash.
pub(crate) fn create_test_user(connection: &Connection, username: &str) -> User {
    create_user(
        NewUser {
            username: username.to_owned(),
            email: None,
            password_hash: PasswordHash::new_unchecked("hunter2"),
        },
        connection,
    )
    .expect("Could not create test user")
}
