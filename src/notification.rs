//! In-app notifications and the notification list page.
//!
//! Notifications are created by the weekly report job and read from the
//! account pages. Actions (mark read, mark all read, delete) are plain links
//! with query parameters that redirect back to the list.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::html;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error, endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    user::UserID,
};

/// How a notification is styled in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Neutral information, e.g. a weekly report being ready.
    Info,
    /// Something good happened.
    Success,
    /// The user should take a look, e.g. a budget nearing its limit.
    Warning,
    /// Something needs attention now.
    Danger,
}

impl NotificationType {
    fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Info => "info",
            NotificationType::Success => "success",
            NotificationType::Warning => "warning",
            NotificationType::Danger => "danger",
        }
    }

    fn from_db(raw: &str) -> Self {
        match raw {
            "success" => NotificationType::Success,
            "warning" => NotificationType::Warning,
            "danger" => NotificationType::Danger,
            _ => NotificationType::Info,
        }
    }
}

/// A message shown on the notifications page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// The notification's ID in the application database.
    pub id: i64,
    /// The user the notification belongs to.
    pub user_id: UserID,
    /// A short heading.
    pub title: String,
    /// The full message body.
    pub message: String,
    /// How the notification is styled.
    pub notification_type: NotificationType,
    /// Whether the user has seen the notification.
    pub is_read: bool,
    /// When the notification was created, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Create the notification table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_notification_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS notification (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                message TEXT NOT NULL,
                notification_type TEXT NOT NULL DEFAULT 'info',
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Create an unread notification for `user_id`.
pub fn create_notification(
    user_id: UserID,
    title: &str,
    message: &str,
    notification_type: NotificationType,
    connection: &Connection,
) -> Result<Notification, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO notification (user_id, title, message, notification_type, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            user_id.as_i64(),
            title,
            message,
            notification_type.as_str(),
            created_at,
        ),
    )?;

    Ok(Notification {
        id: connection.last_insert_rowid(),
        user_id,
        title: title.to_owned(),
        message: message.to_owned(),
        notification_type,
        is_read: false,
        created_at,
    })
}

/// Get every notification for `user_id`, newest first.
pub fn get_notifications(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Notification>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, message, notification_type, is_read, created_at
                FROM notification WHERE user_id = :user_id
                ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_notification| maybe_notification.map_err(|error| error.into()))
        .collect()
}

/// Count the unread notifications for `user_id`.
pub fn count_unread(user_id: UserID, connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM notification WHERE user_id = :user_id AND is_read = 0",
            &[(":user_id", &user_id.as_i64())],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Mark one of `user_id`'s notifications as read.
///
/// # Errors
///
/// Returns [Error::MissingNotification] if the notification does not exist or
/// belongs to another user.
pub fn mark_read(
    notification_id: i64,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE notification SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
        (notification_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::MissingNotification);
    }

    Ok(())
}

/// Mark every notification for `user_id` as read.
pub fn mark_all_read(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "UPDATE notification SET is_read = 1 WHERE user_id = ?1",
        [user_id.as_i64()],
    )?;

    Ok(())
}

/// Delete one of `user_id`'s notifications.
///
/// # Errors
///
/// Returns [Error::MissingNotification] if the notification does not exist or
/// belongs to another user.
pub fn delete_notification(
    notification_id: i64,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM notification WHERE id = ?1 AND user_id = ?2",
        (notification_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::MissingNotification);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Notification, rusqlite::Error> {
    let raw_type: String = row.get(4)?;

    Ok(Notification {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        title: row.get(2)?,
        message: row.get(3)?,
        notification_type: NotificationType::from_db(&raw_type),
        is_read: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// The state needed for the notifications page.
#[derive(Debug, Clone)]
pub struct NotificationState {
    /// The database connection for reading and updating notifications.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NotificationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Actions carried on the notification list URL as query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationActions {
    /// Mark one notification as read.
    pub mark_read: Option<i64>,
    /// Mark every notification as read.
    pub mark_all_read: Option<bool>,
    /// Delete one notification.
    pub delete: Option<i64>,
}

/// Route handler for the notification list page.
///
/// When an action query parameter is present, the action is applied and the
/// client redirected back to the plain list URL.
pub async fn get_notifications_page(
    State(state): State<NotificationState>,
    Extension(user_id): Extension<UserID>,
    Query(actions): Query<NotificationActions>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    if let Some(notification_id) = actions.mark_read {
        mark_read(notification_id, user_id, &connection)?;
        return Ok(Redirect::to(endpoints::NOTIFICATIONS_VIEW).into_response());
    }

    if actions.mark_all_read == Some(true) {
        mark_all_read(user_id, &connection)?;
        return Ok(Redirect::to(endpoints::NOTIFICATIONS_VIEW).into_response());
    }

    if let Some(notification_id) = actions.delete {
        delete_notification(notification_id, user_id, &connection)?;
        return Ok(Redirect::to(endpoints::NOTIFICATIONS_VIEW).into_response());
    }

    let notifications = get_notifications(user_id, &connection)?;

    Ok(render_notifications_page(&notifications).into_response())
}

fn badge_style(notification_type: NotificationType) -> &'static str {
    match notification_type {
        NotificationType::Info => "bg-blue-100 text-blue-800",
        NotificationType::Success => "bg-green-100 text-green-800",
        NotificationType::Warning => "bg-yellow-100 text-yellow-800",
        NotificationType::Danger => "bg-red-100 text-red-800",
    }
}

fn render_notifications_page(notifications: &[Notification]) -> maud::Markup {
    let nav_bar = NavBar::new(endpoints::NOTIFICATIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex justify-between items-center py-4"
            {
                h1 class="text-3xl font-bold" { "Notifications" }
                a class=(LINK_STYLE)
                    href={(endpoints::NOTIFICATIONS_VIEW) "?mark_all_read=true"}
                    { "Mark all as read" }
            }

            @if notifications.is_empty() {
                p { "You have no notifications." }
            }

            @for notification in notifications {
                div class={(CARD_STYLE) @if !notification.is_read { " border-l-4 border-blue-500" }}
                {
                    div class="flex justify-between items-center"
                    {
                        span class={"px-2 py-1 rounded text-xs font-medium " (badge_style(notification.notification_type))}
                            { (notification.notification_type.as_str()) }
                        span class="text-sm text-gray-500"
                            { (notification.created_at.date()) }
                    }
                    h2 class="text-lg font-semibold" { (notification.title) }
                    p { (notification.message) }
                    div class="flex gap-4 pt-2"
                    {
                        @if !notification.is_read {
                            a class=(LINK_STYLE)
                                href={(endpoints::NOTIFICATIONS_VIEW) "?mark_read=" (notification.id)}
                                { "Mark as read" }
                        }
                        a class=(LINK_STYLE)
                            href={(endpoints::NOTIFICATIONS_VIEW) "?delete=" (notification.id)}
                            { "Delete" }
                    }
                }
            }
        }
    };

    base("Notifications", &content)
}


#[cfg(test)]
mod notification_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, middleware, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        notification::{
            NotificationState, NotificationType, create_notification, get_notifications,
            get_notifications_page,
        },
        test_utils::create_test_user,
        user::UserID,
    };

    fn get_test_server() -> (TestServer, Arc<Mutex<Connection>>, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_test_user(&connection, "jane");
        let user_id = user.id;

        let db_connection = Arc::new(Mutex::new(connection));
        let state = NotificationState {
            db_connection: db_connection.clone(),
        };

        let app = Router::new()
            .route(endpoints::NOTIFICATIONS_VIEW, get(get_notifications_page))
            .layer(middleware::from_fn(
                move |mut request: axum::extract::Request, next: axum::middleware::Next| async move {
                    request.extensions_mut().insert(user_id);
                    next.run(request).await
                },
            ))
            .with_state(state);

        (
            TestServer::new(app),
            db_connection,
            user_id,
        )
    }

    #[tokio::test]
    async fn page_lists_notifications() {
        let (server, db_connection, user_id) = get_test_server();
        {
            let connection = db_connection.lock().unwrap();
            create_notification(
                user_id,
                "Weekly Report Ready",
                "Your report is ready.",
                NotificationType::Info,
                &connection,
            )
            .unwrap();
        }

        let response = server.get(endpoints::NOTIFICATIONS_VIEW).await;

        response.assert_status_ok();
        assert!(response.text().contains("Weekly Report Ready"));
    }

    #[tokio::test]
    async fn mark_read_action_redirects_back() {
        let (server, db_connection, user_id) = get_test_server();
        let notification_id = {
            let connection = db_connection.lock().unwrap();
            create_notification(user_id, "hi", "", NotificationType::Info, &connection)
                .unwrap()
                .id
        };

        let response = server
            .get(endpoints::NOTIFICATIONS_VIEW)
            .add_query_param("mark_read", notification_id)
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::NOTIFICATIONS_VIEW);

        let connection = db_connection.lock().unwrap();
        let notifications = get_notifications(user_id, &connection).unwrap();
        assert!(notifications[0].is_read);
    }

    #[tokio::test]
    async fn delete_action_removes_the_row() {
        let (server, db_connection, user_id) = get_test_server();
        let notification_id = {
            let connection = db_connection.lock().unwrap();
            create_notification(user_id, "hi", "", NotificationType::Info, &connection)
                .unwrap()
                .id
        };

        server
            .get(endpoints::NOTIFICATIONS_VIEW)
            .add_query_param("delete", notification_id)
            .await
            .assert_status_see_other();

        let connection = db_connection.lock().unwrap();
        assert!(get_notifications(user_id, &connection).unwrap().is_empty());
    }
}
