//! Spendtrack is a multi-tenant web app for tracking personal income and
//! expenses, with per-category budgets, expected income projections and
//! periodic spending reports.
//!
//! This library serves HTML pages directly and exposes the same data through
//! a JSON API under `/api`.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod api;
mod app_state;
mod auth;
mod budget;
mod category;
mod currency;
mod dashboard;
mod db;
mod email;
mod endpoints;
mod family;
mod html;
mod income;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod notification;
mod notifier;
mod pagination;
mod password;
mod preferences;
mod report;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;
mod timezone;
mod user;

pub use app_state::AppState;
pub use currency::Currency;
pub use db::initialize as initialize_db;
pub use email::{Email, LogMailer, Mailer};
pub use logging::logging_middleware;
pub use notifier::run_weekly_report_job;
pub use pagination::PaginationConfig;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{
    NewUser, User, UserID, create_user, get_user_by_id, get_user_by_username, update_password,
};

use crate::{
    alert::AlertView,
    category::CategoryId,
    internal_server_error::{InternalServerErrorPage, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid username/password combination.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// The auth token in the cookie could not be parsed.
    #[error("could not parse auth token: {0}")]
    InvalidAuthToken(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used to create a username.
    #[error("Username cannot be empty")]
    EmptyUsername,

    /// The username used at registration is already taken.
    #[error("the username is already taken")]
    DuplicateUsername,

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used as an expected income source.
    #[error("Income source cannot be empty")]
    EmptyIncomeSource,

    /// An empty string was used to create a family name.
    #[error("Family name cannot be empty")]
    EmptyFamilyName,

    /// The category ID on a transaction or budget did not match a category
    /// visible to the user.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(Option<CategoryId>),

    /// A non-staff user tried to create a shared default category.
    #[error("only staff may create default categories")]
    DefaultCategoryForbidden,

    /// A string could not be parsed as a category type.
    #[error("{0:?} is not a valid category type, expected 'income' or 'expense'")]
    InvalidCategoryType(String),

    /// A string could not be parsed as a budget or income period.
    #[error("{0:?} is not a valid period")]
    InvalidPeriod(String),

    /// A string could not be parsed as a report type.
    #[error("{0:?} is not a valid report type, expected 'weekly' or 'monthly'")]
    InvalidReportType(String),

    /// A string could not be parsed as a user account type.
    #[error("{0:?} is not a valid account type, expected 'individual' or 'family'")]
    InvalidUserType(String),

    /// A string could not be parsed as a supported currency code.
    #[error("{0:?} is not a supported currency")]
    InvalidCurrency(String),

    /// An amount was zero or negative where a positive amount is required.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Detail lookups are scoped by the owning user, so this error is also
    /// returned for rows owned by somebody else.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// A summary email could not be handed to the mailer.
    #[error("could not send email: {0}")]
    EmailSendError(String),

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// Tried to update an expected income that does not exist
    #[error("tried to update an expected income that is not in the database")]
    UpdateMissingIncome,

    /// Tried to delete an expected income that does not exist
    #[error("tried to delete an expected income that is not in the database")]
    DeleteMissingIncome,

    /// Tried to modify a notification that does not exist
    #[error("tried to modify a notification that is not in the database")]
    MissingNotification,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezone(timezone) => {
                render_internal_server_error(InternalServerErrorPage {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings \
                        and ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidCategory(category_id) => AlertView::error(
                "Invalid category",
                &format!("Could not find a category with the ID {category_id:?}"),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::DefaultCategoryForbidden => AlertView::error(
                "Not allowed",
                "Only staff accounts may create shared default categories.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::EmptyCategoryName => {
                AlertView::error("Invalid name", "The category name cannot be empty.")
                    .into_response_with_status(StatusCode::BAD_REQUEST)
            }
            Error::InvalidCategoryType(category_type) => AlertView::error(
                "Invalid category type",
                &format!("{category_type:?} is not a valid category type."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::EmptyIncomeSource => {
                AlertView::error("Invalid source", "The income source cannot be empty.")
                    .into_response_with_status(StatusCode::BAD_REQUEST)
            }
            Error::InvalidPeriod(period) => AlertView::error(
                "Invalid period",
                &format!("{period:?} is not a valid period."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidReportType(report_type) => AlertView::error(
                "Invalid report type",
                &format!("{report_type:?} is not a valid report type."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidUserType(user_type) => AlertView::error(
                "Invalid account type",
                &format!("{user_type:?} is not a valid account type."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidCurrency(currency) => AlertView::error(
                "Invalid currency",
                &format!("{currency:?} is not a supported currency."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NonPositiveAmount => {
                AlertView::error("Invalid amount", "The amount must be greater than zero.")
                    .into_response_with_status(StatusCode::BAD_REQUEST)
            }
            Error::UpdateMissingTransaction => AlertView::error(
                "Could not update transaction",
                "The transaction could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingTransaction => AlertView::error(
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::UpdateMissingCategory => AlertView::error(
                "Could not update category",
                "The category could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingCategory => AlertView::error(
                "Could not delete category",
                "The category could not be found. \
                Try refreshing the page to see if the category has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::UpdateMissingBudget => AlertView::error(
                "Could not update budget",
                "The budget could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingBudget => AlertView::error(
                "Could not delete budget",
                "The budget could not be found. \
                Try refreshing the page to see if the budget has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::UpdateMissingIncome => AlertView::error(
                "Could not update expected income",
                "The expected income could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingIncome => AlertView::error(
                "Could not delete expected income",
                "The expected income could not be found. \
                Try refreshing the page to see if it has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            _ => AlertView::error(
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            )
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
