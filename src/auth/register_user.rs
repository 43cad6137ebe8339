//! The registration page and handler for creating new accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{invalidate_auth_cookie, set_auth_cookie},
    email::Email,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        log_in_register},
    password::{PasswordHash, ValidatedPassword},
    timezone::get_local_offset,
    user::{NewUser, create_user},
};

/// Which form field an error message belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ErrorField {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

fn register_form(
    username: &str,
    email: &str,
    error: Option<(ErrorField, &str)>,
) -> Markup {
    let error_for = |field: ErrorField| -> Option<&str> {
        error.and_then(|(error_field, message)| (error_field == field).then_some(message))
    };
    let error_paragraph = |field: ErrorField| -> Markup {
        html! {
            @if let Some(message) = error_for(field) {
                p class="text-red-500 text-base" { (message) }
            }
        }
    };

    html! {
        form hx-post=(endpoints::USERS) class="space-y-4"
        {
            div
            {
                label for="username" class=(FORM_LABEL_STYLE) { "Username" }
                input
                    type="text" name="username" id="username" required
                    value=(username) class=(FORM_TEXT_INPUT_STYLE);
                (error_paragraph(ErrorField::Username))
            }

            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email (optional)" }
                input
                    type="email" name="email" id="email"
                    value=(email) class=(FORM_TEXT_INPUT_STYLE);
                (error_paragraph(ErrorField::Email))
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password" }
                input
                    type="password" name="password" id="password" required
                    class=(FORM_TEXT_INPUT_STYLE);
                (error_paragraph(ErrorField::Password))
            }

            div
            {
                label for="confirm_password" class=(FORM_LABEL_STYLE) { "Confirm password" }
                input
                    type="password" name="confirm_password" id="confirm_password" required
                    class=(FORM_TEXT_INPUT_STYLE);
                (error_paragraph(ErrorField::ConfirmPassword))
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Register" }

            p class="text-sm font-light text-gray-500"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) class=(LINK_STYLE) { "Log in here" }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = register_form("", "", None);
    let content = log_in_register("Create an account", &form);
    base("Register", &content).into_response()
}

/// The state needed to register a new user.
#[derive(Debug, Clone)]
pub struct RegisterState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Africa/Nairobi".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegisterState> for Key {
    fn from_ref(state: &RegisterState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered into the registration form.
#[derive(Clone, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Handler for registration requests via the POST method.
///
/// On success, a new user is created, the auth cookie is set, and the client
/// is redirected to the dashboard. On a validation error the form is returned
/// with an error message next to the offending field.
pub async fn post_register_user(
    State(state): State<RegisterState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.confirm_password {
        return register_form(
            &form.username,
            &form.email,
            Some((ErrorField::ConfirmPassword, "Passwords do not match.")),
        )
        .into_response();
    }

    let email = if form.email.trim().is_empty() {
        None
    } else {
        match Email::new(form.email.trim()) {
            Ok(email) => Some(email),
            Err(_) => {
                return register_form(
                    &form.username,
                    &form.email,
                    Some((ErrorField::Email, "Enter a valid email address.")),
                )
                .into_response();
            }
        }
    };

    let validated_password = match ValidatedPassword::new(&form.password) {
        Ok(password) => password,
        Err(Error::TooWeak(feedback)) => {
            return register_form(
                &form.username,
                &form.email,
                Some((ErrorField::Password, feedback.as_str())),
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while validating password: {error}");
            return Error::HashingError(error.to_string()).into_response();
        }
    };

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("Error hashing password: {error}");
            return error.into_response();
        }
    };

    let created = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        create_user(
            NewUser {
                username: form.username.trim().to_owned(),
                email,
                password_hash,
            },
            &connection,
        )
    };

    let user = match created {
        Ok(user) => user,
        Err(Error::EmptyUsername) => {
            return register_form(
                &form.username,
                &form.email,
                Some((ErrorField::Username, "Enter a username.")),
            )
            .into_response();
        }
        Err(Error::DuplicateUsername) => {
            return register_form(
                &form.username,
                &form.email,
                Some((ErrorField::Username, "That username is already taken.")),
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Error creating user: {error}");
            return error.into_response();
        }
    };

    let local_offset = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => return Error::InvalidTimezone(state.local_timezone).into_response(),
    };

    set_auth_cookie(jar.clone(), user.id, state.cookie_duration, local_offset)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
        })
        .into_response()
}


#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_extra::extract::cookie::Key;
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use sha2::{Digest, Sha512};

    use crate::{
        auth::cookie::DEFAULT_COOKIE_DURATION,
        db::initialize,
        endpoints,
        user::get_user_by_username,
    };

    use super::{RegisterState, post_register_user};

    fn get_test_server() -> (TestServer, Arc<Mutex<Connection>>) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let db_connection = Arc::new(Mutex::new(connection));

        let state = RegisterState {
            cookie_key: Key::from(&Sha512::digest("foobar")),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: db_connection.clone(),
        };

        let app = Router::new()
            .route(endpoints::USERS, post(post_register_user))
            .with_state(state);

        (
            TestServer::new(app),
            db_connection,
        )
    }

    #[tokio::test]
    async fn register_creates_user_and_redirects() {
        let (server, db_connection) = get_test_server();
        let form = [
            ("username", "jane"),
            ("email", "jane@example.com"),
            ("password", "averystrongpassword1"),
            ("confirm_password", "averystrongpassword1"),
        ];

        let response = server.post(endpoints::USERS).form(&form).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(HX_REDIRECT), endpoints::DASHBOARD_VIEW);

        let connection = db_connection.lock().unwrap();
        let user = get_user_by_username("jane", &connection).unwrap();
        assert!(user.password_hash.verify("averystrongpassword1").unwrap());
    }

    #[tokio::test]
    async fn register_rejects_mismatched_passwords() {
        let (server, _) = get_test_server();
        let form = [
            ("username", "jane"),
            ("email", ""),
            ("password", "averystrongpassword1"),
            ("confirm_password", "somethingelseentirely"),
        ];

        let response = server.post(endpoints::USERS).form(&form).await;

        response.assert_status_ok();
        assert!(response.text().contains("Passwords do not match."));
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let (server, _) = get_test_server();
        let form = [
            ("username", "jane"),
            ("email", ""),
            ("password", "password"),
            ("confirm_password", "password"),
        ];

        let response = server.post(endpoints::USERS).form(&form).await;

        response.assert_status_ok();
        let selector = scraper::Selector::parse("p.text-red-500").unwrap();
        let document = scraper::Html::parse_fragment(&response.text());
        assert!(document.select(&selector).next().is_some());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let (server, _) = get_test_server();
        let form = [
            ("username", "jane"),
            ("email", ""),
            ("password", "averystrongpassword1"),
            ("confirm_password", "averystrongpassword1"),
        ];
        server
            .post(endpoints::USERS)
            .form(&form)
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let response = server.post(endpoints::USERS).form(&form).await;

        response.assert_status_ok();
        assert!(response.text().contains("already taken"));
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() {
        let (server, _) = get_test_server();
        let form = [
            ("username", "jane"),
            ("email", "not-an-email"),
            ("password", "averystrongpassword1"),
            ("confirm_password", "averystrongpassword1"),
        ];

        let response = server.post(endpoints::USERS).form(&form).await;

        response.assert_status_ok();
        assert!(response.text().contains("valid email"));
    }
}
