//! The page describing how to reset a forgotten password.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::html::{FORM_CONTAINER_STYLE, base};

/// Renders a page describing how the user's password can be reset.
///
/// Password resets go through the `reset_password` CLI on the server, so this
/// page only points the user at an administrator.
pub async fn get_forgot_password_page() -> Response {
    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold md:text-2xl" { "Forgot your password?" }
            p class="text-justify"
            {
                "Ask the person running this server to reset your password. \
                They can do this by running the 'reset_password' program in \
                the directory the server runs from and pointing it at the \
                database file."
            }
        }
    };

    base("Forgot Password", &content).into_response()
}

#[cfg(test)]
mod forgot_password_tests {
    use axum::http::StatusCode;

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::get_forgot_password_page;

    #[tokio::test]
    async fn page_renders() {
        let response = get_forgot_password_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
    }
}
