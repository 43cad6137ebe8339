//! Alert fragments for displaying success and error messages to users.
//!
//! Error responses from htmx form submissions are swapped into the
//! `#alert-container` element declared in the base layout.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// An alert message with a headline and optional details.
pub struct AlertView {
    alert_type: AlertType,
    message: String,
    details: String,
}

impl AlertView {
    /// Create a new success alert
    pub fn success(message: &str, details: &str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    pub fn into_html(self) -> Markup {
        let container_style = match self.alert_type {
            AlertType::Success => {
                "p-4 mb-4 rounded-lg bg-green-50 text-green-800 \
                dark:bg-gray-800 dark:text-green-400"
            }
            AlertType::Error => {
                "p-4 mb-4 rounded-lg bg-red-50 text-red-800 \
                dark:bg-gray-800 dark:text-red-400"
            }
        };

        html! {
            div class=(container_style) role="alert"
            {
                span class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    p { (self.details) }
                }
            }
        }
    }

    /// Render the alert as an HTML fragment response with the given status.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use axum::http::StatusCode;

    use super::AlertView;

    #[test]
    fn error_alert_contains_message_and_details() {
        let markup = AlertView::error("Oh no", "something broke").into_html();
        let html = markup.into_string();

        assert!(html.contains("Oh no"));
        assert!(html.contains("something broke"));
    }

    #[test]
    fn alert_response_keeps_status() {
        let response = AlertView::error("Missing", "")
            .into_response_with_status(StatusCode::NOT_FOUND);

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
