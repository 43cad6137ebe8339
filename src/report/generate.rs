//! Report generation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE, base},
    navigation::NavBar,
    report::{ReportType, domain::ReportFormData, generate},
    timezone::today_in,
    user::UserID,
};

/// The state needed to generate a report.
#[derive(Debug, Clone)]
pub struct GenerateReportState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for GenerateReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the report generation form.
pub async fn get_generate_report_page() -> Response {
    generate_report_view().into_response()
}

/// Generate a report snapshot and redirect to its detail page.
pub async fn generate_report_endpoint(
    State(state): State<GenerateReportState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ReportFormData>,
) -> Response {
    let report_type = match form.report_type.parse::<ReportType>() {
        Ok(report_type) => report_type,
        Err(error) => return error.into_alert_response(),
    };

    let today = today_in(&state.local_timezone);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match generate(user_id, report_type, today, &connection) {
        Ok(report) => (
            HxRedirect(format_endpoint(endpoints::REPORT_DETAIL_VIEW, report.id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn generate_report_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold md:text-2xl" { "Generate Report" }

            form
                hx-post=(endpoints::GENERATE_REPORT_VIEW)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                div
                {
                    label for="report_type" class=(FORM_LABEL_STYLE) { "Report type" }
                    select name="report_type" id="report_type" class=(FORM_SELECT_STYLE)
                    {
                        @for choice in [ReportType::Weekly, ReportType::Monthly] {
                            option value=(choice) selected[choice == ReportType::Weekly] { (choice) }
                        }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Generate Report" }
            }
        }
    };

    base("Generate Report", &content)
}

#[cfg(test)]
mod generate_report_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        report::generate::get_generate_report_page,
        test_utils::{
            assert_form_submit_button, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let response = get_generate_report_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::GENERATE_REPORT_VIEW, "hx-post");
        assert_form_submit_button(&form);
    }
}

#[cfg(test)]
mod generate_report_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Form, extract::State, http::StatusCode, response::IntoResponse};

    use crate::{
        report::{
            domain::ReportFormData,
            generate::{GenerateReportState, generate_report_endpoint},
            get_reports,
        },
        test_utils::{create_test_user, get_test_connection},
        user::UserID,
    };

    fn get_state() -> (GenerateReportState, UserID) {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");

        (
            GenerateReportState {
                db_connection: Arc::new(Mutex::new(connection)),
                local_timezone: "Etc/UTC".to_owned(),
            },
            user.id,
        )
    }

    #[tokio::test]
    async fn can_generate_report() {
        let (state, user_id) = get_state();
        let form = ReportFormData {
            report_type: "weekly".to_owned(),
        };

        let response =
            generate_report_endpoint(State(state.clone()), Extension(user_id), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let reports = get_reports(user_id, &connection).unwrap();
        assert_eq!(reports.len(), 1);

        let want_location = format!("/reports/{}", reports[0].id);
        let location = response
            .headers()
            .get("HX-Redirect")
            .and_then(|value| value.to_str().ok());
        assert_eq!(location, Some(want_location.as_str()));
    }

    #[tokio::test]
    async fn rejects_invalid_report_type() {
        let (state, user_id) = get_state();
        let form = ReportFormData {
            report_type: "daily".to_owned(),
        };

        let response = generate_report_endpoint(State(state), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
