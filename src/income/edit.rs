//! Expected income edit page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    income::{
        ExpectedIncome, IncomeId, IncomePeriod, IncomeSource, create::income_form_fields,
        domain::IncomeFormData, get_expected_income, update_expected_income,
    },
    navigation::NavBar,
    user::UserID,
};

/// The state needed to edit an expected income.
#[derive(Debug, Clone)]
pub struct EditIncomeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the expected income edit page with the form pre-filled.
///
/// # Errors
///
/// Returns [Error::NotFound] if the expected income is not one of the user's
/// own.
pub async fn get_edit_income_page(
    State(state): State<EditIncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
) -> Result<Response, Error> {
    let income = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_expected_income(income_id, user_id, &connection)?
    };

    Ok(edit_income_view(&income).into_response())
}

/// Handle expected income edit form submission.
pub async fn update_income_endpoint(
    State(state): State<EditIncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
    Form(form): Form<IncomeFormData>,
) -> Response {
    let source = match IncomeSource::new(&form.source) {
        Ok(source) => source,
        Err(error) => return error.into_alert_response(),
    };

    let period = match form.period.parse::<IncomePeriod>() {
        Ok(period) => period,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_expected_income(income_id, source, form.amount, period, user_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::INCOMES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn edit_income_view(income: &ExpectedIncome) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOMES_VIEW).into_html();
    let edit_url = format_endpoint(endpoints::EDIT_INCOME_VIEW, income.id);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold md:text-2xl" { "Edit Expected Income" }

            form
                hx-post=(edit_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                (income_form_fields(
                    Some(income.source.as_ref()),
                    Some(income.amount),
                    income.period,
                ))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Expected Income" }
            }
        }
    };

    base("Edit Expected Income", &content)
}


#[cfg(test)]
mod update_income_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        endpoints,
        income::{
            IncomePeriod, IncomeSource, NewExpectedIncome, create_expected_income,
            domain::IncomeFormData,
            edit::{EditIncomeState, update_income_endpoint},
            get_expected_income,
        },
        test_utils::{assert_hx_redirect, create_test_user, get_test_connection},
    };

    #[tokio::test]
    async fn can_update_income() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let income = create_expected_income(
            NewExpectedIncome {
                user_id: user.id,
                source: IncomeSource::new_unchecked("Salary"),
                amount: 3000.0,
                period: IncomePeriod::Monthly,
            },
            &connection,
        )
        .unwrap();
        let state = EditIncomeState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let form = IncomeFormData {
            source: "Consulting".to_owned(),
            amount: 500.0,
            period: "weekly".to_owned(),
        };

        let response = update_income_endpoint(
            State(state.clone()),
            Extension(user.id),
            Path(income.id),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::INCOMES_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_expected_income(income.id, user.id, &connection).unwrap();
        assert_eq!(updated.source.as_ref(), "Consulting");
        assert_eq!(updated.amount, 500.0);
        assert_eq!(updated.period, IncomePeriod::Weekly);
    }

    #[tokio::test]
    async fn update_missing_income_returns_not_found() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = EditIncomeState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let form = IncomeFormData {
            source: "Consulting".to_owned(),
            amount: 500.0,
            period: "weekly".to_owned(),
        };

        let response =
            update_income_endpoint(State(state), Extension(user.id), Path(999), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
