//! Expected income creation page and endpoint.

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
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    income::{
        IncomePeriod, IncomeSource, NewExpectedIncome, create_expected_income,
        domain::IncomeFormData,
    },
    navigation::NavBar,
    user::UserID,
};

/// The state needed to create an expected income.
#[derive(Debug, Clone)]
pub struct CreateIncomeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the expected income creation page.
pub async fn get_new_income_page() -> Response {
    new_income_view().into_response()
}

/// Handle expected income creation form submission.
pub async fn create_income_endpoint(
    State(state): State<CreateIncomeState>,
    Extension(user_id): Extension<UserID>,
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

    let new_income = NewExpectedIncome {
        user_id,
        source,
        amount: form.amount,
        period,
    };

    match create_expected_income(new_income, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::INCOMES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

pub(super) fn income_form_fields(
    source: Option<&str>,
    amount: Option<f64>,
    period: IncomePeriod,
) -> Markup {
    let amount_str = amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label for="source" class=(FORM_LABEL_STYLE) { "Source" }
            input
                name="source" id="source" type="text"
                placeholder="Salary" required
                value=[source]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
            input
                name="amount" id="amount" type="number" step="0.01" min="0.01"
                placeholder="0.01" required
                value=[amount_str.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="period" class=(FORM_LABEL_STYLE) { "Period" }
            select name="period" id="period" class=(FORM_SELECT_STYLE)
            {
                @for choice in [IncomePeriod::Weekly, IncomePeriod::Monthly, IncomePeriod::Yearly] {
                    option value=(choice) selected[choice == period] { (choice) }
                }
            }
        }
    }
}

fn new_income_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOMES_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold md:text-2xl" { "New Expected Income" }

            form
                hx-post=(endpoints::NEW_INCOME_VIEW)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                (income_form_fields(None, None, IncomePeriod::Monthly))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Expected Income" }
            }
        }
    };

    base("New Expected Income", &content)
}


#[cfg(test)]
mod create_income_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Form, extract::State, http::StatusCode, response::IntoResponse};

    use crate::{
        endpoints,
        income::{
            IncomePeriod,
            create::{CreateIncomeState, create_income_endpoint},
            domain::IncomeFormData,
            get_expected_incomes,
        },
        test_utils::{assert_hx_redirect, create_test_user, get_test_connection},
        user::UserID,
    };

    fn get_state() -> (CreateIncomeState, UserID) {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");

        (
            CreateIncomeState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    #[tokio::test]
    async fn can_create_income() {
        let (state, user_id) = get_state();
        let form = IncomeFormData {
            source: "Salary".to_owned(),
            amount: 3000.0,
            period: "monthly".to_owned(),
        };

        let response = create_income_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::INCOMES_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let incomes = get_expected_incomes(user_id, &connection).unwrap();
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].source.as_ref(), "Salary");
        assert_eq!(incomes[0].amount, 3000.0);
        assert_eq!(incomes[0].period, IncomePeriod::Monthly);
    }

    #[tokio::test]
    async fn rejects_empty_source() {
        let (state, user_id) = get_state();
        let form = IncomeFormData {
            source: "   ".to_owned(),
            amount: 3000.0,
            period: "monthly".to_owned(),
        };

        let response = create_income_endpoint(State(state), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_invalid_period() {
        let (state, user_id) = get_state();
        let form = IncomeFormData {
            source: "Salary".to_owned(),
            amount: 3000.0,
            period: "daily".to_owned(),
        };

        let response = create_income_endpoint(State(state), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let (state, user_id) = get_state();
        let form = IncomeFormData {
            source: "Salary".to_owned(),
            amount: 0.0,
            period: "weekly".to_owned(),
        };

        let response = create_income_endpoint(State(state), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
