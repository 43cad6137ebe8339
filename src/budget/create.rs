//! Budget creation page and endpoint.

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
    budget::{NewBudget, Period, create_budget, domain::BudgetFormData},
    category::{Category, get_visible_categories},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    user::UserID,
};

/// The state needed to create a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the budget creation page.
pub async fn get_new_budget_page(
    State(state): State<CreateBudgetState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let categories = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_visible_categories(user_id, &connection)?
    };

    Ok(new_budget_view(&categories).into_response())
}

/// Handle budget creation form submission.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<BudgetFormData>,
) -> Response {
    let period = match form.period.parse::<Period>() {
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

    let new_budget = NewBudget {
        user_id,
        category_id: form.category_id,
        amount: form.amount,
        period,
    };

    match create_budget(new_budget, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

pub(super) fn budget_form_fields(
    amount: Option<f64>,
    category_id: Option<i64>,
    period: Period,
    categories: &[Category],
) -> Markup {
    let amount_str = amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }
            select name="category_id" id="category_id" required class=(FORM_SELECT_STYLE)
            {
                @for category in categories {
                    option
                        value=(category.id)
                        selected[Some(category.id) == category_id]
                        { (category.name) }
                }
            }
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
                @for choice in [Period::Daily, Period::Weekly, Period::Monthly] {
                    option value=(choice) selected[choice == period] { (choice) }
                }
            }
        }
    }
}

fn new_budget_view(categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold md:text-2xl" { "New Budget" }

            form
                hx-post=(endpoints::NEW_BUDGET_VIEW)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                (budget_form_fields(None, None, Period::Monthly, categories))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Budget" }
            }
        }
    };

    base("New Budget", &content)
}

#[cfg(test)]
mod new_budget_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};

    use crate::{
        budget::create::{CreateBudgetState, get_new_budget_page},
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            create_test_user, get_test_connection, must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = CreateBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_new_budget_page(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::NEW_BUDGET_VIEW, "hx-post");
        assert_form_input(&form, "amount", "number");
        assert_form_submit_button(&form);
    }
}

#[cfg(test)]
mod create_budget_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Form, extract::State, http::StatusCode, response::IntoResponse};

    use crate::{
        budget::{
            Period,
            create::{CreateBudgetState, create_budget_endpoint},
            domain::BudgetFormData,
            get_budgets,
        },
        category::{CategoryName, CategoryType, create_category},
        endpoints,
        test_utils::{assert_hx_redirect, create_test_user, get_test_connection},
        user::UserID,
    };

    fn get_state() -> (CreateBudgetState, UserID, i64) {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let category = create_category(
            CategoryName::new_unchecked("Takeaways"),
            CategoryType::Expense,
            Some(user.id),
            &connection,
        )
        .unwrap();

        (
            CreateBudgetState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
            category.id,
        )
    }

    #[tokio::test]
    async fn can_create_budget() {
        let (state, user_id, category_id) = get_state();
        let form = BudgetFormData {
            category_id,
            amount: 200.0,
            period: "monthly".to_owned(),
        };

        let response = create_budget_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::BUDGETS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let budgets = get_budgets(user_id, &connection).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, 200.0);
        assert_eq!(budgets[0].period, Period::Monthly);
    }

    #[tokio::test]
    async fn rejects_invalid_period() {
        let (state, user_id, category_id) = get_state();
        let form = BudgetFormData {
            category_id,
            amount: 200.0,
            period: "fortnightly".to_owned(),
        };

        let response = create_budget_endpoint(State(state), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_unknown_category() {
        let (state, user_id, _) = get_state();
        let form = BudgetFormData {
            category_id: 999,
            amount: 200.0,
            period: "weekly".to_owned(),
        };

        let response = create_budget_endpoint(State(state), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
