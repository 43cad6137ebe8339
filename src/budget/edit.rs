//! Budget edit page and endpoint.

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
    budget::{
        Budget, BudgetId, Period, create::budget_form_fields, domain::BudgetFormData, get_budget,
        update_budget,
    },
    category::{Category, get_visible_categories},
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    user::UserID,
};

/// The state needed to edit a budget.
#[derive(Debug, Clone)]
pub struct EditBudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the budget edit page with the form pre-filled.
///
/// # Errors
///
/// Returns [Error::NotFound] if the budget is not one of the user's own.
pub async fn get_edit_budget_page(
    State(state): State<EditBudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
) -> Result<Response, Error> {
    let (budget, categories) = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        (
            get_budget(budget_id, user_id, &connection)?,
            get_visible_categories(user_id, &connection)?,
        )
    };

    Ok(edit_budget_view(&budget, &categories).into_response())
}

/// Handle budget edit form submission.
pub async fn update_budget_endpoint(
    State(state): State<EditBudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
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

    match update_budget(
        budget_id,
        form.category_id,
        form.amount,
        period,
        user_id,
        &connection,
    ) {
        Ok(()) => (
            HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn edit_budget_view(budget: &Budget, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();
    let edit_url = format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold md:text-2xl" { "Edit Budget" }

            form
                hx-post=(edit_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                (budget_form_fields(
                    Some(budget.amount),
                    Some(budget.category_id),
                    budget.period,
                    categories,
                ))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Budget" }
            }
        }
    };

    base("Edit Budget", &content)
}

#[cfg(test)]
mod edit_budget_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        Error,
        budget::{
            NewBudget, Period, create_budget,
            edit::{EditBudgetState, get_edit_budget_page},
        },
        category::{CategoryName, CategoryType, create_category},
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html, create_test_user,
            get_test_connection, must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page_with_prefilled_form() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let category = create_category(
            CategoryName::new_unchecked("Takeaways"),
            CategoryType::Expense,
            Some(user.id),
            &connection,
        )
        .unwrap();
        let budget = create_budget(
            NewBudget {
                user_id: user.id,
                category_id: category.id,
                amount: 200.0,
                period: Period::Weekly,
            },
            &connection,
        )
        .unwrap();
        let state = EditBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_budget_page(State(state), Extension(user.id), Path(budget.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        let want_url = format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id);
        assert_hx_endpoint(&form, &want_url, "hx-post");
        assert_form_input_with_value(&form, "amount", "number", "200.00");
    }

    #[tokio::test]
    async fn cannot_edit_another_users_budget() {
        let connection = get_test_connection();
        let owner = create_test_user(&connection, "jane");
        let other = create_test_user(&connection, "joe");
        let category = create_category(
            CategoryName::new_unchecked("Takeaways"),
            CategoryType::Expense,
            Some(owner.id),
            &connection,
        )
        .unwrap();
        let budget = create_budget(
            NewBudget {
                user_id: owner.id,
                category_id: category.id,
                amount: 200.0,
                period: Period::Monthly,
            },
            &connection,
        )
        .unwrap();
        let state = EditBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = get_edit_budget_page(State(state), Extension(other.id), Path(budget.id)).await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }
}
