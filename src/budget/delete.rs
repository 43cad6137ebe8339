//! Budget delete endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{BudgetId, delete_budget},
    endpoints,
    user::UserID,
};

/// The state needed to delete a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete one of the user's budgets and redirect to the budgets view.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_budget(budget_id, user_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod delete_budget_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        Error,
        budget::{
            NewBudget, Period, create_budget,
            delete::{DeleteBudgetState, delete_budget_endpoint},
            get_budget,
        },
        category::{CategoryName, CategoryType, create_category},
        endpoints,
        test_utils::{assert_hx_redirect, create_test_user, get_test_connection},
    };

    #[tokio::test]
    async fn can_delete_budget() {
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
                period: Period::Monthly,
            },
            &connection,
        )
        .unwrap();
        let state = DeleteBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            delete_budget_endpoint(State(state.clone()), Extension(user.id), Path(budget.id))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::BUDGETS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let result = get_budget(budget.id, user.id, &connection);
        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn delete_missing_budget_returns_not_found() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = DeleteBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_budget_endpoint(State(state), Extension(user.id), Path(999))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
