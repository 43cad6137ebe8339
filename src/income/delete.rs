//! Expected income delete endpoint.

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
    endpoints,
    income::{IncomeId, delete_expected_income},
    user::UserID,
};

/// The state needed to delete an expected income.
#[derive(Debug, Clone)]
pub struct DeleteIncomeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete one of the user's expected incomes and redirect to the incomes view.
pub async fn delete_income_endpoint(
    State(state): State<DeleteIncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expected_income(income_id, user_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::INCOMES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod delete_income_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        Error, endpoints,
        income::{
            IncomePeriod, IncomeSource, NewExpectedIncome, create_expected_income,
            delete::{DeleteIncomeState, delete_income_endpoint},
            get_expected_income,
        },
        test_utils::{assert_hx_redirect, create_test_user, get_test_connection},
    };

    #[tokio::test]
    async fn can_delete_income() {
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
        let state = DeleteIncomeState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            delete_income_endpoint(State(state.clone()), Extension(user.id), Path(income.id))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::INCOMES_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let result = get_expected_income(income.id, user.id, &connection);
        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn delete_missing_income_returns_not_found() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = DeleteIncomeState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_income_endpoint(State(state), Extension(user.id), Path(999))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
