//! The `/api/incomes` endpoints for expected income records.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    Error,
    api::{ApiResult, ApiState},
    income::{
        ExpectedIncome, IncomeId, IncomePeriod, IncomeSource, NewExpectedIncome,
        create_expected_income, delete_expected_income, get_expected_income,
        get_expected_incomes, update_expected_income,
    },
    user::UserID,
};

/// The body for creating or updating an expected income.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeBody {
    pub source: String,
    pub amount: f64,
    /// "weekly", "monthly" or "yearly".
    pub period: String,
}

/// Handle GET requests listing the user's expected incomes.
pub async fn list_incomes(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<Vec<ExpectedIncome>>> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let incomes = get_expected_incomes(user_id, &connection)?;

    Ok(Json(incomes))
}

/// Handle POST requests that create an expected income.
pub async fn create_income_api(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Json(body): Json<IncomeBody>,
) -> ApiResult<(StatusCode, Json<ExpectedIncome>)> {
    let source = IncomeSource::new(&body.source)?;
    let period = body.period.parse::<IncomePeriod>()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let income = create_expected_income(
        NewExpectedIncome {
            user_id,
            source,
            amount: body.amount,
            period,
        },
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(income)))
}

/// Handle PUT requests that update one of the user's expected incomes.
pub async fn update_income_api(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
    Json(body): Json<IncomeBody>,
) -> ApiResult<Json<ExpectedIncome>> {
    let source = IncomeSource::new(&body.source)?;
    let period = body.period.parse::<IncomePeriod>()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    update_expected_income(income_id, source, body.amount, period, user_id, &connection)?;
    let income = get_expected_income(income_id, user_id, &connection)?;

    Ok(Json(income))
}

/// Handle DELETE requests for one of the user's expected incomes.
pub async fn delete_income_api(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
) -> ApiResult<StatusCode> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_expected_income(income_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
