//! The `/api/budgets` endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    Error,
    api::{ApiResult, ApiState},
    budget::{
        Budget, BudgetId, NewBudget, Period, create_budget, delete_budget, get_budget,
        get_budgets, update_budget,
        progress::{BudgetProgress, get_budget_progress},
    },
    category::CategoryId,
    timezone::today_in,
    user::UserID,
};

/// The body for creating or updating a budget.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetBody {
    pub category_id: CategoryId,
    pub amount: f64,
    /// "weekly" or "monthly".
    pub period: String,
}

/// Handle GET requests listing the user's budgets.
pub async fn list_budgets(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<Vec<Budget>>> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let budgets = get_budgets(user_id, &connection)?;

    Ok(Json(budgets))
}

/// Handle POST requests that create a budget.
pub async fn create_budget_api(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Json(body): Json<BudgetBody>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    let period = body.period.parse::<Period>()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let budget = create_budget(
        NewBudget {
            user_id,
            category_id: body.category_id,
            amount: body.amount,
            period,
        },
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(budget)))
}

/// Handle PUT requests that update one of the user's budgets.
pub async fn update_budget_api(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
    Json(body): Json<BudgetBody>,
) -> ApiResult<Json<Budget>> {
    let period = body.period.parse::<Period>()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    update_budget(
        budget_id,
        body.category_id,
        body.amount,
        period,
        user_id,
        &connection,
    )?;
    let budget = get_budget(budget_id, user_id, &connection)?;

    Ok(Json(budget))
}

/// Handle DELETE requests for one of the user's budgets.
pub async fn delete_budget_api(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
) -> ApiResult<StatusCode> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_budget(budget_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handle GET requests for every budget with its derived progress.
pub async fn list_budget_progress(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<Vec<BudgetProgress>>> {
    let today = today_in(&state.local_timezone);

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let progress = get_budget_progress(user_id, today, &connection)?;

    Ok(Json(progress))
}
