//! The `/api/transactions` endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    api::{ApiResult, ApiState},
    category::{CategoryId, CategoryType},
    dashboard::{MonthStats, get_month_stats},
    timezone::today_in,
    transaction::{
        NewTransaction, Transaction, TransactionId, create_transaction, delete_transaction,
        get_transaction, update_transaction,
        query::{CategoryTotal, TransactionFilter, TransactionListItem, get_transactions,
            top_expense_categories},
    },
    user::UserID,
};

const SUMMARY_CATEGORY_COUNT: u64 = 5;

/// The query string filters accepted by the transaction listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionQuery {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub category: Option<CategoryId>,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// The body for creating or updating a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionBody {
    pub amount: f64,
    pub date: Date,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// Month-to-date stats plus the heaviest expense categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    #[serde(flatten)]
    pub stats: MonthStats,
    pub top_expense_categories: Vec<CategoryTotal>,
}

/// Handle GET requests listing the user's transactions, with optional
/// date, category and type filters.
pub async fn list_transactions(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionQuery>,
) -> ApiResult<Json<Vec<TransactionListItem>>> {
    let category_type = match query.transaction_type.as_deref() {
        Some(raw) => Some(raw.parse::<CategoryType>()?),
        None => None,
    };
    let filter = TransactionFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        category_id: query.category,
        category_type,
    };

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(user_id, &filter, &connection)?;

    Ok(Json(transactions))
}

/// Handle POST requests that create a transaction.
pub async fn create_transaction_api(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Json(body): Json<TransactionBody>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(
        NewTransaction {
            user_id,
            amount: body.amount,
            category_id: body.category_id,
            description: body.description,
            date: body.date,
        },
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Handle PUT requests that update one of the user's transactions.
pub async fn update_transaction_api(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Json(body): Json<TransactionBody>,
) -> ApiResult<Json<Transaction>> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    update_transaction(
        transaction_id,
        body.amount,
        body.category_id,
        &body.description,
        body.date,
        user_id,
        &connection,
    )?;
    let transaction = get_transaction(transaction_id, user_id, &connection)?;

    Ok(Json(transaction))
}

/// Handle DELETE requests for one of the user's transactions.
pub async fn delete_transaction_api(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> ApiResult<StatusCode> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handle GET requests for the month-to-date summary.
pub async fn get_transaction_summary(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<TransactionSummary>> {
    let today = today_in(&state.local_timezone);
    let month_start = today.replace_day(1).unwrap_or(today);

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = TransactionSummary {
        stats: get_month_stats(user_id, today, &connection)?,
        top_expense_categories: top_expense_categories(
            user_id,
            month_start,
            today,
            SUMMARY_CATEGORY_COUNT,
            &connection,
        )?,
    };

    Ok(Json(summary))
}
