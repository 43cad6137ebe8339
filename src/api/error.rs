//! Error responses for the JSON API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::Error;

/// The result type returned by the JSON API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Wraps [Error] to render it as a JSON body instead of an HTML page.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingBudget
            | Error::DeleteMissingBudget
            | Error::UpdateMissingIncome
            | Error::DeleteMissingIncome
            | Error::MissingNotification => StatusCode::NOT_FOUND,
            Error::EmptyCategoryName
            | Error::EmptyIncomeSource
            | Error::EmptyFamilyName
            | Error::EmptyUsername
            | Error::DuplicateUsername
            | Error::InvalidCategory(_)
            | Error::DefaultCategoryForbidden
            | Error::InvalidCategoryType(_)
            | Error::InvalidPeriod(_)
            | Error::InvalidReportType(_)
            | Error::InvalidUserType(_)
            | Error::InvalidCurrency(_)
            | Error::NonPositiveAmount => StatusCode::BAD_REQUEST,
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "An internal server error occurred.".to_owned()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
