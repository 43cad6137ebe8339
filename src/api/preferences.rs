//! The `/api/preferences` endpoints.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    api::{ApiResult, ApiState},
    preferences::{UserPreference, get_or_create_preferences, update_preferences},
    user::UserID,
};

/// Handle GET requests for the user's notification preferences.
pub async fn get_preferences_endpoint(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<UserPreference>> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let preferences = get_or_create_preferences(user_id, &connection)?;

    Ok(Json(preferences))
}

/// Handle PUT requests that replace the user's notification preferences.
pub async fn put_preferences_endpoint(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Json(preferences): Json<UserPreference>,
) -> ApiResult<Json<UserPreference>> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    update_preferences(user_id, preferences.clone(), &connection)?;

    Ok(Json(preferences))
}
