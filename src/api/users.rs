//! The `/api/users` endpoints.

use axum::{Extension, Json, extract::State};
use serde::Serialize;

use crate::{
    Currency, Error,
    api::{ApiResult, ApiState},
    dashboard::{MonthStats, get_month_stats},
    email::Email,
    family::FamilyId,
    timezone::today_in,
    user::{User, UserID, UserType, get_user_by_id},
};

/// The authenticated user's profile, without the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: UserID,
    pub username: String,
    pub email: Option<Email>,
    pub currency: Currency,
    pub user_type: UserType,
    pub is_staff: bool,
    pub is_family_head: bool,
    pub family_id: Option<FamilyId>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            currency: user.currency,
            user_type: user.user_type,
            is_staff: user.is_staff,
            is_family_head: user.is_family_head,
            family_id: user.family_id,
        }
    }
}

/// Handle GET requests for the authenticated user's profile.
pub async fn get_me(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<UserProfile>> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)?;

    Ok(Json(user.into()))
}

/// Handle GET requests for the user's month-to-date stats.
pub async fn get_user_stats(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<MonthStats>> {
    let today = today_in(&state.local_timezone);

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let stats = get_month_stats(user_id, today, &connection)?;

    Ok(Json(stats))
}
