//! The `/api/families` endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    api::{ApiResult, ApiState},
    family::{Family, FamilyId, create_family, get_family, get_member_names},
    user::{UserID, get_user_by_id},
};

/// A family along with its member usernames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyDetail {
    pub id: FamilyId,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub members: Vec<String>,
}

impl FamilyDetail {
    fn new(family: Family, members: Vec<String>) -> Self {
        Self {
            id: family.id,
            name: family.name,
            created_at: family.created_at,
            members,
        }
    }
}

/// The body for creating a family.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFamilyBody {
    pub name: String,
}

/// Handle GET requests for the authenticated user's family.
///
/// Responds with 404 when the user does not belong to a family.
pub async fn get_family_endpoint(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<FamilyDetail>> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)?;
    let family_id = user.family_id.ok_or(Error::NotFound)?;
    let family = get_family(family_id, &connection)?;
    let members = get_member_names(family_id, &connection)?;

    Ok(Json(FamilyDetail::new(family, members)))
}

/// Handle POST requests that create a family with the user as its head.
pub async fn create_family_endpoint(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Json(body): Json<NewFamilyBody>,
) -> ApiResult<(StatusCode, Json<FamilyDetail>)> {
    let name = body.name.trim();

    if name.is_empty() {
        return Err(Error::EmptyFamilyName.into());
    }

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let family = create_family(name, user_id, &connection)?;
    let members = get_member_names(family.id, &connection)?;

    Ok((StatusCode::CREATED, Json(FamilyDetail::new(family, members))))
}
