//! The `/api/categories` endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    Error,
    api::{ApiResult, ApiState},
    category::{self, Category, CategoryId, CategoryName, CategoryType},
    user::{UserID, get_user_by_id},
};

/// The body for creating or updating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryBody {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: String,
    /// Whether the category should become a shared default. Staff only.
    #[serde(default)]
    pub is_default: bool,
}

/// Handle GET requests listing the categories visible to the user.
pub async fn get_categories(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<Vec<Category>>> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = category::get_visible_categories(user_id, &connection)?;

    Ok(Json(categories))
}

/// Handle GET requests listing visible income categories.
pub async fn get_income_categories(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<Vec<Category>>> {
    get_categories_of_type(state, user_id, CategoryType::Income)
}

/// Handle GET requests listing visible expense categories.
pub async fn get_expense_categories(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<Vec<Category>>> {
    get_categories_of_type(state, user_id, CategoryType::Expense)
}

fn get_categories_of_type(
    state: ApiState,
    user_id: UserID,
    category_type: CategoryType,
) -> ApiResult<Json<Vec<Category>>> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let categories =
        category::get_visible_categories_of_type(user_id, category_type, &connection)?;

    Ok(Json(categories))
}

/// Handle POST requests that create a category.
///
/// Setting `is_default` makes the category a shared default, which only staff
/// accounts may do.
pub async fn create_category(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Json(body): Json<CategoryBody>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let name = CategoryName::new(&body.name)?;
    let category_type = body.category_type.parse::<CategoryType>()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let owner = if body.is_default {
        let user = get_user_by_id(user_id, &connection)?;

        if !user.is_staff {
            return Err(Error::DefaultCategoryForbidden.into());
        }

        None
    } else {
        Some(user_id)
    };

    let created = category::create_category(name, category_type, owner, &connection)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Handle PUT requests that update one of the user's own categories.
pub async fn update_category(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Json(body): Json<CategoryBody>,
) -> ApiResult<Json<Category>> {
    let name = CategoryName::new(&body.name)?;
    let category_type = body.category_type.parse::<CategoryType>()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    category::update_category(category_id, name, category_type, user_id, &connection)?;
    let updated = category::get_category(category_id, user_id, &connection)?;

    Ok(Json(updated))
}

/// Handle DELETE requests for one of the user's own categories.
///
/// Shared default categories cannot be deleted this way.
pub async fn delete_category(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> ApiResult<StatusCode> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    category::delete_category(category_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
