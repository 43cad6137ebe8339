//! Category edit page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        Category, CategoryId, CategoryName, CategoryType, domain::CategoryFormData, get_category,
        update_category,
    },
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    user::UserID,
};

/// The state needed for editing a category.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category edit page with the form pre-filled.
///
/// # Errors
///
/// Returns [Error::NotFound] if the category is not one of the user's own.
/// Shared defaults cannot be edited, so they 404 here too.
pub async fn get_edit_category_page(
    State(state): State<EditCategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<Response, Error> {
    let category = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_category(category_id, user_id, &connection)?
    };

    if category.is_default {
        return Err(Error::NotFound);
    }

    Ok(edit_category_view(&category).into_response())
}

/// Handle category edit form submission.
pub async fn update_category_endpoint(
    State(state): State<EditCategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };
    let category_type = match form.category_type.parse::<CategoryType>() {
        Ok(category_type) => category_type,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_category(category_id, name, category_type, user_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn edit_category_view(category: &Category) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let edit_url = format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold md:text-2xl" { "Edit Category" }

            form
                hx-post=(edit_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }
                    input
                        id="name" type="text" name="name" value=(category.name)
                        required autofocus class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category_type" class=(FORM_LABEL_STYLE) { "Type" }
                    select id="category_type" name="category_type" class=(FORM_SELECT_STYLE)
                    {
                        option
                            value="expense"
                            selected[category.category_type == CategoryType::Expense]
                            { "Expense" }
                        option
                            value="income"
                            selected[category.category_type == CategoryType::Income]
                            { "Income" }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Category" }
            }
        }
    };

    base("Edit Category", &content)
}


#[cfg(test)]
mod update_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        category::{
            CategoryName, CategoryType, create_category, domain::CategoryFormData,
            edit::{EditCategoryState, update_category_endpoint},
            get_category,
        },
        endpoints,
        test_utils::{assert_hx_redirect, create_test_user, get_test_connection},
    };

    #[tokio::test]
    async fn can_update_category() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let category = create_category(
            CategoryName::new_unchecked("Pets"),
            CategoryType::Expense,
            Some(user.id),
            &connection,
        )
        .unwrap();
        let state = EditCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let form = CategoryFormData {
            name: "Pet Income".to_owned(),
            category_type: "income".to_owned(),
        };

        let response = update_category_endpoint(
            State(state.clone()),
            Extension(user.id),
            Path(category.id),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_category(category.id, user.id, &connection).unwrap();
        assert_eq!(updated.name.as_ref(), "Pet Income");
        assert_eq!(updated.category_type, CategoryType::Income);
    }

    #[tokio::test]
    async fn update_missing_category_returns_not_found() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = EditCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let form = CategoryFormData {
            name: "Ghost".to_owned(),
            category_type: "expense".to_owned(),
        };

        let response =
            update_category_endpoint(State(state), Extension(user.id), Path(999), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
