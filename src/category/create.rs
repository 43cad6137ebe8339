//! Category creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{CategoryName, CategoryType, create_category},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    user::{UserID, get_user_by_id},
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data from the category creation form.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategoryFormData {
    pub name: String,
    pub category_type: String,
    /// Only staff may set this; comes from a checkbox so any value means true.
    pub is_default: Option<String>,
}

/// Render the category creation page.
///
/// The "shared default" checkbox is only rendered for staff users.
pub async fn get_new_category_page(
    State(state): State<CreateCategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let is_staff = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_id(user_id, &connection)?.is_staff
    };

    Ok(new_category_view(is_staff).into_response())
}

/// Handle category creation form submission.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<NewCategoryFormData>,
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

    let owner = if form.is_default.is_some() {
        let is_staff = match get_user_by_id(user_id, &connection) {
            Ok(user) => user.is_staff,
            Err(error) => return error.into_alert_response(),
        };

        if !is_staff {
            return Error::DefaultCategoryForbidden.into_alert_response();
        }

        None
    } else {
        Some(user_id)
    };

    match create_category(name, category_type, owner, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");

            error.into_alert_response()
        }
    }
}

fn new_category_view(is_staff: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold md:text-2xl" { "New Category" }

            form
                hx-post=(endpoints::NEW_CATEGORY_VIEW)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }
                    input
                        id="name" type="text" name="name" placeholder="Category name"
                        required autofocus class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category_type" class=(FORM_LABEL_STYLE) { "Type" }
                    select id="category_type" name="category_type" class=(FORM_SELECT_STYLE)
                    {
                        option value="expense" { "Expense" }
                        option value="income" { "Income" }
                    }
                }

                @if is_staff {
                    div class="flex items-center gap-x-3"
                    {
                        input
                            type="checkbox" name="is_default" id="is_default"
                            class=(FORM_CHECKBOX_STYLE);
                        label for="is_default" class=(FORM_LABEL_STYLE)
                            { "Shared default (visible to every user)" }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Category" }
            }
        }
    };

    base("New Category", &content)
}

#[cfg(test)]
mod new_category_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};

    use crate::{
        category::create::{CreateCategoryState, get_new_category_page},
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            create_test_user, get_test_connection, must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = CreateCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_new_category_page(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::NEW_CATEGORY_VIEW, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn default_checkbox_hidden_for_regular_users() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = CreateCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_new_category_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let checkbox = scraper::Selector::parse("input[name=is_default]").unwrap();
        assert!(html.select(&checkbox).next().is_none());
    }
}
