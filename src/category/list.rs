//! The category list page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, CategoryType, get_visible_categories},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
    user::UserID,
};

/// The state needed for listing categories.
#[derive(Debug, Clone)]
pub struct ListCategoriesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListCategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the categories visible to the user, grouped by type.
pub async fn get_categories_page(
    State(state): State<ListCategoriesState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let categories = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_visible_categories(user_id, &connection)?
    };

    let (expense, income): (Vec<_>, Vec<_>) = categories
        .into_iter()
        .partition(|category| category.category_type == CategoryType::Expense);

    Ok(categories_view(&expense, &income).into_response())
}

fn categories_view(expense: &[Category], income: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex w-full max-w-2xl items-center justify-between py-4"
            {
                h1 class="text-xl font-bold md:text-2xl" { "Categories" }
                a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE) { "New Category" }
            }

            (category_table("Expense Categories", expense))
            (category_table("Income Categories", income))
        }
    };

    base("Categories", &content)
}

fn category_table(heading: &str, categories: &[Category]) -> Markup {
    html! {
        div class="w-full max-w-2xl py-4"
        {
            h2 class="text-lg font-semibold pb-2" { (heading) }

            @if categories.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No categories yet." }
            } @else {
                table class="w-full text-sm text-left"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th class=(TABLE_CELL_STYLE) { "Name" }
                            th class=(TABLE_CELL_STYLE) { "" }
                        }
                    }
                    tbody
                    {
                        @for category in categories {
                            (category_row(category))
                        }
                    }
                }
            }
        }
    }
}

fn category_row(category: &Category) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (category.name) }
            td class=(TABLE_CELL_STYLE)
            {
                @if category.is_default {
                    span class="text-xs uppercase text-gray-500 dark:text-gray-400"
                        { "Default" }
                } @else {
                    div class="flex gap-x-4"
                    {
                        a
                            href=(format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id))
                            class=(LINK_STYLE)
                            { "Edit" }
                        button
                            hx-post=(format_endpoint(endpoints::DELETE_CATEGORY, category.id))
                            hx-target-error="#alert-container"
                            class=(BUTTON_DELETE_STYLE)
                            { "Delete" }
                    }
                }
            }
        }
    }
}
