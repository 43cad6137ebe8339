//! The expected incomes page.

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
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    income::{ExpectedIncome, get_expected_incomes},
    navigation::NavBar,
    user::{UserID, get_user_by_id},
};

/// The state needed to list expected incomes.
#[derive(Debug, Clone)]
pub struct ListIncomesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListIncomesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the user's expected incomes.
pub async fn get_incomes_page(
    State(state): State<ListIncomesState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let (incomes, currency_symbol) = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let user = get_user_by_id(user_id, &connection)?;

        (
            get_expected_incomes(user_id, &connection)?,
            user.currency.symbol(),
        )
    };

    Ok(incomes_view(&incomes, currency_symbol).into_response())
}

fn incomes_view(incomes: &[ExpectedIncome], currency_symbol: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOMES_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex w-full max-w-2xl items-center justify-between py-4"
            {
                h1 class="text-xl font-bold md:text-2xl" { "Expected Incomes" }
                a href=(endpoints::NEW_INCOME_VIEW) class=(LINK_STYLE) { "New Expected Income" }
            }

            @if incomes.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No expected incomes yet." }
            } @else {
                table class="w-full max-w-2xl text-sm text-left"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th class=(TABLE_CELL_STYLE) { "Source" }
                            th class=(TABLE_CELL_STYLE) { "Amount" }
                            th class=(TABLE_CELL_STYLE) { "Period" }
                            th class=(TABLE_CELL_STYLE) {}
                        }
                    }
                    tbody
                    {
                        @for income in incomes {
                            (income_row(income, currency_symbol))
                        }
                    }
                }
            }
        }
    };

    base("Expected Incomes", &content)
}

fn income_row(income: &ExpectedIncome, currency_symbol: &str) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (income.source) }
            td class=(TABLE_CELL_STYLE) { (format_currency(income.amount, currency_symbol)) }
            td class=(TABLE_CELL_STYLE) { (income.period) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-x-4"
                {
                    a
                        href=(format_endpoint(endpoints::EDIT_INCOME_VIEW, income.id))
                        class=(LINK_STYLE)
                        { "Edit" }
                    button
                        hx-post=(format_endpoint(endpoints::DELETE_INCOME, income.id))
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                        { "Delete" }
                }
            }
        }
    }
}

#[cfg(test)]
mod incomes_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};

    use crate::{
        income::{
            IncomePeriod, IncomeSource, NewExpectedIncome, create_expected_income,
            list::{ListIncomesState, get_incomes_page},
        },
        test_utils::{assert_valid_html, create_test_user, get_test_connection, parse_html_document},
    };

    #[tokio::test]
    async fn shows_incomes() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        create_expected_income(
            NewExpectedIncome {
                user_id: user.id,
                source: IncomeSource::new_unchecked("Salary"),
                amount: 3000.0,
                period: IncomePeriod::Monthly,
            },
            &connection,
        )
        .unwrap();
        let state = ListIncomesState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_incomes_page(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Salary"));
        assert!(text.contains("$3,000.00"));
        assert!(text.contains("monthly"));
    }

    #[tokio::test]
    async fn shows_empty_state() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = ListIncomesState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_incomes_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No expected incomes yet."));
    }
}
