//! The paginated transactions page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::CategoryType,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    pagination::{PaginationConfig, PaginationIndicator, create_pagination_indicators},
    transaction::query::{TransactionListItem, count_transactions, get_transaction_page},
    user::{UserID, get_user_by_id},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The pagination query parameters for the transactions page.
#[derive(Debug, Deserialize)]
pub struct TransactionsPageQuery {
    /// The 1-based page number to display.
    pub page: Option<u64>,
}

/// Render one page of the user's transactions, newest first.
pub async fn get_transactions_page(
    State(state): State<ListTransactionsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionsPageQuery>,
) -> Result<Response, Error> {
    let page_size = state.pagination_config.default_page_size;
    let page = query
        .page
        .unwrap_or(state.pagination_config.default_page)
        .max(1);

    let (transactions, transaction_count, currency_symbol) = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let user = get_user_by_id(user_id, &connection)?;

        (
            get_transaction_page(user_id, page_size, (page - 1) * page_size, &connection)?,
            count_transactions(user_id, &connection)?,
            user.currency.symbol(),
        )
    };

    let page_count = transaction_count.div_ceil(page_size).max(1);
    let indicators =
        create_pagination_indicators(page, page_count, state.pagination_config.max_pages);

    Ok(transactions_view(&transactions, &indicators, currency_symbol).into_response())
}

fn transactions_view(
    transactions: &[TransactionListItem],
    indicators: &[PaginationIndicator],
    currency_symbol: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex w-full max-w-4xl items-center justify-between py-4"
            {
                h1 class="text-xl font-bold md:text-2xl" { "Transactions" }
                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "New Transaction" }
            }

            @if transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No transactions yet." }
            } @else {
                table class="w-full max-w-4xl text-sm text-left"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th class=(TABLE_CELL_STYLE) { "Date" }
                            th class=(TABLE_CELL_STYLE) { "Description" }
                            th class=(TABLE_CELL_STYLE) { "Category" }
                            th class=(TABLE_CELL_STYLE) { "Amount" }
                            th class=(TABLE_CELL_STYLE) { "" }
                        }
                    }
                    tbody
                    {
                        @for transaction in transactions {
                            (transaction_row(transaction, currency_symbol))
                        }
                    }
                }

                (pagination_control(indicators))
            }
        }
    };

    base("Transactions", &content)
}

fn transaction_row(transaction: &TransactionListItem, currency_symbol: &str) -> Markup {
    let amount = match transaction.transaction_type {
        Some(CategoryType::Expense) => format_currency(-transaction.amount, currency_symbol),
        _ => format_currency(transaction.amount, currency_symbol),
    };
    let amount_style = match transaction.transaction_type {
        Some(CategoryType::Income) => "text-green-600 dark:text-green-400",
        Some(CategoryType::Expense) => "text-red-600 dark:text-red-400",
        None => "text-gray-500 dark:text-gray-400",
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE)
            {
                @match &transaction.category_name {
                    Some(name) => { (name) }
                    None => {
                        span class="text-gray-500 dark:text-gray-400" { "Uncategorized" }
                    }
                }
            }
            td class={ (TABLE_CELL_STYLE) " " (amount_style) } { (amount) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-x-4"
                {
                    a
                        href=(format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id))
                        class=(LINK_STYLE)
                        { "Edit" }
                    button
                        hx-post=(format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id))
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                        { "Delete" }
                }
            }
        }
    }
}

fn page_url(page: u64) -> String {
    format!("{}?page={page}", endpoints::TRANSACTIONS_VIEW)
}

fn pagination_control(indicators: &[PaginationIndicator]) -> Markup {
    html! {
        nav class="flex items-center gap-x-2 py-4" aria-label="pagination"
        {
            @for indicator in indicators {
                @match indicator {
                    PaginationIndicator::BackButton(page) => {
                        a href=(page_url(*page)) class=(LINK_STYLE) { "Previous" }
                    }
                    PaginationIndicator::NextButton(page) => {
                        a href=(page_url(*page)) class=(LINK_STYLE) { "Next" }
                    }
                    PaginationIndicator::Page(page) => {
                        a href=(page_url(*page)) class=(LINK_STYLE) { (page) }
                    }
                    PaginationIndicator::CurrPage(page) => {
                        span class="font-bold" { (page) }
                    }
                    PaginationIndicator::Ellipsis => {
                        span class="text-gray-500" { "..." }
                    }
                }
            }
        }
    }
}
