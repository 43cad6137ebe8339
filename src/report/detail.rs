//! The report detail page with the per-category breakdown.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::CategoryType,
    endpoints,
    html::{
        CARD_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
    report::{Report, ReportCategoryRow, ReportId, get_report, get_report_categories},
    user::{UserID, get_user_by_id},
};

/// The state needed for the report detail page.
#[derive(Debug, Clone)]
pub struct ReportDetailState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportDetailState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render a single report with its totals and category breakdown.
///
/// # Errors
///
/// Returns [Error::NotFound] if the report is not one of the user's own.
pub async fn get_report_detail_page(
    State(state): State<ReportDetailState>,
    Extension(user_id): Extension<UserID>,
    Path(report_id): Path<ReportId>,
) -> Result<Response, Error> {
    let (report, rows, currency_symbol) = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let report = get_report(report_id, user_id, &connection)?;
        let rows = get_report_categories(report.id, &connection)?;
        let user = get_user_by_id(user_id, &connection)?;

        (report, rows, user.currency.symbol())
    };

    Ok(report_detail_view(&report, &rows, currency_symbol).into_response())
}

fn report_detail_view(
    report: &Report,
    rows: &[ReportCategoryRow],
    currency_symbol: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl py-4"
            {
                h1 class="text-xl font-bold md:text-2xl"
                    { "Report " (report.start_date) " to " (report.end_date) }
                p class="text-sm text-gray-500 dark:text-gray-400" { (report.report_type) }
            }

            div class="grid w-full max-w-2xl grid-cols-1 gap-4 md:grid-cols-3"
            {
                (stat_card("Income", report.total_income, currency_symbol))
                (stat_card("Expenses", report.total_expense, currency_symbol))
                (stat_card("Net", report.net_amount(), currency_symbol))
            }

            div class="w-full max-w-2xl py-4"
            {
                h2 class="font-semibold py-2" { "By category" }

                @if rows.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                        { "No categorized transactions in this window." }
                } @else {
                    table class="w-full text-sm text-left"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th class=(TABLE_CELL_STYLE) { "Category" }
                                th class=(TABLE_CELL_STYLE) { "Type" }
                                th class=(TABLE_CELL_STYLE) { "Amount" }
                            }
                        }
                        tbody
                        {
                            @for row in rows {
                                (category_row(row, currency_symbol))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Report", &content)
}

fn stat_card(label: &str, amount: f64, currency_symbol: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class="text-lg font-semibold" { (format_currency(amount, currency_symbol)) }
        }
    }
}

fn category_row(row: &ReportCategoryRow, currency_symbol: &str) -> Markup {
    let type_color = match row.transaction_type {
        CategoryType::Income => "text-green-600 dark:text-green-500",
        CategoryType::Expense => "text-red-600 dark:text-red-500",
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (row.category_name) }
            td class={ (TABLE_CELL_STYLE) " " (type_color) } { (row.transaction_type) }
            td class=(TABLE_CELL_STYLE) { (format_currency(row.amount, currency_symbol)) }
        }
    }
}
