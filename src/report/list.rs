//! The reports page.

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
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
    report::{Report, get_reports},
    user::{UserID, get_user_by_id},
};

/// The state needed to list reports.
#[derive(Debug, Clone)]
pub struct ListReportsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListReportsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the user's generated reports, newest first.
pub async fn get_reports_page(
    State(state): State<ListReportsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let (reports, currency_symbol) = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let user = get_user_by_id(user_id, &connection)?;

        (get_reports(user_id, &connection)?, user.currency.symbol())
    };

    Ok(reports_view(&reports, currency_symbol).into_response())
}

fn reports_view(reports: &[Report], currency_symbol: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex w-full max-w-2xl items-center justify-between py-4"
            {
                h1 class="text-xl font-bold md:text-2xl" { "Reports" }
                a href=(endpoints::GENERATE_REPORT_VIEW) class=(LINK_STYLE) { "Generate Report" }
            }

            @if reports.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No reports yet." }
            } @else {
                table class="w-full max-w-2xl text-sm text-left"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th class=(TABLE_CELL_STYLE) { "Type" }
                            th class=(TABLE_CELL_STYLE) { "Window" }
                            th class=(TABLE_CELL_STYLE) { "Net" }
                            th class=(TABLE_CELL_STYLE) {}
                        }
                    }
                    tbody
                    {
                        @for report in reports {
                            (report_row(report, currency_symbol))
                        }
                    }
                }
            }
        }
    };

    base("Reports", &content)
}

fn report_row(report: &Report, currency_symbol: &str) -> Markup {
    let net = report.net_amount();
    let net_color = if net < 0.0 {
        "text-red-600 dark:text-red-500"
    } else {
        "text-green-600 dark:text-green-500"
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (report.report_type) }
            td class=(TABLE_CELL_STYLE) { (report.start_date) " to " (report.end_date) }
            td class={ (TABLE_CELL_STYLE) " " (net_color) }
                { (format_currency(net, currency_symbol)) }
            td class=(TABLE_CELL_STYLE)
            {
                a
                    href=(format_endpoint(endpoints::REPORT_DETAIL_VIEW, report.id))
                    class=(LINK_STYLE)
                    { "View" }
            }
        }
    }
}
