//! The budgets page with derived progress.

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
    budget::progress::{BudgetProgress, get_budget_progress},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency,
    },
    navigation::NavBar,
    timezone::today_in,
    user::{UserID, get_user_by_id},
};

/// The state needed to list budgets.
#[derive(Debug, Clone)]
pub struct ListBudgetsState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for ListBudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the user's budgets with spent/remaining/percentage for the current
/// period.
pub async fn get_budgets_page(
    State(state): State<ListBudgetsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = today_in(&state.local_timezone);

    let (budgets, currency_symbol) = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let user = get_user_by_id(user_id, &connection)?;

        (
            get_budget_progress(user_id, today, &connection)?,
            user.currency.symbol(),
        )
    };

    Ok(budgets_view(&budgets, currency_symbol).into_response())
}

fn budgets_view(budgets: &[BudgetProgress], currency_symbol: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex w-full max-w-2xl items-center justify-between py-4"
            {
                h1 class="text-xl font-bold md:text-2xl" { "Budgets" }
                a href=(endpoints::NEW_BUDGET_VIEW) class=(LINK_STYLE) { "New Budget" }
            }

            @if budgets.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No budgets yet." }
            } @else {
                div class="w-full max-w-2xl space-y-4"
                {
                    @for budget in budgets {
                        (budget_card(budget, currency_symbol))
                    }
                }
            }
        }
    };

    base("Budgets", &content)
}

fn budget_card(budget: &BudgetProgress, currency_symbol: &str) -> Markup {
    // Bar width tops out at 100% even for blown budgets.
    let bar_width = budget.progress.percentage.clamp(0.0, 100.0);
    let bar_color = if budget.progress.percentage >= 100.0 {
        "bg-red-500"
    } else if budget.progress.percentage >= 80.0 {
        "bg-yellow-500"
    } else {
        "bg-green-500"
    };

    html! {
        div class=(CARD_STYLE)
        {
            div class="flex items-center justify-between"
            {
                h2 class="font-semibold" { (budget.category_name) }
                span class="text-sm text-gray-500 dark:text-gray-400" { (budget.period) }
            }

            div class="py-2"
            {
                div class="w-full h-2 bg-gray-200 dark:bg-gray-700 rounded"
                {
                    div
                        class={ "h-2 rounded " (bar_color) }
                        style={ "width: " (bar_width) "%" }
                        {}
                }
            }

            p class="text-sm"
            {
                (format_currency(budget.progress.spent, currency_symbol))
                " of "
                (format_currency(budget.amount, currency_symbol))
                " spent, "
                (format_currency(budget.progress.remaining, currency_symbol))
                " remaining"
            }

            div class="flex gap-x-4 pt-2"
            {
                a
                    href=(format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id))
                    class=(LINK_STYLE)
                    { "Edit" }
                button
                    hx-post=(format_endpoint(endpoints::DELETE_BUDGET, budget.id))
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                    { "Delete" }
            }
        }
    }
}
