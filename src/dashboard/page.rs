//! The dashboard landing page.

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
    dashboard::stats::{MonthStats, get_month_stats},
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
    notification::count_unread,
    timezone::today_in,
    transaction::query::{CategoryTotal, TransactionListItem, get_recent_transactions, top_expense_categories},
    user::{UserID, get_user_by_id},
};

const RECENT_TRANSACTION_COUNT: u64 = 5;
const TOP_CATEGORY_COUNT: u64 = 5;

/// The state needed to render the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

struct DashboardData {
    username: String,
    currency_symbol: &'static str,
    stats: MonthStats,
    recent_transactions: Vec<TransactionListItem>,
    top_categories: Vec<CategoryTotal>,
    budgets: Vec<BudgetProgress>,
    unread_notifications: i64,
}

/// Render the dashboard with the user's month at a glance.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = today_in(&state.local_timezone);
    let month_start = today.replace_day(1).unwrap_or(today);

    let data = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let user = get_user_by_id(user_id, &connection)?;

        DashboardData {
            currency_symbol: user.currency.symbol(),
            username: user.username,
            stats: get_month_stats(user_id, today, &connection)?,
            recent_transactions: get_recent_transactions(
                user_id,
                RECENT_TRANSACTION_COUNT,
                &connection,
            )?,
            top_categories: top_expense_categories(
                user_id,
                month_start,
                today,
                TOP_CATEGORY_COUNT,
                &connection,
            )?,
            budgets: get_budget_progress(user_id, today, &connection)?,
            unread_notifications: count_unread(user_id, &connection)?,
        }
    };

    Ok(dashboard_view(&data).into_response())
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex w-full max-w-4xl items-center justify-between py-4"
            {
                h1 class="text-xl font-bold md:text-2xl" { "Hello, " (data.username) "!" }

                a href=(endpoints::NOTIFICATIONS_VIEW) class=(LINK_STYLE)
                {
                    "Notifications"
                    @if data.unread_notifications > 0 {
                        span class="ml-1 px-2 py-0.5 rounded-full bg-blue-600 text-white text-xs"
                            { (data.unread_notifications) }
                    }
                }
            }

            div class="grid w-full max-w-4xl grid-cols-1 gap-4 md:grid-cols-3"
            {
                (stat_card("Income this month", data.stats.income, data.stats.income_change, data.currency_symbol))
                (stat_card("Expenses this month", data.stats.expenses, data.stats.expense_change, data.currency_symbol))
                (savings_card(data.stats.savings, data.currency_symbol))
            }

            div class="grid w-full max-w-4xl grid-cols-1 gap-4 py-4 md:grid-cols-2"
            {
                (recent_transactions_card(&data.recent_transactions, data.currency_symbol))
                (top_categories_card(&data.top_categories, data.currency_symbol))
            }

            (budgets_card(&data.budgets, data.currency_symbol))
        }
    };

    base("Dashboard", &content)
}

fn stat_card(label: &str, amount: f64, change: f64, currency_symbol: &str) -> Markup {
    let change_color = if change < 0.0 {
        "text-red-600 dark:text-red-500"
    } else {
        "text-green-600 dark:text-green-500"
    };

    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class="text-lg font-semibold" { (format_currency(amount, currency_symbol)) }
            @if change != 0.0 {
                p class={ "text-xs " (change_color) }
                    { (format!("{change:+.1}% vs last month")) }
            }
        }
    }
}

fn savings_card(savings: f64, currency_symbol: &str) -> Markup {
    let color = if savings < 0.0 {
        "text-red-600 dark:text-red-500"
    } else {
        "text-green-600 dark:text-green-500"
    };

    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { "Savings this month" }
            p class={ "text-lg font-semibold " (color) }
                { (format_currency(savings, currency_symbol)) }
        }
    }
}

fn recent_transactions_card(
    transactions: &[TransactionListItem],
    currency_symbol: &str,
) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            div class="flex items-center justify-between"
            {
                h2 class="font-semibold" { "Recent transactions" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "See all" }
            }

            @if transactions.is_empty() {
                p class="text-sm text-gray-500 dark:text-gray-400 py-2" { "No transactions yet." }
            }

            @for transaction in transactions {
                div class="flex justify-between py-1 text-sm"
                {
                    span
                    {
                        @match &transaction.category_name {
                            Some(name) => { (name) }
                            None => { "Uncategorized" }
                        }
                        " "
                        span class="text-gray-500 dark:text-gray-400" { (transaction.date) }
                    }
                    span { (format_currency(transaction.amount, currency_symbol)) }
                }
            }
        }
    }
}

fn top_categories_card(categories: &[CategoryTotal], currency_symbol: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h2 class="font-semibold" { "Top spending this month" }

            @if categories.is_empty() {
                p class="text-sm text-gray-500 dark:text-gray-400 py-2" { "No expenses yet." }
            }

            @for category in categories {
                div class="flex justify-between py-1 text-sm"
                {
                    span { (category.category_name) }
                    span { (format_currency(category.amount, currency_symbol)) }
                }
            }
        }
    }
}

fn budgets_card(budgets: &[BudgetProgress], currency_symbol: &str) -> Markup {
    html! {
        div class="w-full max-w-4xl"
        {
            div class=(CARD_STYLE)
            {
                div class="flex items-center justify-between"
                {
                    h2 class="font-semibold" { "Budgets" }
                    a href=(endpoints::BUDGETS_VIEW) class=(LINK_STYLE) { "Manage" }
                }

                @if budgets.is_empty() {
                    p class="text-sm text-gray-500 dark:text-gray-400 py-2" { "No budgets yet." }
                }

                @for budget in budgets {
                    div class="flex justify-between py-1 text-sm"
                    {
                        span { (budget.category_name) " (" (budget.period) ")" }
                        span
                        {
                            (format_currency(budget.progress.spent, currency_symbol))
                            " of "
                            (format_currency(budget.amount, currency_symbol))
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod dashboard_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use time::OffsetDateTime;

    use crate::{
        category::{CategoryName, CategoryType, create_category},
        dashboard::page::{DashboardState, get_dashboard_page},
        notification::{NotificationType, create_notification},
        test_utils::{assert_valid_html, create_test_user, get_test_connection, parse_html_document},
        transaction::{NewTransaction, create_transaction},
    };

    #[tokio::test]
    async fn shows_month_stats_and_recent_transactions() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let salary = create_category(
            CategoryName::new_unchecked("Wages"),
            CategoryType::Income,
            Some(user.id),
            &connection,
        )
        .unwrap();
        let food = create_category(
            CategoryName::new_unchecked("Takeaways"),
            CategoryType::Expense,
            Some(user.id),
            &connection,
        )
        .unwrap();
        let today = OffsetDateTime::now_utc().date();
        create_transaction(
            NewTransaction {
                user_id: user.id,
                amount: 1000.0,
                category_id: Some(salary.id),
                description: "pay".to_owned(),
                date: today,
            },
            &connection,
        )
        .unwrap();
        create_transaction(
            NewTransaction {
                user_id: user.id,
                amount: 50.0,
                category_id: Some(food.id),
                description: "chips".to_owned(),
                date: today,
            },
            &connection,
        )
        .unwrap();
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Hello, jane!"));
        assert!(text.contains("$1,000.00"));
        assert!(text.contains("$950.00"));
        assert!(text.contains("Takeaways"));
    }

    #[tokio::test]
    async fn shows_unread_notification_badge() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        create_notification(user.id, "hi", "", NotificationType::Info, &connection).unwrap();
        create_notification(user.id, "ho", "", NotificationType::Info, &connection).unwrap();
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Notifications"));
        assert!(text.contains('2'));
    }

    #[tokio::test]
    async fn renders_with_no_data() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No transactions yet."));
        assert!(text.contains("No budgets yet."));
    }
}
