//! The application's route URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}/edit',
//! use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The page for displaying a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The route for deleting a transaction.
pub const DELETE_TRANSACTION: &str = "/transactions/{transaction_id}/delete";

/// The page listing the categories visible to the user.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page for editing an existing category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The route for deleting a category.
pub const DELETE_CATEGORY: &str = "/categories/{category_id}/delete";

/// The page listing the user's budgets with their progress.
pub const BUDGETS_VIEW: &str = "/budgets";
/// The page for creating a new budget.
pub const NEW_BUDGET_VIEW: &str = "/budgets/new";
/// The page for editing an existing budget.
pub const EDIT_BUDGET_VIEW: &str = "/budgets/{budget_id}/edit";
/// The route for deleting a budget.
pub const DELETE_BUDGET: &str = "/budgets/{budget_id}/delete";

/// The page listing the user's expected incomes.
pub const INCOMES_VIEW: &str = "/incomes";
/// The page for creating a new expected income.
pub const NEW_INCOME_VIEW: &str = "/incomes/new";
/// The page for editing an existing expected income.
pub const EDIT_INCOME_VIEW: &str = "/incomes/{income_id}/edit";
/// The route for deleting an expected income.
pub const DELETE_INCOME: &str = "/incomes/{income_id}/delete";

/// The page listing the user's generated reports.
pub const REPORTS_VIEW: &str = "/reports";
/// The page showing a single report with its category breakdown.
pub const REPORT_DETAIL_VIEW: &str = "/reports/{report_id}";
/// The page (GET) and endpoint (POST) for generating a new report.
pub const GENERATE_REPORT_VIEW: &str = "/reports/generate";

/// The profile page with account settings, preferences and month stats.
pub const PROFILE_VIEW: &str = "/accounts/profile";
/// The endpoint for updating notification preferences.
pub const UPDATE_PREFERENCES: &str = "/accounts/preferences";
/// The page listing the user's notifications.
pub const NOTIFICATIONS_VIEW: &str = "/accounts/notifications";

/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for instructions for resetting the user's password.
pub const FORGOT_PASSWORD_VIEW: &str = "/forgot_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for registering a new user.
pub const USERS: &str = "/api/users";

/// The JSON route for the authenticated user's profile.
pub const API_USERS_ME: &str = "/api/users/me";
/// The JSON route for the authenticated user's month-to-date stats.
pub const API_USERS_STATS: &str = "/api/users/stats";
/// The JSON route for notification preferences.
pub const API_PREFERENCES: &str = "/api/preferences";
/// The JSON route for families.
pub const API_FAMILIES: &str = "/api/families";
/// The JSON route for listing and creating categories.
pub const API_CATEGORIES: &str = "/api/categories";
/// The JSON route for income categories only.
pub const API_CATEGORIES_INCOME: &str = "/api/categories/income";
/// The JSON route for expense categories only.
pub const API_CATEGORIES_EXPENSE: &str = "/api/categories/expense";
/// The JSON route for a single category.
pub const API_CATEGORY: &str = "/api/categories/{category_id}";
/// The JSON route for listing (with filters) and creating transactions.
pub const API_TRANSACTIONS: &str = "/api/transactions";
/// The JSON route for a single transaction.
pub const API_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The JSON route for the month-to-date transaction summary.
pub const API_TRANSACTIONS_SUMMARY: &str = "/api/transactions/summary";
/// The JSON route for listing and creating budgets.
pub const API_BUDGETS: &str = "/api/budgets";
/// The JSON route for a single budget.
pub const API_BUDGET: &str = "/api/budgets/{budget_id}";
/// The JSON route for budgets with their derived progress fields.
pub const API_BUDGETS_PROGRESS: &str = "/api/budgets/progress";
/// The JSON route for listing and creating expected incomes.
pub const API_INCOMES: &str = "/api/incomes";
/// The JSON route for a single expected income.
pub const API_INCOME: &str = "/api/incomes/{income_id}";
/// The JSON route for listing reports.
pub const API_REPORTS: &str = "/api/reports";
/// The JSON route for a single report with its category rows.
pub const API_REPORT: &str = "/api/reports/{report_id}";
/// The JSON route for generating a new report snapshot.
pub const API_REPORTS_GENERATE: &str = "/api/reports/generate";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/reports/{report_id}', '{report_id}'
/// is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
