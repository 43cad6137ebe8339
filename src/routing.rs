//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, account, api,
    auth::{
        auth_guard, auth_guard_api, auth_guard_hx, get_forgot_password_page, get_log_in_page,
        get_log_out, get_register_page, post_log_in, post_register_user,
    },
    budget, category, dashboard, endpoints, income,
    internal_server_error::get_internal_server_error_page,
    logging::logging_middleware,
    not_found::get_404_not_found,
    notification::get_notifications_page,
    report, transaction,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(endpoints::USERS, post(post_register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(dashboard::get_dashboard_page))
        .route(
            endpoints::TRANSACTIONS_VIEW,
            get(transaction::get_transactions_page),
        )
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(transaction::get_new_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(transaction::get_edit_transaction_page),
        )
        .route(endpoints::CATEGORIES_VIEW, get(category::get_categories_page))
        .route(
            endpoints::NEW_CATEGORY_VIEW,
            get(category::get_new_category_page),
        )
        .route(
            endpoints::EDIT_CATEGORY_VIEW,
            get(category::get_edit_category_page),
        )
        .route(endpoints::BUDGETS_VIEW, get(budget::get_budgets_page))
        .route(endpoints::NEW_BUDGET_VIEW, get(budget::get_new_budget_page))
        .route(endpoints::EDIT_BUDGET_VIEW, get(budget::get_edit_budget_page))
        .route(endpoints::INCOMES_VIEW, get(income::get_incomes_page))
        .route(endpoints::NEW_INCOME_VIEW, get(income::get_new_income_page))
        .route(endpoints::EDIT_INCOME_VIEW, get(income::get_edit_income_page))
        .route(endpoints::REPORTS_VIEW, get(report::get_reports_page))
        .route(
            endpoints::REPORT_DETAIL_VIEW,
            get(report::get_report_detail_page),
        )
        .route(
            endpoints::GENERATE_REPORT_VIEW,
            get(report::get_generate_report_page),
        )
        .route(endpoints::PROFILE_VIEW, get(account::get_profile_page))
        .route(endpoints::NOTIFICATIONS_VIEW, get(get_notifications_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let form_routes = Router::new()
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            post(transaction::create_transaction_endpoint),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            post(transaction::update_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            post(transaction::delete_transaction_endpoint),
        )
        .route(
            endpoints::NEW_CATEGORY_VIEW,
            post(category::create_category_endpoint),
        )
        .route(
            endpoints::EDIT_CATEGORY_VIEW,
            post(category::update_category_endpoint),
        )
        .route(
            endpoints::DELETE_CATEGORY,
            post(category::delete_category_endpoint),
        )
        .route(
            endpoints::NEW_BUDGET_VIEW,
            post(budget::create_budget_endpoint),
        )
        .route(
            endpoints::EDIT_BUDGET_VIEW,
            post(budget::update_budget_endpoint),
        )
        .route(endpoints::DELETE_BUDGET, post(budget::delete_budget_endpoint))
        .route(
            endpoints::NEW_INCOME_VIEW,
            post(income::create_income_endpoint),
        )
        .route(
            endpoints::EDIT_INCOME_VIEW,
            post(income::update_income_endpoint),
        )
        .route(endpoints::DELETE_INCOME, post(income::delete_income_endpoint))
        .route(
            endpoints::GENERATE_REPORT_VIEW,
            post(report::generate_report_endpoint),
        )
        .route(
            endpoints::PROFILE_VIEW,
            post(account::update_profile_endpoint),
        )
        .route(
            endpoints::UPDATE_PREFERENCES,
            post(account::update_preferences_endpoint),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

    let api_routes = Router::new()
        .route(endpoints::API_USERS_ME, get(api::users::get_me))
        .route(endpoints::API_USERS_STATS, get(api::users::get_user_stats))
        .route(
            endpoints::API_PREFERENCES,
            get(api::preferences::get_preferences_endpoint)
                .put(api::preferences::put_preferences_endpoint),
        )
        .route(
            endpoints::API_FAMILIES,
            get(api::families::get_family_endpoint).post(api::families::create_family_endpoint),
        )
        .route(
            endpoints::API_CATEGORIES,
            get(api::categories::get_categories).post(api::categories::create_category),
        )
        .route(
            endpoints::API_CATEGORIES_INCOME,
            get(api::categories::get_income_categories),
        )
        .route(
            endpoints::API_CATEGORIES_EXPENSE,
            get(api::categories::get_expense_categories),
        )
        .route(
            endpoints::API_CATEGORY,
            put(api::categories::update_category).delete(api::categories::delete_category),
        )
        .route(
            endpoints::API_TRANSACTIONS,
            get(api::transactions::list_transactions)
                .post(api::transactions::create_transaction_api),
        )
        .route(
            endpoints::API_TRANSACTIONS_SUMMARY,
            get(api::transactions::get_transaction_summary),
        )
        .route(
            endpoints::API_TRANSACTION,
            put(api::transactions::update_transaction_api)
                .delete(api::transactions::delete_transaction_api),
        )
        .route(
            endpoints::API_BUDGETS,
            get(api::budgets::list_budgets).post(api::budgets::create_budget_api),
        )
        .route(
            endpoints::API_BUDGETS_PROGRESS,
            get(api::budgets::list_budget_progress),
        )
        .route(
            endpoints::API_BUDGET,
            put(api::budgets::update_budget_api).delete(api::budgets::delete_budget_api),
        )
        .route(
            endpoints::API_INCOMES,
            get(api::incomes::list_incomes).post(api::incomes::create_income_api),
        )
        .route(
            endpoints::API_INCOME,
            put(api::incomes::update_income_api).delete(api::incomes::delete_income_api),
        )
        .route(endpoints::API_REPORTS, get(api::reports::list_reports))
        .route(
            endpoints::API_REPORTS_GENERATE,
            post(api::reports::generate_report_api),
        )
        .route(endpoints::API_REPORT, get(api::reports::get_report_detail))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard_api));

    page_routes
        .merge(form_routes)
        .merge(api_routes)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod build_router_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState, PaginationConfig, endpoints,
        routing::{build_router, get_index_page},
    };

    fn test_server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC",
            PaginationConfig::default(),
        )
        .unwrap();

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn pages_redirect_unauthenticated_users_to_log_in() {
        let server = test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_see_other();
        assert!(
            response
                .header("location")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn api_rejects_unauthenticated_users_with_401() {
        let server = test_server();

        let response = server.get(endpoints::API_TRANSACTIONS).await;

        response.assert_status_unauthorized();
        assert!(response.text().contains("detail"));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let server = test_server();

        server.get("/does_not_exist").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn log_in_page_is_public() {
        let server = test_server();

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
    }
}
