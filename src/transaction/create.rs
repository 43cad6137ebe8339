//! Transaction creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    category::{Category, get_visible_categories},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    transaction::{
        NewTransaction, create_transaction,
        domain::TransactionFormData,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
    user::UserID,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transaction creation page.
pub async fn get_new_transaction_page(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let categories = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_visible_categories(user_id, &connection)?
    };

    let today = OffsetDateTime::now_utc().date();

    Ok(new_transaction_view(today, &categories).into_response())
}

/// Handle transaction creation form submission.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let new_transaction = NewTransaction {
        user_id,
        amount: form.amount,
        category_id: form.category_id,
        description: form.description,
        date: form.date,
    };

    match create_transaction(new_transaction, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn new_transaction_view(today: time::Date, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let defaults = TransactionFormDefaults {
        amount: None,
        date: today,
        description: None,
        category_id: None,
        max_date: today,
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold md:text-2xl" { "New Transaction" }

            form
                hx-post=(endpoints::NEW_TRANSACTION_VIEW)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                (transaction_form_fields(&defaults, categories))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Transaction" }
            }
        }
    };

    base("New Transaction", &content)
}

#[cfg(test)]
mod new_transaction_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            create_test_user, get_test_connection, must_get_form, parse_html_document,
        },
        transaction::create::{CreateTransactionState, get_new_transaction_page},
    };

    #[tokio::test]
    async fn render_page() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = CreateTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_new_transaction_page(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::NEW_TRANSACTION_VIEW, "hx-post");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_form_input(&form, "description", "text");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn category_select_lists_defaults() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = CreateTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_new_transaction_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let options = scraper::Selector::parse("select[name=category_id] option").unwrap();
        // "Uncategorized" plus the 12 seeded defaults.
        assert_eq!(html.select(&options).count(), 13);
    }
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        category::{CategoryName, CategoryType, create_category},
        endpoints,
        test_utils::{assert_hx_redirect, create_test_user, get_test_connection},
        transaction::{
            create::{CreateTransactionState, create_transaction_endpoint},
            domain::TransactionFormData,
            get_transaction,
        },
        user::UserID,
    };

    fn get_state() -> (CreateTransactionState, UserID) {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");

        (
            CreateTransactionState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (state, user_id) = get_state();
        let category = {
            let connection = state.db_connection.lock().unwrap();
            create_category(
                CategoryName::new_unchecked("Takeaways"),
                CategoryType::Expense,
                Some(user_id),
                &connection,
            )
            .unwrap()
        };
        let form = TransactionFormData {
            amount: 12.3,
            date: date!(2026 - 08 - 01),
            description: "test transaction".to_owned(),
            category_id: Some(category.id),
        };

        let response =
            create_transaction_endpoint(State(state.clone()), Extension(user_id), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, user_id, &connection).unwrap();
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.description, "test transaction");
        assert_eq!(transaction.category_id, Some(category.id));
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let (state, user_id) = get_state();
        let form = TransactionFormData {
            amount: 0.0,
            date: date!(2026 - 08 - 01),
            description: "".to_owned(),
            category_id: None,
        };

        let response = create_transaction_endpoint(State(state), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_unknown_category() {
        let (state, user_id) = get_state();
        let form = TransactionFormData {
            amount: 5.0,
            date: date!(2026 - 08 - 01),
            description: "".to_owned(),
            category_id: Some(999),
        };

        let response = create_transaction_endpoint(State(state), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
