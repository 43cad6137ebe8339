//! Transaction edit page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
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
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    transaction::{
        Transaction, TransactionId,
        domain::TransactionFormData,
        form::{TransactionFormDefaults, transaction_form_fields},
        get_transaction, update_transaction,
    },
    user::UserID,
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transaction edit page with the form pre-filled.
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction is not one of the user's own.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let (transaction, categories) = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        (
            get_transaction(transaction_id, user_id, &connection)?,
            get_visible_categories(user_id, &connection)?,
        )
    };

    Ok(edit_transaction_view(&transaction, &categories).into_response())
}

/// Handle transaction edit form submission.
pub async fn update_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_transaction(
        transaction_id,
        form.amount,
        form.category_id,
        &form.description,
        form.date,
        user_id,
        &connection,
    ) {
        Ok(()) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn edit_transaction_view(transaction: &Transaction, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let defaults = TransactionFormDefaults {
        amount: Some(transaction.amount),
        date: transaction.date,
        description: Some(&transaction.description),
        category_id: transaction.category_id,
        max_date: OffsetDateTime::now_utc().date(),
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold md:text-2xl" { "Edit Transaction" }

            form
                hx-post=(edit_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                (transaction_form_fields(&defaults, categories))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Transaction" }
            }
        }
    };

    base("Edit Transaction", &content)
}


#[cfg(test)]
mod update_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        endpoints,
        test_utils::{assert_hx_redirect, create_test_user, get_test_connection},
        transaction::{
            NewTransaction, create_transaction,
            domain::TransactionFormData,
            edit::{EditTransactionState, update_transaction_endpoint},
            get_transaction,
        },
    };

    #[tokio::test]
    async fn can_update_transaction() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let transaction = create_transaction(
            NewTransaction {
                user_id: user.id,
                amount: 12.3,
                category_id: None,
                description: "before".to_owned(),
                date: date!(2026 - 08 - 01),
            },
            &connection,
        )
        .unwrap();
        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let form = TransactionFormData {
            amount: 45.6,
            date: date!(2026 - 08 - 02),
            description: "after".to_owned(),
            category_id: None,
        };

        let response = update_transaction_endpoint(
            State(state.clone()),
            Extension(user.id),
            Path(transaction.id),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_transaction(transaction.id, user.id, &connection).unwrap();
        assert_eq!(updated.amount, 45.6);
        assert_eq!(updated.description, "after");
        assert_eq!(updated.date, date!(2026 - 08 - 02));
    }

    #[tokio::test]
    async fn update_missing_transaction_returns_not_found() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let form = TransactionFormData {
            amount: 45.6,
            date: date!(2026 - 08 - 02),
            description: "".to_owned(),
            category_id: None,
        };

        let response =
            update_transaction_endpoint(State(state), Extension(user.id), Path(999), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
