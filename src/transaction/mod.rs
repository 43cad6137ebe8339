//! The user-scoped income and expense ledger.
//!
//! A transaction's type (income or expense) is derived from its category and
//! is `None` for uncategorized transactions, which are excluded from any sum
//! that filters by type.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;
pub mod query;

pub use create::{create_transaction_endpoint, get_new_transaction_page};
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{NewTransaction, Transaction, TransactionId, round_to_cents};
pub use edit::{get_edit_transaction_page, update_transaction_endpoint};
pub use list::get_transactions_page;
