//! Per-category spending caps.
//!
//! A budget's spent, remaining and percentage fields are always derived at
//! read time from the transaction ledger, never stored.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;
pub mod progress;

pub use create::{create_budget_endpoint, get_new_budget_page};
pub use db::{
    create_budget, create_budget_table, delete_budget, get_budget, get_budgets, update_budget,
};
pub use delete::delete_budget_endpoint;
pub use domain::{Budget, BudgetId, NewBudget, Period};
pub use edit::{get_edit_budget_page, update_budget_endpoint};
pub use list::get_budgets_page;
