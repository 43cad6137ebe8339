//! Recurring income expectations, e.g. a monthly salary.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_income_endpoint, get_new_income_page};
pub use db::{
    create_expected_income, create_expected_income_table, delete_expected_income,
    get_expected_income, get_expected_incomes, update_expected_income,
};
pub use delete::delete_income_endpoint;
pub use domain::{ExpectedIncome, IncomeId, IncomePeriod, IncomeSource, NewExpectedIncome};
pub use edit::{get_edit_income_page, update_income_endpoint};
pub use list::get_incomes_page;
