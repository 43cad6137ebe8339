//! Income and expense categories for classifying transactions.
//!
//! Categories are either owned by a single user or shared defaults visible to
//! everyone. Only staff users may manage the shared defaults.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_category_endpoint, get_new_category_page};
pub use db::{
    create_category, create_category_table, delete_category, get_category,
    get_visible_categories, get_visible_categories_of_type, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryId, CategoryName, CategoryType};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use list::get_categories_page;
