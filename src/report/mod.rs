//! Immutable spending report snapshots.
//!
//! A report captures the typed income/expense totals and a per-category
//! breakdown for a window ending on the day it was generated. Reports are
//! never updated after the fact; regenerating always inserts a new snapshot.

mod db;
mod detail;
mod domain;
mod generate;
mod list;

pub use db::{
    create_report_tables, generate, get_report, get_report_categories, get_reports,
};
pub use detail::get_report_detail_page;
pub use domain::{Report, ReportCategoryRow, ReportId, ReportType};
pub use generate::{generate_report_endpoint, get_generate_report_page};
pub use list::get_reports_page;
