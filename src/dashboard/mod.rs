//! The dashboard landing page and the month stats it is built from.

mod page;
mod stats;

pub use page::get_dashboard_page;
pub use stats::{MonthStats, get_month_stats};
