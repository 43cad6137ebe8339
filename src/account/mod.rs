//! The account area: profile settings, notification preferences and month
//! stats.

mod preferences_form;
mod profile;

pub use preferences_form::update_preferences_endpoint;
pub use profile::{get_profile_page, update_profile_endpoint};
