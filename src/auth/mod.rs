//! User authentication: private cookies, route guards, and the log-in,
//! log-out and registration flows.

pub(crate) mod cookie;
mod forgot_password;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register_user;
mod token;

pub(crate) use cookie::{invalidate_auth_cookie, set_auth_cookie};
pub use forgot_password::get_forgot_password_page;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_api, auth_guard_hx};
pub use register_user::{get_register_page, post_register_user};
pub(crate) use redirect::{build_log_in_redirect_url, normalize_redirect_url};
pub(crate) use token::Token;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;

#[cfg(test)]
pub use middleware::AuthState;
