//! The JSON API under `/api`.
//!
//! Mirrors the server-rendered pages resource for resource. Every handler
//! takes the authenticated user from the request extensions, scopes queries
//! to that user, and returns errors as `{"detail": ...}` bodies.

pub mod budgets;
pub mod categories;
mod error;
pub mod families;
pub mod incomes;
pub mod preferences;
pub mod reports;
pub mod transactions;
pub mod users;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub(crate) use error::ApiResult;

/// The state shared by the JSON API handlers.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for ApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}
