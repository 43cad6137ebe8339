//! The notification preferences update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    preferences::{UserPreference, update_preferences},
    user::UserID,
};

/// The state needed to update preferences.
#[derive(Debug, Clone)]
pub struct UpdatePreferencesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdatePreferencesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data from the preferences form.
///
/// Browsers omit unticked checkboxes, so each field is only present when the
/// box was ticked.
// Must use axum_extra's Form since that parses an empty string as None
// instead of crashing like axum::Form.
#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesFormData {
    #[serde(default)]
    pub receive_weekly_reports: Option<String>,
    #[serde(default)]
    pub receive_budget_alerts: Option<String>,
}

/// Handle preferences form submission.
pub async fn update_preferences_endpoint(
    State(state): State<UpdatePreferencesState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<PreferencesFormData>,
) -> Response {
    let preferences = UserPreference {
        receive_weekly_reports: form.receive_weekly_reports.is_some(),
        receive_budget_alerts: form.receive_budget_alerts.is_some(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_preferences(user_id, preferences, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::PROFILE_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
