//! The profile page and the profile update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Currency, Error,
    alert::AlertView,
    currency::{ALL_CURRENCIES, convert_user_amounts},
    dashboard::{MonthStats, get_month_stats},
    email::Email,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency,
    },
    navigation::NavBar,
    preferences::{UserPreference, get_or_create_preferences},
    timezone::today_in,
    user::{User, UserID, UserType, get_user_by_id, update_profile},
};

/// The state needed for the profile page and profile updates.
#[derive(Debug, Clone)]
pub struct ProfileState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The raw data from the profile form.
// Must use axum_extra's Form since that parses an empty string as None
// instead of crashing like axum::Form.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileFormData {
    #[serde(default)]
    pub email: Option<String>,
    pub currency: String,
    pub user_type: String,
    /// Present when the "convert existing amounts" checkbox is ticked.
    #[serde(default)]
    pub convert_amounts: Option<String>,
}

/// Render the profile page with the account, preferences and month stats.
pub async fn get_profile_page(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = today_in(&state.local_timezone);

    let (user, preferences, stats) = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        (
            get_user_by_id(user_id, &connection)?,
            get_or_create_preferences(user_id, &connection)?,
            get_month_stats(user_id, today, &connection)?,
        )
    };

    Ok(profile_view(&user, preferences, &stats).into_response())
}

/// Handle profile form submission.
///
/// When the currency changes and the convert checkbox is ticked, every amount
/// the user owns is rewritten at the snapshot exchange rate before the
/// profile row is saved.
pub async fn update_profile_endpoint(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ProfileFormData>,
) -> Response {
    let currency = match form.currency.parse::<Currency>() {
        Ok(currency) => currency,
        Err(error) => return error.into_alert_response(),
    };

    let user_type = match form.user_type.parse::<UserType>() {
        Ok(user_type) => user_type,
        Err(error) => return error.into_alert_response(),
    };

    let email = match form.email.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => match Email::new(raw) {
            Ok(email) => Some(email),
            Err(error) => {
                return AlertView::error("Invalid email", &error.to_string())
                    .into_response_with_status(StatusCode::BAD_REQUEST);
            }
        },
        _ => None,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let user = match get_user_by_id(user_id, &connection) {
        Ok(user) => user,
        Err(error) => return error.into_alert_response(),
    };

    if user.currency != currency && form.convert_amounts.is_some() {
        if let Err(error) = convert_user_amounts(user_id, user.currency, currency, &connection) {
            return error.into_alert_response();
        }
    }

    match update_profile(user_id, email.as_ref(), currency, user_type, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::PROFILE_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn profile_view(user: &User, preferences: UserPreference, stats: &MonthStats) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROFILE_VIEW).into_html();
    let currency_symbol = user.currency.symbol();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex w-full max-w-2xl items-center justify-between py-4"
            {
                h1 class="text-xl font-bold md:text-2xl" { (user.username) }
                a href=(endpoints::NOTIFICATIONS_VIEW) class=(LINK_STYLE) { "Notifications" }
            }

            div class="grid w-full max-w-2xl grid-cols-1 gap-4 md:grid-cols-3"
            {
                (stat_card("Income this month", stats.income, currency_symbol))
                (stat_card("Expenses this month", stats.expenses, currency_symbol))
                (stat_card("Savings this month", stats.savings, currency_symbol))
            }

            div class="w-full max-w-2xl py-4"
            {
                h2 class="font-semibold py-2" { "Account" }

                form
                    hx-post=(endpoints::PROFILE_VIEW)
                    hx-target-error="#alert-container"
                    class="space-y-4"
                {
                    div
                    {
                        label for="email" class=(FORM_LABEL_STYLE) { "Email" }
                        input
                            name="email" id="email" type="email"
                            placeholder="you@example.com"
                            value=[user.email.as_ref().map(ToString::to_string).as_deref()]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="currency" class=(FORM_LABEL_STYLE) { "Currency" }
                        select name="currency" id="currency" class=(FORM_SELECT_STYLE)
                        {
                            @for currency in ALL_CURRENCIES {
                                option
                                    value=(currency.code())
                                    selected[currency == user.currency]
                                    { (currency.display_name()) }
                            }
                        }
                    }

                    div
                    {
                        label for="user_type" class=(FORM_LABEL_STYLE) { "Account type" }
                        select name="user_type" id="user_type" class=(FORM_SELECT_STYLE)
                        {
                            @for choice in [UserType::Individual, UserType::Family] {
                                option value=(choice) selected[choice == user.user_type]
                                    { (choice) }
                            }
                        }
                    }

                    div class="flex items-center gap-2"
                    {
                        input
                            name="convert_amounts" id="convert_amounts" type="checkbox"
                            class=(FORM_CHECKBOX_STYLE);
                        label for="convert_amounts" class=(FORM_LABEL_STYLE)
                            { "Convert existing amounts to the new currency" }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Profile" }
                }
            }

            div class="w-full max-w-2xl py-4"
            {
                h2 class="font-semibold py-2" { "Notifications" }

                form
                    hx-post=(endpoints::UPDATE_PREFERENCES)
                    hx-target-error="#alert-container"
                    class="space-y-4"
                {
                    div class="flex items-center gap-2"
                    {
                        input
                            name="receive_weekly_reports" id="receive_weekly_reports"
                            type="checkbox"
                            checked[preferences.receive_weekly_reports]
                            class=(FORM_CHECKBOX_STYLE);
                        label for="receive_weekly_reports" class=(FORM_LABEL_STYLE)
                            { "Receive weekly reports" }
                    }

                    div class="flex items-center gap-2"
                    {
                        input
                            name="receive_budget_alerts" id="receive_budget_alerts"
                            type="checkbox"
                            checked[preferences.receive_budget_alerts]
                            class=(FORM_CHECKBOX_STYLE);
                        label for="receive_budget_alerts" class=(FORM_LABEL_STYLE)
                            { "Receive budget alerts" }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Preferences" }
                }
            }
        }
    };

    base("Profile", &content)
}

fn stat_card(label: &str, amount: f64, currency_symbol: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class="text-lg font-semibold" { (format_currency(amount, currency_symbol)) }
        }
    }
}
