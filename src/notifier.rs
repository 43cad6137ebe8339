//! The scheduled job that generates weekly reports and emails summaries.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tokio::time::{Duration, MissedTickBehavior, interval};

use crate::{
    Error,
    email::Mailer,
    html::format_currency,
    notification::{NotificationType, create_notification},
    preferences::get_or_create_preferences,
    report::{Report, ReportType, generate},
    timezone::today_in,
    user::{User, get_all_users},
};

/// Periodically generate a weekly report for every opted-in user and email
/// them a summary.
///
/// Runs until the server shuts down. One user's failure is logged and does
/// not stop the run for the remaining users.
pub async fn run_weekly_report_job(
    db_connection: Arc<Mutex<Connection>>,
    mailer: Arc<dyn Mailer>,
    local_timezone: String,
    period: Duration,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately. Skip it so restarting the server
    // does not generate a fresh round of reports.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match send_weekly_reports(&db_connection, mailer.as_ref(), &local_timezone) {
            Ok(report_count) => tracing::info!("generated {report_count} weekly reports"),
            Err(error) => tracing::error!("weekly report run failed: {error}"),
        }
    }
}

/// Generate a weekly report for every user that has not opted out, returning
/// how many reports were created.
pub(crate) fn send_weekly_reports(
    db_connection: &Arc<Mutex<Connection>>,
    mailer: &dyn Mailer,
    local_timezone: &str,
) -> Result<usize, Error> {
    let today = today_in(local_timezone);

    let connection = db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let mut report_count = 0;

    for user in get_all_users(&connection)? {
        let preferences = get_or_create_preferences(user.id, &connection)?;

        if !preferences.receive_weekly_reports {
            continue;
        }

        let report = match generate(user.id, ReportType::Weekly, today, &connection) {
            Ok(report) => report,
            Err(error) => {
                tracing::error!(
                    "could not generate weekly report for {}: {error}",
                    user.username
                );
                continue;
            }
        };

        create_notification(
            user.id,
            "Your weekly report is ready",
            &format!(
                "Covering {} to {}.",
                report.start_date, report.end_date
            ),
            NotificationType::Info,
            &connection,
        )?;

        if let Some(email) = &user.email
            && let Err(error) = mailer.send(email, &email_subject(&report), &email_body(&user, &report))
        {
            tracing::warn!("could not email weekly report to {}: {error}", user.username);
        }

        report_count += 1;
    }

    Ok(report_count)
}

fn email_subject(report: &Report) -> String {
    format!(
        "Your weekly spending report ({} to {})",
        report.start_date, report.end_date
    )
}

fn email_body(user: &User, report: &Report) -> String {
    let symbol = user.currency.symbol();

    format!(
        "Hi {},\n\n\
        Here is your week at a glance.\n\n\
        Income: {}\n\
        Expenses: {}\n\
        Net: {}\n\n\
        See the full breakdown on your reports page.",
        user.username,
        format_currency(report.total_income, symbol),
        format_currency(report.total_expense, symbol),
        format_currency(report.net_amount(), symbol),
    )
}
