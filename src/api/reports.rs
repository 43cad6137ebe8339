//! The `/api/reports` endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    api::{ApiResult, ApiState},
    report::{
        Report, ReportCategoryRow, ReportId, ReportType, generate, get_report,
        get_report_categories, get_reports,
    },
    timezone::today_in,
    user::UserID,
};

/// A report snapshot with its per-category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: Report,
    pub net_amount: f64,
    pub categories: Vec<ReportCategoryRow>,
}

/// The query string for report generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQuery {
    /// "weekly" or "monthly".
    pub report_type: String,
}

/// Handle GET requests listing the user's report snapshots, newest first.
pub async fn list_reports(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
) -> ApiResult<Json<Vec<Report>>> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let reports = get_reports(user_id, &connection)?;

    Ok(Json(reports))
}

/// Handle GET requests for a single report and its category breakdown.
pub async fn get_report_detail(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Path(report_id): Path<ReportId>,
) -> ApiResult<Json<ReportDetail>> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let report = get_report(report_id, user_id, &connection)?;
    let categories = get_report_categories(report_id, &connection)?;

    Ok(Json(ReportDetail {
        net_amount: report.net_amount(),
        report,
        categories,
    }))
}

/// Handle POST requests that snapshot a new report for the trailing window.
pub async fn generate_report_api(
    State(state): State<ApiState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<GenerateQuery>,
) -> ApiResult<(StatusCode, Json<ReportDetail>)> {
    let report_type = query.report_type.parse::<ReportType>()?;
    let today = today_in(&state.local_timezone);

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let report = generate(user_id, report_type, today, &connection)?;
    let categories = get_report_categories(report.id, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(ReportDetail {
            net_amount: report.net_amount(),
            report,
            categories,
        }),
    ))
}
