use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::{Address, WindowSpec};
use crate::error::AppError;
use crate::orchestration::Report;

/// `date` absent means the rolling 24h window.
pub(crate) fn parse_window(date: Option<&str>) -> Result<WindowSpec, AppError> {
    match date.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(WindowSpec::Rolling),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(WindowSpec::CalendarDay)
            .map_err(|_| AppError::BadRequest("date must be YYYY-MM-DD".to_string())),
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub user: String,
    pub date: Option<String>,
}

pub async fn get_report(
    Query(params): Query<ReportQuery>,
    State(state): State<AppState>,
) -> Result<Json<Report>, AppError> {
    let wallet: Address = params.user.parse()?;
    let window = parse_window(params.date.as_deref())?;

    Ok(Json(state.reports.build_report(&wallet, window).await))
}
