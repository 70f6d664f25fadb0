use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::report::parse_window;
use crate::api::AppState;
use crate::db::Registration;
use crate::domain::Address;
use crate::error::AppError;
use crate::orchestration::Report;

#[derive(Debug, Deserialize)]
pub struct RegistrationBody {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct RegistrationReportQuery {
    pub date: Option<String>,
}

pub async fn put_registration(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<RegistrationBody>,
) -> Result<Json<Registration>, AppError> {
    let address: Address = body.address.parse()?;
    let registration = state.registrations.put(&id, &address).await?;
    Ok(Json(registration))
}

pub async fn get_registration(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Registration>, AppError> {
    lookup(&state, &id).await.map(Json)
}

pub async fn get_registration_report(
    Path(id): Path<String>,
    Query(params): Query<RegistrationReportQuery>,
    State(state): State<AppState>,
) -> Result<Json<Report>, AppError> {
    let window = parse_window(params.date.as_deref())?;
    let registration = lookup(&state, &id).await?;

    Ok(Json(
        state
            .reports
            .build_report(&registration.address, window)
            .await,
    ))
}

async fn lookup(state: &AppState, id: &str) -> Result<Registration, AppError> {
    state
        .registrations
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No registration for {}", id)))
}
