pub mod health;
pub mod registrations;
pub mod report;

use crate::db::RegistrationStore;
use crate::orchestration::ReportService;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub registrations: Arc<dyn RegistrationStore>,
    pub reports: ReportService,
}

impl AppState {
    pub fn new(registrations: Arc<dyn RegistrationStore>, reports: ReportService) -> Self {
        Self {
            registrations,
            reports,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/report", get(report::get_report))
        .route(
            "/v1/registrations/:id",
            put(registrations::put_registration).get(registrations::get_registration),
        )
        .route(
            "/v1/registrations/:id/report",
            get(registrations::get_registration_report),
        )
        .layer(cors)
        .with_state(state)
}
