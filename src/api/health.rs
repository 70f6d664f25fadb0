//! Liveness and readiness probes.
//!
//! `/health` only says the process is serving. `/ready` also requires the
//! registration store to answer; the upstream venue and directory are not
//! checked because reports degrade without them.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::api::AppState;
use crate::error::AppError;

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub async fn ready(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state
        .registrations
        .ping()
        .await
        .map_err(|e| AppError::Unavailable(format!("Registration store unreachable: {}", e)))?;

    Ok(Json(json!({
        "status": "ready",
        "vault": state.reports.vault_address(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }
}
