use axum::http::StatusCode;
use hlpwatch::api::{self, AppState};
use hlpwatch::datasource::MockDataSource;
use hlpwatch::db::init_db;
use hlpwatch::engine::ExtractorConfig;
use hlpwatch::{Address, RegistrationStore, ReportService, Repository};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

const VAULT: &str = "0xdfc24b077bc1425ad1dea75bcb6f8158e10df303";

async fn setup_test_app() -> (axum::Router, TempDir) {
    let (app, _pool, temp_dir) = setup_test_app_with_pool().await;
    (app, temp_dir)
}

async fn setup_test_app_with_pool() -> (axum::Router, SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    let registrations: Arc<dyn RegistrationStore> = Arc::new(Repository::new(pool.clone()));
    let datasource = Arc::new(MockDataSource::new());

    let reports = ReportService::new(
        datasource.clone(),
        datasource,
        Address::new(VAULT.to_string()),
        ExtractorConfig::default(),
    );
    let state = AppState::new(registrations, reports);

    (api::create_router(state), pool, temp_dir)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _temp) = setup_test_app().await;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body_str = String::from_utf8(body.to_vec()).unwrap();
    assert!(body_str.contains("ok"));
}

#[tokio::test]
async fn test_ready_endpoint() {
    let (app, _temp) = setup_test_app().await;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/ready")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["vault"], VAULT);
}

#[tokio::test]
async fn test_ready_fails_when_store_is_closed() {
    let (app, pool, _temp) = setup_test_app_with_pool().await;
    pool.close().await;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/ready")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Registration store unreachable"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _temp) = setup_test_app().await;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/v1/trades")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
