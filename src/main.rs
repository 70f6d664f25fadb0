use hlpwatch::{
    api, config::Config, db::init_db, Address, DirectorySource, HyperliquidDataSource,
    RegistrationStore, ReportService, Repository, VaultDataSource, VaultsAnalyserSource,
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    if config.vaults_analyser_token.is_none() {
        tracing::warn!("VAULTS_ANALYSER_TOKEN not set, depositor directory disabled");
    }

    let registrations: Arc<dyn RegistrationStore> = Arc::new(Repository::new(pool));
    let venue: Arc<dyn VaultDataSource> =
        Arc::new(HyperliquidDataSource::new(config.hyperliquid_api_url.clone()));
    let directory: Arc<dyn DirectorySource> = Arc::new(VaultsAnalyserSource::new(
        config.vaults_analyser_api_url.clone(),
        config.vaults_analyser_token.clone(),
    ));
    let reports = ReportService::new(
        venue,
        directory,
        Address::new(config.vault_address.clone()),
        config.extractor_config(),
    );

    let app = api::create_router(api::AppState::new(registrations, reports));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!(vault = %config.vault_address, "Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
