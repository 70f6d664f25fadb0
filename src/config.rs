use crate::engine::{ExtractorConfig, DEFAULT_BOUNDARY_TOLERANCE_MS};
use std::collections::HashMap;
use thiserror::Error;

pub const HLP_VAULT_ADDRESS: &str = "0xdfc24b077bc1425ad1dea75bcb6f8158e10df303";
pub const DEFAULT_HYPERLIQUID_API_URL: &str = "https://api.hyperliquid.xyz";
pub const DEFAULT_VAULTS_ANALYSER_API_URL: &str = "https://vaults-analyser.com/pub_api/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub hyperliquid_api_url: String,
    pub vault_address: String,
    pub vaults_analyser_api_url: String,
    pub vaults_analyser_token: Option<String>,
    pub boundary_tolerance_ms: i64,
    pub period_preference: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let hyperliquid_api_url = env_map
            .get("HYPERLIQUID_API_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_HYPERLIQUID_API_URL.to_string());

        let vault_address = env_map
            .get("VAULT_ADDRESS")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| HLP_VAULT_ADDRESS.to_string());
        if vault_address.parse::<crate::domain::Address>().is_err() {
            return Err(ConfigError::InvalidValue(
                "VAULT_ADDRESS".to_string(),
                "must be a 0x-prefixed 42 character hex address".to_string(),
            ));
        }

        let vaults_analyser_api_url = env_map
            .get("VAULTS_ANALYSER_API_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_VAULTS_ANALYSER_API_URL.to_string());

        let vaults_analyser_token = env_map
            .get("VAULTS_ANALYSER_TOKEN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let boundary_tolerance_ms = match env_map.get("BOUNDARY_TOLERANCE_MS") {
            None => DEFAULT_BOUNDARY_TOLERANCE_MS,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ms| *ms >= 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "BOUNDARY_TOLERANCE_MS".to_string(),
                        "must be a non-negative i64".to_string(),
                    )
                })?,
        };

        let period_preference = parse_period_preference_from_map(&env_map)?;

        Ok(Config {
            port,
            database_path,
            hyperliquid_api_url,
            vault_address,
            vaults_analyser_api_url,
            vaults_analyser_token,
            boundary_tolerance_ms,
            period_preference,
        })
    }

    /// Heuristics for the windowed metrics extractor.
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            period_preference: self.period_preference.clone(),
            boundary_tolerance_ms: self.boundary_tolerance_ms,
        }
    }
}

fn parse_period_preference_from_map(
    env_map: &HashMap<String, String>,
) -> Result<Vec<String>, ConfigError> {
    let Some(raw) = env_map.get("PERIOD_PREFERENCE") else {
        return Ok(ExtractorConfig::default().period_preference);
    };

    let periods: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if periods.is_empty() {
        return Err(ConfigError::InvalidValue(
            "PERIOD_PREFERENCE".to_string(),
            "must list at least one period".to_string(),
        ));
    }
    Ok(periods)
}
