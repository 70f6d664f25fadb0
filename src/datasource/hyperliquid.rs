//! Hyperliquid Info API client.

use super::{DataSourceError, VaultDataSource};
use crate::domain::{VaultEquity, VaultSnapshot};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Hyperliquid data source using the public Info API.
#[derive(Debug, Clone)]
pub struct HyperliquidDataSource {
    client: Client,
    base_url: String,
}

impl HyperliquidDataSource {
    /// Create a new Hyperliquid data source.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_info(
        &self,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, DataSourceError> {
        let url = format!("{}/info", self.base_url);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(DataSourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(DataSourceError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl VaultDataSource for HyperliquidDataSource {
    async fn fetch_vault_snapshot(&self, vault: &str) -> Result<VaultSnapshot, DataSourceError> {
        debug!("Fetching vault details for vault={}", vault);

        let payload = serde_json::json!({
            "type": "vaultDetails",
            "vaultAddress": vault
        });

        let response = self.post_info(payload).await?;
        if response.is_null() {
            return Err(DataSourceError::NotFound(format!("vault {}", vault)));
        }
        if !response.is_object() {
            return Err(DataSourceError::ParseError("Expected object response".to_string()));
        }

        Ok(VaultSnapshot::from_json(&response))
    }

    async fn fetch_user_vault_equities(
        &self,
        user: &str,
    ) -> Result<Vec<VaultEquity>, DataSourceError> {
        debug!("Fetching vault equities for user={}", user);

        let payload = serde_json::json!({
            "type": "userVaultEquities",
            "user": user
        });

        let response = self.post_info(payload).await?;
        parse_vault_equities(&response)
    }
}

fn parse_vault_equities(response: &serde_json::Value) -> Result<Vec<VaultEquity>, DataSourceError> {
    let entries = response
        .as_array()
        .ok_or_else(|| DataSourceError::ParseError("Expected array response".to_string()))?;

    let mut equities = Vec::new();
    for entry in entries {
        match VaultEquity::from_json(entry) {
            Some(equity) => equities.push(equity),
            None => warn!("Failed to parse vault equity entry: {}", entry),
        }
    }

    Ok(equities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeMs;

    #[test]
    fn test_parse_vault_equities_valid() {
        let response = serde_json::json!([
            {
                "vaultAddress": "0xdfc24b077bc1425ad1dea75bcb6f8158e10df303",
                "equity": "5000.123",
                "lockedUntilTimestamp": 1_700_000_000_000i64
            },
            {"equity": "1"}
        ]);

        let equities = parse_vault_equities(&response).unwrap();
        assert_eq!(equities.len(), 1);
        assert_eq!(equities[0].equity, Some(5000.123));
        assert_eq!(equities[0].locked_until, Some(TimeMs::new(1_700_000_000_000)));
    }

    #[test]
    fn test_parse_vault_equities_rejects_non_array() {
        let err = parse_vault_equities(&serde_json::json!({"error": "bad"})).unwrap_err();
        assert!(matches!(err, DataSourceError::ParseError(_)));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let ds = HyperliquidDataSource::new("https://api.hyperliquid.xyz/".to_string());
        assert_eq!(ds.base_url, "https://api.hyperliquid.xyz");
    }
}
