//! vaults-analyser.com depositor directory client.

use super::{DataSourceError, DirectorySource};
use crate::domain::DirectoryRecord;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Directory source backed by the vaults-analyser public API.
///
/// The API requires a bearer token; without one the directory is treated as
/// empty.
#[derive(Debug, Clone)]
pub struct VaultsAnalyserSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl VaultsAnalyserSource {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn depositors_url(&self, vault: &str) -> String {
        format!("{}/depositors/{}", self.base_url, vault)
    }
}

#[async_trait]
impl DirectorySource for VaultsAnalyserSource {
    async fn fetch_depositors(&self, vault: &str) -> Result<Vec<DirectoryRecord>, DataSourceError> {
        let Some(token) = self.token.as_deref() else {
            debug!("No vaults-analyser token configured, skipping directory lookup");
            return Ok(Vec::new());
        };

        debug!("Fetching depositors for vault={}", vault);
        let response = self
            .client
            .get(self.depositors_url(vault))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| DataSourceError::NetworkError(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => return Err(DataSourceError::Unauthorized),
            StatusCode::NOT_FOUND => {
                return Err(DataSourceError::NotFound(format!("vault {}", vault)))
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(DataSourceError::RateLimited),
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: body.chars().take(200).collect(),
                });
            }
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| DataSourceError::ParseError(e.to_string()))?;

        Ok(parse_depositors(&body))
    }
}

/// Accepts either `{"data": [...]}` or a bare array; anything else is empty.
fn parse_depositors(body: &serde_json::Value) -> Vec<DirectoryRecord> {
    let rows = body
        .get("data")
        .and_then(|d| d.as_array())
        .or_else(|| body.as_array());

    let Some(rows) = rows else {
        warn!("Unexpected depositors payload shape");
        return Vec::new();
    };

    rows.iter().filter_map(DirectoryRecord::from_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_depositors_wrapped() {
        let body = json!({"data": [
            {"user": "0xabc", "vault_equity": "1200", "all_time_pnl": "200", "pnl": "1"},
            {"vault_equity": "1"}
        ]});
        let records = parse_depositors(&body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].wallet, "0xabc");
        assert_eq!(records[0].vault_equity, Some(1200.0));
    }

    #[test]
    fn test_parse_depositors_bare_array() {
        let body = json!([{"user": "0xabc", "vault_equity": 10}]);
        let records = parse_depositors(&body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].all_time_pnl, None);
    }

    #[test]
    fn test_parse_depositors_unexpected_shape() {
        assert!(parse_depositors(&json!({"message": "hi"})).is_empty());
    }

    #[tokio::test]
    async fn test_no_token_yields_empty_directory() {
        let source = VaultsAnalyserSource::new(
            "http://example.invalid/".to_string(),
            Some("  ".to_string()),
        );
        assert_eq!(source.depositors_url("0x1"), "http://example.invalid/depositors/0x1");
        let records = source.fetch_depositors("0x1").await.unwrap();
        assert!(records.is_empty());
    }
}
