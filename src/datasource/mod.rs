//! Data source abstraction for the venue and the depositor directory.

use crate::domain::{DirectoryRecord, VaultEquity, VaultSnapshot};
use async_trait::async_trait;
use std::fmt;

pub mod hyperliquid;
pub mod mock;
pub mod vaults_analyser;

pub use hyperliquid::HyperliquidDataSource;
pub use mock::MockDataSource;
pub use vaults_analyser::VaultsAnalyserSource;

/// The venue: vault snapshots and live per-user vault equity.
///
/// Implementations handle retry/backoff and rate limiting themselves.
#[async_trait]
pub trait VaultDataSource: Send + Sync + fmt::Debug {
    /// Fetch the vault's period histories and top-N depositor roster.
    ///
    /// # Arguments
    /// * `vault` - Vault address
    async fn fetch_vault_snapshot(&self, vault: &str) -> Result<VaultSnapshot, DataSourceError>;

    /// Fetch a user's equity in every vault they hold, with lock-up times.
    ///
    /// # Arguments
    /// * `user` - User address
    ///
    /// # Returns
    /// One entry per vault; callers pick out the vault they care about.
    async fn fetch_user_vault_equities(
        &self,
        user: &str,
    ) -> Result<Vec<VaultEquity>, DataSourceError>;
}

/// A directory of vault depositors with historical PnL summaries.
#[async_trait]
pub trait DirectorySource: Send + Sync + fmt::Debug {
    /// Fetch every depositor record the directory holds for a vault.
    async fn fetch_depositors(&self, vault: &str) -> Result<Vec<DirectoryRecord>, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
    /// Missing, invalid or expired credentials
    Unauthorized,
    /// The upstream does not know the requested resource
    NotFound(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::RateLimited => write!(f, "Rate limited"),
            DataSourceError::Unauthorized => write!(f, "Unauthorized"),
            DataSourceError::NotFound(what) => write!(f, "Not found: {}", what),
        }
    }
}

impl std::error::Error for DataSourceError {}
