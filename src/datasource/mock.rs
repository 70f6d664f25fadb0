//! Mock data source for testing without network calls.

use super::{DataSourceError, DirectorySource, VaultDataSource};
use crate::domain::{DirectoryRecord, VaultEquity, VaultSnapshot};
use async_trait::async_trait;
use std::collections::HashMap;

/// Mock venue and directory that return predefined test data.
///
/// Serves as both a [`VaultDataSource`] and a [`DirectorySource`].
#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    snapshot: Option<VaultSnapshot>,
    vault_equities: HashMap<String, Vec<VaultEquity>>,
    depositors: Vec<DirectoryRecord>,
    fail_snapshot: bool,
    fail_live: bool,
    fail_directory: bool,
}

impl MockDataSource {
    /// Create a new mock data source with empty data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snapshot returned for every vault.
    pub fn with_snapshot(mut self, snapshot: VaultSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Add a live vault equity entry for a user.
    pub fn with_vault_equity(mut self, user: &str, equity: VaultEquity) -> Self {
        self.vault_equities
            .entry(user.to_ascii_lowercase())
            .or_default()
            .push(equity);
        self
    }

    /// Add a directory record.
    pub fn with_depositor(mut self, record: DirectoryRecord) -> Self {
        self.depositors.push(record);
        self
    }

    /// Make snapshot fetches fail with a server error.
    pub fn failing_snapshot(mut self) -> Self {
        self.fail_snapshot = true;
        self
    }

    /// Make live equity lookups fail with a network error.
    pub fn failing_live(mut self) -> Self {
        self.fail_live = true;
        self
    }

    /// Make directory lookups fail as unauthorized.
    pub fn failing_directory(mut self) -> Self {
        self.fail_directory = true;
        self
    }
}

#[async_trait]
impl VaultDataSource for MockDataSource {
    async fn fetch_vault_snapshot(&self, vault: &str) -> Result<VaultSnapshot, DataSourceError> {
        if self.fail_snapshot {
            return Err(DataSourceError::HttpError {
                status: 503,
                message: "Server error".to_string(),
            });
        }
        self.snapshot
            .clone()
            .ok_or_else(|| DataSourceError::NotFound(format!("vault {}", vault)))
    }

    async fn fetch_user_vault_equities(
        &self,
        user: &str,
    ) -> Result<Vec<VaultEquity>, DataSourceError> {
        if self.fail_live {
            return Err(DataSourceError::NetworkError("connection refused".to_string()));
        }
        Ok(self
            .vault_equities
            .get(&user.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl DirectorySource for MockDataSource {
    async fn fetch_depositors(
        &self,
        _vault: &str,
    ) -> Result<Vec<DirectoryRecord>, DataSourceError> {
        if self.fail_directory {
            return Err(DataSourceError::Unauthorized);
        }
        Ok(self.depositors.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PeriodSeries;

    const VAULT: &str = "0xdfc24b077bc1425ad1dea75bcb6f8158e10df303";

    #[tokio::test]
    async fn test_mock_fetch_snapshot() {
        let snapshot =
            VaultSnapshot::empty().with_period("day", PeriodSeries::from_pairs(&[(0, 1.0)], &[]));
        let mock = MockDataSource::new().with_snapshot(snapshot.clone());
        assert_eq!(mock.fetch_vault_snapshot(VAULT).await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_mock_missing_snapshot_is_not_found() {
        let err = MockDataSource::new().fetch_vault_snapshot(VAULT).await.unwrap_err();
        assert!(matches!(err, DataSourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mock_vault_equities_keyed_case_insensitively() {
        let mock = MockDataSource::new()
            .with_vault_equity("0xABC", VaultEquity::new(VAULT, Some(5.0), None));
        let equities = mock.fetch_user_vault_equities("0xabc").await.unwrap();
        assert_eq!(equities.len(), 1);
        assert!(mock.fetch_user_vault_equities("0xdef").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_failures() {
        let mock = MockDataSource::new()
            .failing_snapshot()
            .failing_live()
            .failing_directory();
        assert!(mock.fetch_vault_snapshot(VAULT).await.is_err());
        assert!(mock.fetch_user_vault_equities("0xabc").await.is_err());
        assert!(matches!(
            mock.fetch_depositors(VAULT).await,
            Err(DataSourceError::Unauthorized)
        ));
    }
}
