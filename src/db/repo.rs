//! Wallet registrations: which address a client id reports on.

use crate::domain::{Address, TimeMs};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use thiserror::Error;

/// A client id bound to a wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub address: Address,
    pub updated_at_ms: TimeMs,
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("stored address for {id} is invalid: {address}")]
    Corrupt { id: String, address: String },
}

/// Key-value storage for registrations.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Registration>, RegistrationError>;

    /// Insert or replace the address registered under `id`.
    async fn put(&self, id: &str, address: &Address) -> Result<Registration, RegistrationError>;

    /// Cheap round trip to the backing store, used for readiness.
    async fn ping(&self) -> Result<(), RegistrationError>;
}

/// SQLite-backed registration repository.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }
}

#[async_trait]
impl RegistrationStore for Repository {
    async fn get(&self, id: &str) -> Result<Option<Registration>, RegistrationError> {
        let row = sqlx::query("SELECT id, address, updated_at FROM registrations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let address: String = row.get("address");
        let address = address
            .parse::<Address>()
            .map_err(|_| RegistrationError::Corrupt {
                id: id.to_string(),
                address: address.clone(),
            })?;

        Ok(Some(Registration {
            id: row.get("id"),
            address,
            updated_at_ms: TimeMs::new(row.get::<i64, _>("updated_at")),
        }))
    }

    async fn put(&self, id: &str, address: &Address) -> Result<Registration, RegistrationError> {
        let now = TimeMs::now();
        sqlx::query(
            r#"
            INSERT INTO registrations (id, address, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                address = excluded.address,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(address.as_str())
        .bind(now.as_ms())
        .bind(now.as_ms())
        .execute(&self.pool)
        .await?;

        tracing::info!(id, address = %address.short(), "Stored registration");

        Ok(Registration {
            id: id.to_string(),
            address: address.clone(),
            updated_at_ms: now,
        })
    }

    async fn ping(&self) -> Result<(), RegistrationError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    const WALLET_A: &str = "0xec0cf15a2857d39f9ff55bc532a977fa590e5161";
    const WALLET_B: &str = "0x0000000000000000000000000000000000000001";

    async fn setup_repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let (repo, _temp) = setup_repo().await;
        assert_eq!(repo.get("42").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (repo, _temp) = setup_repo().await;
        let address: Address = WALLET_A.parse().unwrap();

        let stored = repo.put("42", &address).await.unwrap();
        let loaded = repo.get("42").await.unwrap().unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(loaded.address, address);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let (repo, _temp) = setup_repo().await;

        repo.put("42", &WALLET_A.parse().unwrap()).await.unwrap();
        repo.put("42", &WALLET_B.parse().unwrap()).await.unwrap();

        let loaded = repo.get("42").await.unwrap().unwrap();
        assert_eq!(loaded.address.as_str(), WALLET_B);

        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registrations")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_ping() {
        let (repo, _temp) = setup_repo().await;
        repo.ping().await.unwrap();

        repo.pool.close().await;
        assert!(matches!(repo.ping().await, Err(RegistrationError::Db(_))));
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let (repo, _temp) = setup_repo().await;
        sqlx::query(
            "INSERT INTO registrations (id, address, created_at, updated_at) \
             VALUES ('7', 'nope', 0, 0)",
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let err = repo.get("7").await.unwrap_err();
        assert!(matches!(err, RegistrationError::Corrupt { .. }));
    }
}
