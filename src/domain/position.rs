//! Per-wallet records from upstream sources and the resolved position.

use crate::domain::numeric::{coerce_field, coerce_timestamp};
use crate::domain::TimeMs;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A directory service's summary of one depositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub wallet: String,
    pub vault_equity: Option<f64>,
    pub all_time_pnl: Option<f64>,
    pub pnl: Option<f64>,
}

impl DirectoryRecord {
    pub fn new(
        wallet: impl Into<String>,
        vault_equity: Option<f64>,
        all_time_pnl: Option<f64>,
        pnl: Option<f64>,
    ) -> Self {
        Self {
            wallet: wallet.into(),
            vault_equity,
            all_time_pnl,
            pnl,
        }
    }

    /// Parse a `{user, vault_equity, all_time_pnl, pnl}` depositor row.
    pub fn from_json(obj: &Value) -> Option<Self> {
        let wallet = obj.get("user")?.as_str()?.to_string();
        Some(Self {
            wallet,
            vault_equity: coerce_field(obj, "vault_equity"),
            all_time_pnl: coerce_field(obj, "all_time_pnl"),
            pnl: coerce_field(obj, "pnl"),
        })
    }
}

/// One entry of the venue's live per-user vault equity listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultEquity {
    pub vault_address: String,
    pub equity: Option<f64>,
    pub locked_until: Option<TimeMs>,
}

impl VaultEquity {
    pub fn new(
        vault_address: impl Into<String>,
        equity: Option<f64>,
        locked_until: Option<i64>,
    ) -> Self {
        Self {
            vault_address: vault_address.into(),
            equity,
            locked_until: locked_until.map(TimeMs::new),
        }
    }

    /// Parse a `{vaultAddress, equity, lockedUntilTimestamp}` entry.
    pub fn from_json(obj: &Value) -> Option<Self> {
        let vault_address = obj.get("vaultAddress")?.as_str()?.to_string();
        Some(Self {
            vault_address,
            equity: coerce_field(obj, "equity"),
            locked_until: obj
                .get("lockedUntilTimestamp")
                .and_then(coerce_timestamp)
                .filter(|ts| *ts > 0)
                .map(TimeMs::new),
        })
    }
}

/// Which source supplied a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    /// The venue's live equity listing.
    Live,
    /// The top-N roster embedded in the vault snapshot.
    Follower,
    /// The external depositor directory.
    Directory,
}

impl std::fmt::Display for PositionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionSource::Live => write!(f, "live"),
            PositionSource::Follower => write!(f, "follower"),
            PositionSource::Directory => write!(f, "directory"),
        }
    }
}

/// Cost basis derived from a single source's `(vaultEquity, allTimePnl)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositBasis {
    pub initial_deposit: f64,
    /// All-time PnL restated against the authoritative current equity.
    pub all_time_pnl: f64,
    /// The source's own recent PnL figure, when it reported one.
    pub pnl: Option<f64>,
    pub source: PositionSource,
}

/// A wallet's resolved position in the vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPosition {
    pub equity: f64,
    pub equity_source: PositionSource,
    pub locked_until: Option<TimeMs>,
    pub pnl: Option<f64>,
    pub all_time_pnl: Option<f64>,
    pub initial_deposit: Option<f64>,
    pub basis_source: Option<PositionSource>,
}

impl UserPosition {
    /// Position with equity only; basis fields unresolved.
    pub fn with_equity(equity: f64, equity_source: PositionSource) -> Self {
        Self {
            equity,
            equity_source,
            locked_until: None,
            pnl: None,
            all_time_pnl: None,
            initial_deposit: None,
            basis_source: None,
        }
    }

    pub fn locked_until(mut self, locked_until: Option<TimeMs>) -> Self {
        self.locked_until = locked_until;
        self
    }

    /// Attach a resolved basis.
    pub fn with_basis(mut self, basis: DepositBasis) -> Self {
        self.initial_deposit = Some(basis.initial_deposit);
        self.all_time_pnl = Some(basis.all_time_pnl);
        self.basis_source = Some(basis.source);
        if self.pnl.is_none() {
            self.pnl = basis.pnl;
        }
        self
    }

    /// All-time return on the initial deposit, in percent.
    pub fn all_time_pnl_percent(&self) -> Option<f64> {
        match (self.all_time_pnl, self.initial_deposit) {
            (Some(pnl), Some(deposit)) if deposit > 0.0 => Some(pnl / deposit * 100.0),
            _ => None,
        }
    }
}
