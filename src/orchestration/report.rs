use crate::datasource::{DirectorySource, VaultDataSource};
use crate::domain::{
    Address, DirectoryRecord, PositionPnl, TimeMs, UserPosition, VaultEquity, VaultSnapshot,
    WindowMetrics, WindowSpec,
};
use crate::engine::{
    annualized_return, ExtractorConfig, PositionPnlEstimator, PositionResolver,
    WindowedMetricsExtractor,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything known about one wallet's vault performance over one window.
///
/// `None` fields mean "not available" and must not be shown as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub wallet: Address,
    pub vault_address: Address,
    pub window: WindowSpec,
    pub snapshot_available: bool,
    pub vault: WindowMetrics,
    pub vault_tvl_now: Option<f64>,
    pub apr: Option<f64>,
    pub position: Option<UserPosition>,
    pub position_pnl: Option<PositionPnl>,
    pub all_time_pnl_percent: Option<f64>,
    pub generated_at_ms: TimeMs,
}

/// Fetches the venue and directory inputs for a wallet and runs them through
/// the reconciliation engine.
#[derive(Clone)]
pub struct ReportService {
    venue: Arc<dyn VaultDataSource>,
    directory: Arc<dyn DirectorySource>,
    positions: PositionResolver,
    extractor: WindowedMetricsExtractor,
    estimator: PositionPnlEstimator,
}

impl ReportService {
    pub fn new(
        venue: Arc<dyn VaultDataSource>,
        directory: Arc<dyn DirectorySource>,
        vault_address: Address,
        extractor_config: ExtractorConfig,
    ) -> Self {
        Self {
            venue,
            directory,
            positions: PositionResolver::new(vault_address),
            extractor: WindowedMetricsExtractor::new(extractor_config),
            estimator: PositionPnlEstimator::new(),
        }
    }

    pub fn vault_address(&self) -> &Address {
        self.positions.vault_address()
    }

    /// Build a report. Upstream failures degrade to "no data" and never fail
    /// the report itself.
    pub async fn build_report(&self, wallet: &Address, window: WindowSpec) -> Report {
        let vault = self.vault_address().as_str();

        let (snapshot, live, directory) = futures::join!(
            self.venue.fetch_vault_snapshot(vault),
            self.venue.fetch_user_vault_equities(wallet.as_str()),
            self.directory.fetch_depositors(vault),
        );

        let (snapshot, snapshot_available) = match snapshot {
            Ok(snapshot) => (snapshot, true),
            Err(e) => {
                warn!(error = %e, "Vault snapshot unavailable");
                (VaultSnapshot::empty(), false)
            }
        };
        let live: Vec<VaultEquity> = live.unwrap_or_else(|e| {
            warn!(wallet = %wallet.short(), error = %e, "Live equity lookup failed");
            Vec::new()
        });
        let directory: Vec<DirectoryRecord> = directory.unwrap_or_else(|e| {
            warn!(error = %e, "Directory lookup failed");
            Vec::new()
        });

        self.assemble(wallet, window, &snapshot, snapshot_available, &live, &directory)
    }

    /// The pure half of [`ReportService::build_report`].
    pub fn assemble(
        &self,
        wallet: &Address,
        window: WindowSpec,
        snapshot: &VaultSnapshot,
        snapshot_available: bool,
        live: &[VaultEquity],
        directory: &[DirectoryRecord],
    ) -> Report {
        let position = self
            .positions
            .resolve(wallet, live, directory, &snapshot.followers);
        let vault = self.extractor.extract(snapshot, &window);
        let vault_tvl_now = self.extractor.current_tvl(snapshot);

        let position_pnl = match &position {
            Some(p) if vault.is_resolved() => Some(self.estimator.estimate(
                p.equity,
                &vault,
                vault_tvl_now.unwrap_or(0.0),
            )),
            _ => None,
        };

        info!(
            wallet = %wallet.short(),
            %window,
            equity_source = ?position.as_ref().map(|p| p.equity_source),
            basis_source = ?position.as_ref().and_then(|p| p.basis_source),
            metrics = ?vault.method,
            estimate = ?position_pnl.map(|p| p.method),
            "Report assembled"
        );

        Report {
            wallet: wallet.clone(),
            vault_address: self.vault_address().clone(),
            window,
            snapshot_available,
            vault,
            vault_tvl_now,
            apr: annualized_return(snapshot),
            all_time_pnl_percent: position.as_ref().and_then(UserPosition::all_time_pnl_percent),
            position,
            position_pnl,
            generated_at_ms: TimeMs::now(),
        }
    }
}
