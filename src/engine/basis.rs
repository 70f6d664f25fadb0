//! Cost basis (initial deposit) and all-time PnL for a wallet.

use crate::domain::{Address, DepositBasis, DirectoryRecord, Follower, PositionSource};
use tracing::debug;

/// Derives a wallet's initial deposit from whichever source reports both its
/// equity and all-time PnL, then restates all-time PnL against the
/// authoritative current equity.
///
/// Fields are never mixed across sources: `initial_deposit` is always
/// `vault_equity - all_time_pnl` taken from one record.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepositBasisResolver;

impl DepositBasisResolver {
    pub fn new() -> Self {
        Self
    }

    /// Returns `None` when no source carries a complete pair; callers render
    /// that as "not available" rather than inventing a basis.
    pub fn resolve_basis(
        &self,
        wallet: &Address,
        equity_now: f64,
        directory: &[DirectoryRecord],
        followers: &[Follower],
    ) -> Option<DepositBasis> {
        let from_directory = directory
            .iter()
            .find(|r| wallet.matches(&r.wallet))
            .and_then(|r| {
                Self::basis_from(
                    equity_now,
                    r.vault_equity,
                    r.all_time_pnl,
                    r.pnl,
                    PositionSource::Directory,
                )
            });

        let basis = from_directory.or_else(|| {
            followers
                .iter()
                .find(|f| wallet.matches(&f.user))
                .and_then(|f| {
                    Self::basis_from(
                        equity_now,
                        f.vault_equity,
                        f.all_time_pnl,
                        f.pnl,
                        PositionSource::Follower,
                    )
                })
        });

        match &basis {
            Some(b) => debug!(
                wallet = %wallet.short(),
                source = %b.source,
                initial_deposit = b.initial_deposit,
                all_time_pnl = b.all_time_pnl,
                "Resolved deposit basis"
            ),
            None => debug!(wallet = %wallet.short(), "No source reported a deposit basis"),
        }
        basis
    }

    fn basis_from(
        equity_now: f64,
        source_equity: Option<f64>,
        source_all_time_pnl: Option<f64>,
        pnl: Option<f64>,
        source: PositionSource,
    ) -> Option<DepositBasis> {
        let initial_deposit = source_equity? - source_all_time_pnl?;
        Some(DepositBasis {
            initial_deposit,
            all_time_pnl: equity_now - initial_deposit,
            pnl,
            source,
        })
    }
}
