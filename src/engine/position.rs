//! Current equity and lock-up of a wallet's vault position.

use crate::domain::{
    Address, DirectoryRecord, Follower, PositionSource, UserPosition, VaultEquity,
};
use crate::engine::DepositBasisResolver;
use tracing::{debug, info};

/// Resolves a wallet's position across the live venue listing, the snapshot
/// roster and the directory, in that order of authority.
#[derive(Debug, Clone)]
pub struct PositionResolver {
    vault_address: Address,
    basis: DepositBasisResolver,
}

impl PositionResolver {
    pub fn new(vault_address: Address) -> Self {
        Self {
            vault_address,
            basis: DepositBasisResolver::new(),
        }
    }

    pub fn vault_address(&self) -> &Address {
        &self.vault_address
    }

    /// Resolve equity, then attach a deposit basis when one is available.
    ///
    /// `None` means no source knows the wallet, which is a reportable
    /// outcome rather than a fault.
    pub fn resolve(
        &self,
        wallet: &Address,
        live: &[VaultEquity],
        directory: &[DirectoryRecord],
        followers: &[Follower],
    ) -> Option<UserPosition> {
        let position = self.resolve_equity(wallet, live, directory, followers)?;

        match self
            .basis
            .resolve_basis(wallet, position.equity, directory, followers)
        {
            Some(basis) => Some(position.with_basis(basis)),
            None => Some(position),
        }
    }

    /// Equity only. The live listing is authoritative whenever it answers.
    pub fn resolve_equity(
        &self,
        wallet: &Address,
        live: &[VaultEquity],
        directory: &[DirectoryRecord],
        followers: &[Follower],
    ) -> Option<UserPosition> {
        if let Some(entry) = live
            .iter()
            .find(|e| self.vault_address.matches(&e.vault_address))
        {
            match entry.equity {
                Some(equity) => {
                    info!(wallet = %wallet.short(), source = "live", equity, "Resolved equity");
                    return Some(
                        UserPosition::with_equity(equity, PositionSource::Live)
                            .locked_until(entry.locked_until),
                    );
                }
                None => debug!(wallet = %wallet.short(), "Live entry has no numeric equity"),
            }
        }

        if let Some((equity, follower)) = followers
            .iter()
            .find(|f| wallet.matches(&f.user))
            .and_then(|f| f.vault_equity.map(|e| (e, f)))
        {
            info!(wallet = %wallet.short(), source = "follower", equity, "Resolved equity");
            let mut position = UserPosition::with_equity(equity, PositionSource::Follower);
            position.pnl = follower.pnl;
            return Some(position);
        }

        if let Some((equity, record)) = directory
            .iter()
            .find(|r| wallet.matches(&r.wallet))
            .and_then(|r| r.vault_equity.map(|e| (e, r)))
        {
            info!(wallet = %wallet.short(), source = "directory", equity, "Resolved equity");
            let mut position = UserPosition::with_equity(equity, PositionSource::Directory);
            position.pnl = record.pnl;
            return Some(position);
        }

        info!(wallet = %wallet.short(), "No source reported a position");
        None
    }
}
