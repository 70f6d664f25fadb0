//! Domain types for vault performance reconciliation.
//!
//! This module provides:
//! - Domain primitives: TimeMs, Address
//! - Lenient numeric coercion for upstream payloads
//! - Vault snapshot, roster, directory and live-equity records
//! - Window specifications and the value objects the engine produces

pub mod numeric;
pub mod position;
pub mod primitives;
pub mod snapshot;
pub mod window;

pub use position::{DepositBasis, DirectoryRecord, PositionSource, UserPosition, VaultEquity};
pub use primitives::{Address, AddressParseError, TimeMs};
pub use snapshot::{Follower, PeriodSeries, SeriesPoint, VaultSnapshot};
pub use window::{EstimateMethod, MetricsMethod, PositionPnl, WindowMetrics, WindowSpec};
