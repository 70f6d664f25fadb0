//! Pure reconciliation engine over already-fetched vault data.
//!
//! Every component here is synchronous and side-effect free apart from
//! tracing events; all inputs are snapshots supplied by the caller.

pub mod apr;
pub mod basis;
pub mod estimator;
pub mod position;
pub mod window;

pub use apr::annualized_return;
pub use basis::DepositBasisResolver;
pub use estimator::PositionPnlEstimator;
pub use position::PositionResolver;
pub use window::{ExtractorConfig, WindowedMetricsExtractor, DEFAULT_BOUNDARY_TOLERANCE_MS};
