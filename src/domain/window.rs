//! Window specifications and the metrics computed over them.

use crate::domain::TimeMs;
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// The span of time a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "camelCase")]
pub enum WindowSpec {
    /// The last 24 hours; bounds are implied by the venue's `day` series.
    Rolling,
    /// One UTC calendar day.
    CalendarDay(NaiveDate),
}

impl WindowSpec {
    /// `[start, end)` in UTC milliseconds, `None` for rolling windows.
    pub fn bounds(&self) -> Option<(TimeMs, TimeMs)> {
        match self {
            WindowSpec::Rolling => None,
            WindowSpec::CalendarDay(date) => {
                let start = date.and_time(NaiveTime::MIN).and_utc();
                let end = start + Duration::days(1);
                Some((
                    TimeMs::new(start.timestamp_millis()),
                    TimeMs::new(end.timestamp_millis()),
                ))
            }
        }
    }

    pub fn contains(&self, time_ms: TimeMs) -> bool {
        match self.bounds() {
            None => true,
            Some((start, end)) => time_ms >= start && time_ms < end,
        }
    }
}

impl std::fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowSpec::Rolling => write!(f, "rolling-24h"),
            WindowSpec::CalendarDay(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Which branch of the extractor produced a [`WindowMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsMethod {
    /// Differencing of the cumulative PnL history.
    PnlHistory,
    /// Account-value deltas, used when PnL history is too sparse.
    AccountValue,
    /// Nearest samples around sparse calendar-window boundaries.
    BoundaryNearest,
    /// No usable data; every figure is zero and means "unknown".
    Unresolved,
}

/// Vault-level figures over one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowMetrics {
    pub tvl: f64,
    pub pnl_percent: f64,
    pub pnl_amount: f64,
    pub start_value: f64,
    pub end_value: f64,
    pub method: MetricsMethod,
}

impl WindowMetrics {
    /// All-zero metrics that callers must render as "not available".
    pub fn unresolved() -> Self {
        Self {
            tvl: 0.0,
            pnl_percent: 0.0,
            pnl_amount: 0.0,
            start_value: 0.0,
            end_value: 0.0,
            method: MetricsMethod::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.method != MetricsMethod::Unresolved
    }
}

/// How a [`PositionPnl`] was estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateMethod {
    /// Equity scaled to the window end, start backed out from the return.
    BackProjected,
    /// The window returned -100%; the whole scaled equity was lost.
    TotalLoss,
    /// Current equity times the window return.
    Proportional,
}

/// Estimated PnL of one position over a window. An approximation, not a ledger figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionPnl {
    pub pnl_amount: f64,
    pub pnl_percent: f64,
    pub method: EstimateMethod,
}
