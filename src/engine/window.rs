//! Vault-level TVL and return over a window, from irregular time-series samples.

use crate::domain::{
    MetricsMethod, PeriodSeries, SeriesPoint, TimeMs, VaultSnapshot, WindowMetrics, WindowSpec,
};
use tracing::debug;

pub const DEFAULT_BOUNDARY_TOLERANCE_MS: i64 = 6 * 60 * 60 * 1000;

/// Heuristics used when choosing and reading a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Period names from most to least granular.
    pub period_preference: Vec<String>,
    /// Maximum distance between a calendar boundary and the sample standing in for it.
    pub boundary_tolerance_ms: i64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            period_preference: ["day", "week", "month", "allTime"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            boundary_tolerance_ms: DEFAULT_BOUNDARY_TOLERANCE_MS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WindowedMetricsExtractor {
    config: ExtractorConfig,
}

impl WindowedMetricsExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Compute TVL and return for `window`.
    ///
    /// Never fails: a snapshot without usable samples yields
    /// [`WindowMetrics::unresolved`].
    pub fn extract(&self, snapshot: &VaultSnapshot, window: &WindowSpec) -> WindowMetrics {
        let Some((period, series)) = self.select_series(snapshot, window) else {
            debug!(%window, "No usable period series in snapshot");
            return WindowMetrics::unresolved();
        };

        let account: Vec<SeriesPoint> = in_window(&series.account_value_history, window);
        let pnl: Vec<SeriesPoint> = in_window(&series.pnl_history, window);

        // PnL differencing still needs an account value to express the
        // return against and to report as TVL.
        let metrics = if pnl.len() >= 2 && !account.is_empty() {
            let pnl_amount = pnl[pnl.len() - 1].value - pnl[0].value;
            let start_value = account[0].value;
            let end_value = account[account.len() - 1].value;
            WindowMetrics {
                tvl: end_value,
                pnl_percent: percent_of(pnl_amount, start_value),
                pnl_amount,
                start_value,
                end_value,
                method: MetricsMethod::PnlHistory,
            }
        } else if account.len() >= 2 {
            let start_value = account[0].value;
            let end_value = account[account.len() - 1].value;
            let pnl_amount = end_value - start_value;
            WindowMetrics {
                tvl: end_value,
                pnl_percent: percent_of(pnl_amount, start_value),
                pnl_amount,
                start_value,
                end_value,
                method: MetricsMethod::AccountValue,
            }
        } else if let Some((start, end)) = window.bounds() {
            self.nearest_boundaries(series, start, end)
                .unwrap_or_else(WindowMetrics::unresolved)
        } else {
            WindowMetrics::unresolved()
        };

        debug!(
            %window,
            period,
            method = ?metrics.method,
            account_points = account.len(),
            pnl_points = pnl.len(),
            pnl_percent = metrics.pnl_percent,
            "Extracted window metrics"
        );
        metrics
    }

    /// The vault's latest account value, read from the most granular series.
    pub fn current_tvl(&self, snapshot: &VaultSnapshot) -> Option<f64> {
        self.config
            .period_preference
            .iter()
            .filter_map(|name| snapshot.period(name))
            .find_map(PeriodSeries::latest_account_value)
    }

    /// Pick the most granular series that could contain the window.
    ///
    /// A series qualifies for a calendar window when its history reaches back
    /// to the window start (within tolerance) and does not end before it.
    /// When none qualifies the coarsest non-empty series is used, since it
    /// holds the most history.
    fn select_series<'a>(
        &self,
        snapshot: &'a VaultSnapshot,
        window: &WindowSpec,
    ) -> Option<(&'a str, &'a PeriodSeries)> {
        let candidates: Vec<(&str, &PeriodSeries)> = self
            .config
            .period_preference
            .iter()
            .filter_map(|name| {
                snapshot
                    .periods
                    .get_key_value(name)
                    .map(|(k, v)| (k.as_str(), v))
            })
            .filter(|(_, series)| !series.is_empty())
            .collect();

        let Some((start, _)) = window.bounds() else {
            return candidates.first().copied();
        };

        let tolerance = self.config.boundary_tolerance_ms;
        candidates
            .iter()
            .find(|(_, series)| {
                series.span().is_some_and(|(first, last)| {
                    first.as_ms() <= start.as_ms().saturating_add(tolerance)
                        && last.as_ms() >= start.as_ms().saturating_sub(tolerance)
                })
            })
            .or_else(|| candidates.last())
            .copied()
    }

    /// Stand in for a sparsely sampled calendar window using the samples
    /// closest to each boundary.
    fn nearest_boundaries(
        &self,
        series: &PeriodSeries,
        start: TimeMs,
        end: TimeMs,
    ) -> Option<WindowMetrics> {
        let tolerance = self.config.boundary_tolerance_ms;
        let account = &series.account_value_history;

        let (Some(first), Some(last)) = (
            nearest(account, start, tolerance),
            nearest(account, end, tolerance),
        ) else {
            debug!(
                start = start.as_ms(),
                end = end.as_ms(),
                tolerance,
                "No account samples near window boundaries"
            );
            return None;
        };
        if first.time_ms >= last.time_ms {
            return None;
        }

        let pnl_amount = match (
            nearest(&series.pnl_history, start, tolerance),
            nearest(&series.pnl_history, end, tolerance),
        ) {
            (Some(p0), Some(p1)) if p0.time_ms < p1.time_ms => p1.value - p0.value,
            _ => last.value - first.value,
        };

        Some(WindowMetrics {
            tvl: last.value,
            pnl_percent: percent_of(pnl_amount, first.value),
            pnl_amount,
            start_value: first.value,
            end_value: last.value,
            method: MetricsMethod::BoundaryNearest,
        })
    }
}

fn in_window(points: &[SeriesPoint], window: &WindowSpec) -> Vec<SeriesPoint> {
    points
        .iter()
        .filter(|p| window.contains(p.time_ms))
        .copied()
        .collect()
}

fn nearest(points: &[SeriesPoint], target: TimeMs, tolerance: i64) -> Option<SeriesPoint> {
    points
        .iter()
        .filter(|p| p.time_ms.distance(target) <= tolerance)
        .min_by_key(|p| p.time_ms.distance(target))
        .copied()
}

fn percent_of(amount: f64, base: f64) -> f64 {
    if base > 0.0 {
        amount / base * 100.0
    } else {
        0.0
    }
}
