//! Per-position PnL over a window, estimated from the vault's return.
//!
//! Per-user equity history is not available, so the position's share of the
//! vault is assumed constant between the window end and now. The result is an
//! approximation and is labelled as such by [`EstimateMethod`].

use crate::domain::{EstimateMethod, PositionPnl, WindowMetrics};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct PositionPnlEstimator;

impl PositionPnlEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate the PnL of a position currently worth `equity_now` over the
    /// window described by `window`, given the vault's TVL now.
    pub fn estimate(
        &self,
        equity_now: f64,
        window: &WindowMetrics,
        vault_tvl_now: f64,
    ) -> PositionPnl {
        let pnl_percent = window.pnl_percent;

        if vault_tvl_now <= 0.0 || window.end_value <= 0.0 {
            debug!(
                vault_tvl_now,
                end_value = window.end_value,
                "Degenerate TVL, using proportional estimate"
            );
            return PositionPnl {
                pnl_amount: equity_now * (pnl_percent / 100.0),
                pnl_percent,
                method: EstimateMethod::Proportional,
            };
        }

        let end_equity = equity_now * (window.end_value / vault_tvl_now);
        let growth = 1.0 + pnl_percent / 100.0;

        // A -100% window (or worse) leaves nothing to back the start out of.
        if growth <= 0.0 {
            debug!(end_equity, pnl_percent, "Window return is a total loss");
            return PositionPnl {
                pnl_amount: -end_equity,
                pnl_percent,
                method: EstimateMethod::TotalLoss,
            };
        }

        let start_equity = end_equity / growth;
        PositionPnl {
            pnl_amount: end_equity - start_equity,
            pnl_percent,
            method: EstimateMethod::BackProjected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MetricsMethod;

    fn metrics(pnl_percent: f64, end_value: f64) -> WindowMetrics {
        WindowMetrics {
            tvl: end_value,
            pnl_percent,
            pnl_amount: 0.0,
            start_value: 0.0,
            end_value,
            method: MetricsMethod::PnlHistory,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn back_projects_from_window_return() {
        // 10% return, window end equals now: 1100 now means 1000 at start.
        let pnl = PositionPnlEstimator::new().estimate(1100.0, &metrics(10.0, 5000.0), 5000.0);
        assert_eq!(pnl.method, EstimateMethod::BackProjected);
        assert_close(pnl.pnl_amount, 100.0);
        assert_eq!(pnl.pnl_percent, 10.0);
    }

    #[test]
    fn scales_equity_to_window_end() {
        // The vault was half its current size at the window end.
        let pnl = PositionPnlEstimator::new().estimate(2200.0, &metrics(10.0, 5000.0), 10_000.0);
        assert_close(pnl.pnl_amount, 100.0);
    }

    #[test]
    fn total_loss_does_not_divide_by_zero() {
        let pnl = PositionPnlEstimator::new().estimate(1000.0, &metrics(-100.0, 5000.0), 10_000.0);
        assert_eq!(pnl.method, EstimateMethod::TotalLoss);
        assert_close(pnl.pnl_amount, -500.0);
        assert!(pnl.pnl_amount.is_finite());
    }

    #[test]
    fn zero_tvl_uses_proportional_formula() {
        let pnl = PositionPnlEstimator::new().estimate(1000.0, &metrics(2.5, 5000.0), 0.0);
        assert_eq!(pnl.method, EstimateMethod::Proportional);
        assert_close(pnl.pnl_amount, 25.0);
    }

    #[test]
    fn unresolved_window_end_uses_proportional_formula() {
        let pnl =
            PositionPnlEstimator::new().estimate(1000.0, &WindowMetrics::unresolved(), 5000.0);
        assert_eq!(pnl.method, EstimateMethod::Proportional);
        assert_eq!(pnl.pnl_amount, 0.0);
    }

    #[test]
    fn negative_return() {
        let pnl = PositionPnlEstimator::new().estimate(900.0, &metrics(-10.0, 100.0), 100.0);
        assert_eq!(pnl.method, EstimateMethod::BackProjected);
        assert_close(pnl.pnl_amount, -100.0);
    }
}
