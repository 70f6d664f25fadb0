//! Annualized vault return from the `allTime` series.

use crate::domain::{PeriodSeries, VaultSnapshot};

const MS_PER_DAY: f64 = 86_400_000.0;

pub const ALL_TIME_PERIOD: &str = "allTime";

/// Simple (non-compounded) annualized return in percent.
///
/// Prefers cumulative PnL over the vault's implied starting TVL; falls back
/// to account-value growth. `None` when the series cannot support either.
pub fn annualized_return(snapshot: &VaultSnapshot) -> Option<f64> {
    let series = snapshot.period(ALL_TIME_PERIOD)?;
    if series.pnl_history.len() >= 2 {
        from_pnl(series)
    } else {
        from_account_value(series)
    }
}

fn from_pnl(series: &PeriodSeries) -> Option<f64> {
    let first = series.pnl_history.first()?;
    let last = series.pnl_history.last()?;
    let total_pnl = last.value - first.value;
    let days = (last.time_ms.as_ms() - first.time_ms.as_ms()) as f64 / MS_PER_DAY;
    let current_tvl = series.latest_account_value()?;

    if days <= 0.0 || current_tvl <= 0.0 || total_pnl == 0.0 {
        return None;
    }
    let initial_tvl = current_tvl - total_pnl;
    if initial_tvl <= 0.0 {
        return None;
    }
    let total_return = total_pnl / initial_tvl * 100.0;
    Some(total_return / days * 365.0)
}

fn from_account_value(series: &PeriodSeries) -> Option<f64> {
    let history = &series.account_value_history;
    if history.len() < 2 {
        return None;
    }
    let first = history.first()?;
    let last = history.last()?;
    let days = (last.time_ms.as_ms() - first.time_ms.as_ms()) as f64 / MS_PER_DAY;

    if days <= 0.0 || first.value <= 0.0 {
        return None;
    }
    let total_return = (last.value - first.value) / first.value * 100.0;
    Some(total_return / days * 365.0)
}
