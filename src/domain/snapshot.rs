//! Vault snapshot as reported by the venue's `vaultDetails` endpoint.

use crate::domain::numeric::{coerce_f64, coerce_field, coerce_timestamp};
use crate::domain::TimeMs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// One `(timestamp, value)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time_ms: TimeMs,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self {
            time_ms: TimeMs::new(time_ms),
            value,
        }
    }

    /// Parse a raw `[timestampMillis, value]` entry.
    ///
    /// Returns `None` for wrong arity, non-integer timestamps and non-numeric
    /// values.
    pub fn from_json(entry: &Value) -> Option<Self> {
        let pair = entry.as_array()?;
        if pair.len() < 2 {
            return None;
        }
        let time_ms = coerce_timestamp(&pair[0])?;
        let value = coerce_f64(&pair[1])?;
        Some(Self::new(time_ms, value))
    }
}

/// The two parallel histories the venue reports for one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSeries {
    pub account_value_history: Vec<SeriesPoint>,
    pub pnl_history: Vec<SeriesPoint>,
}

impl PeriodSeries {
    pub fn new(account_value_history: Vec<SeriesPoint>, pnl_history: Vec<SeriesPoint>) -> Self {
        Self {
            account_value_history,
            pnl_history,
        }
    }

    /// Build a series from raw `[ts, value]` tuples; handy for fixtures.
    pub fn from_pairs(account_values: &[(i64, f64)], pnls: &[(i64, f64)]) -> Self {
        let to_points = |pairs: &[(i64, f64)]| {
            pairs
                .iter()
                .map(|&(t, v)| SeriesPoint::new(t, v))
                .collect::<Vec<_>>()
        };
        Self::new(to_points(account_values), to_points(pnls))
    }

    pub fn is_empty(&self) -> bool {
        self.account_value_history.is_empty() && self.pnl_history.is_empty()
    }

    /// Earliest and latest timestamp across both histories.
    pub fn span(&self) -> Option<(TimeMs, TimeMs)> {
        let times = self
            .account_value_history
            .iter()
            .chain(self.pnl_history.iter())
            .map(|p| p.time_ms);
        let mut span: Option<(TimeMs, TimeMs)> = None;
        for t in times {
            span = Some(match span {
                Some((lo, hi)) => (lo.min(t), hi.max(t)),
                None => (t, t),
            });
        }
        span
    }

    /// Last account value of the series, if any.
    pub fn latest_account_value(&self) -> Option<f64> {
        self.account_value_history.last().map(|p| p.value)
    }

    fn from_json(obj: &Value) -> Self {
        Self::new(
            parse_history(obj.get("accountValueHistory")),
            parse_history(obj.get("pnlHistory")),
        )
    }
}

fn parse_history(raw: Option<&Value>) -> Vec<SeriesPoint> {
    let Some(entries) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut points: Vec<SeriesPoint> = entries.iter().filter_map(SeriesPoint::from_json).collect();
    let skipped = entries.len() - points.len();
    if skipped > 0 {
        debug!(skipped, "Skipped malformed time-series entries");
    }
    // Upstream guarantees non-decreasing timestamps; a stable sort keeps
    // equal-timestamp samples in arrival order if it ever does not.
    points.sort_by_key(|p| p.time_ms);
    points
}

/// A member of the venue's bounded top-N depositor roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follower {
    pub user: String,
    pub vault_equity: Option<f64>,
    pub pnl: Option<f64>,
    pub all_time_pnl: Option<f64>,
}

impl Follower {
    fn from_json(obj: &Value) -> Option<Self> {
        let user = obj.get("user")?.as_str()?.to_string();
        Some(Self {
            user,
            vault_equity: coerce_field(obj, "vaultEquity"),
            pnl: coerce_field(obj, "pnl"),
            all_time_pnl: coerce_field(obj, "allTimePnl"),
        })
    }
}

/// Read-only view of a vault at fetch time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultSnapshot {
    pub periods: BTreeMap<String, PeriodSeries>,
    pub followers: Vec<Follower>,
}

impl VaultSnapshot {
    /// Empty snapshot, used when the venue could not be reached.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_period(mut self, name: &str, series: PeriodSeries) -> Self {
        self.periods.insert(name.to_string(), series);
        self
    }

    pub fn with_follower(mut self, follower: Follower) -> Self {
        self.followers.push(follower);
        self
    }

    pub fn period(&self, name: &str) -> Option<&PeriodSeries> {
        self.periods.get(name)
    }

    /// Parse a `vaultDetails` payload.
    ///
    /// `portfolio` is a list of `[periodName, {accountValueHistory, pnlHistory}]`
    /// pairs. Malformed periods, points and roster entries are dropped
    /// individually.
    pub fn from_json(payload: &Value) -> Self {
        let mut snapshot = Self::empty();

        if let Some(portfolio) = payload.get("portfolio").and_then(Value::as_array) {
            for entry in portfolio {
                let Some(pair) = entry.as_array().filter(|p| p.len() >= 2) else {
                    continue;
                };
                let (Some(name), true) = (pair[0].as_str(), pair[1].is_object()) else {
                    continue;
                };
                snapshot
                    .periods
                    .insert(name.to_string(), PeriodSeries::from_json(&pair[1]));
            }
        }

        if let Some(followers) = payload.get("followers").and_then(Value::as_array) {
            snapshot.followers = followers.iter().filter_map(Follower::from_json).collect();
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_series_point_from_json() {
        assert_eq!(
            SeriesPoint::from_json(&json!([1000, "12.5"])),
            Some(SeriesPoint::new(1000, 12.5))
        );
        assert_eq!(
            SeriesPoint::from_json(&json!([1000, 3])),
            Some(SeriesPoint::new(1000, 3.0))
        );
        assert_eq!(SeriesPoint::from_json(&json!([1000])), None);
        assert_eq!(SeriesPoint::from_json(&json!(["x", "1"])), None);
        assert_eq!(SeriesPoint::from_json(&json!([1000, "abc"])), None);
        assert_eq!(SeriesPoint::from_json(&json!({"t": 1})), None);
    }

    #[test]
    fn test_snapshot_from_json() {
        let payload = json!({
            "portfolio": [
                ["day", {
                    "accountValueHistory": [[0, "1000000.0"], [86400000, "1010000.0"]],
                    "pnlHistory": [[0, "0.0"], [1], [86400000, "10000.0"]]
                }],
                ["allTime", {"accountValueHistory": [], "pnlHistory": []}],
                ["broken"],
                [42, {}]
            ],
            "followers": [
                {"user": "0xAbC", "vaultEquity": "1200.5", "pnl": "3.2", "allTimePnl": "200.5"},
                {"vaultEquity": "1"},
                {"user": "0xdef", "vaultEquity": "oops"}
            ]
        });

        let snapshot = VaultSnapshot::from_json(&payload);
        assert_eq!(snapshot.periods.len(), 2);

        let day = snapshot.period("day").unwrap();
        assert_eq!(day.account_value_history.len(), 2);
        assert_eq!(day.pnl_history.len(), 2);
        assert_eq!(day.latest_account_value(), Some(1_010_000.0));
        assert!(snapshot.period("allTime").unwrap().is_empty());

        assert_eq!(snapshot.followers.len(), 2);
        assert_eq!(snapshot.followers[0].vault_equity, Some(1200.5));
        assert_eq!(snapshot.followers[1].vault_equity, None);
    }

    #[test]
    fn test_snapshot_from_garbage_is_empty() {
        assert_eq!(VaultSnapshot::from_json(&json!(null)), VaultSnapshot::empty());
        assert_eq!(
            VaultSnapshot::from_json(&json!({"portfolio": "nope", "followers": 3})),
            VaultSnapshot::empty()
        );
    }

    #[test]
    fn test_history_sorted_by_time() {
        let payload = json!({
            "portfolio": [["day", {"accountValueHistory": [[2000, "2"], [1000, "1"]]}]]
        });
        let snapshot = VaultSnapshot::from_json(&payload);
        let day = snapshot.period("day").unwrap();
        assert_eq!(day.account_value_history[0].time_ms, TimeMs::new(1000));
        assert!(day.pnl_history.is_empty());
    }

    #[test]
    fn test_series_span() {
        let series = PeriodSeries::from_pairs(&[(100, 1.0), (300, 2.0)], &[(50, 0.0), (200, 1.0)]);
        assert_eq!(series.span(), Some((TimeMs::new(50), TimeMs::new(300))));
        assert_eq!(PeriodSeries::default().span(), None);
    }
}
