use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::views::View;

/// Configuration for the spr_stats module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SprStatsConfig {
    /// JSON document with `users`, `sprs` and `releases`; relative paths resolve against
    /// the host home dir.
    #[serde(default)]
    pub source_path: String,
    #[serde(default = "default_stop_timeout", with = "humantime_serde")]
    pub stop_timeout: Duration,
    #[serde(default)]
    pub periods: ViewPeriods,
}

impl Default for SprStatsConfig {
    fn default() -> Self {
        Self {
            source_path: String::new(),
            stop_timeout: default_stop_timeout(),
            periods: ViewPeriods::default(),
        }
    }
}

/// Refresh period of every view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewPeriods {
    #[serde(default = "default_open_spr_count", with = "humantime_serde")]
    pub open_spr_count: Duration,
    #[serde(default = "default_reviewed_spr_count", with = "humantime_serde")]
    pub reviewed_spr_count: Duration,
    #[serde(default = "default_current_releases", with = "humantime_serde")]
    pub current_releases: Duration,
    #[serde(default = "default_future_releases", with = "humantime_serde")]
    pub future_releases: Duration,
    #[serde(default = "default_open_spr_table", with = "humantime_serde")]
    pub open_spr_table: Duration,
    #[serde(default = "default_ownership_chart", with = "humantime_serde")]
    pub ownership_chart: Duration,
}

impl ViewPeriods {
    pub fn period_of(&self, view: View) -> Duration {
        match view {
            View::OpenSprCount => self.open_spr_count,
            View::ReviewedSprCount => self.reviewed_spr_count,
            View::CurrentReleases => self.current_releases,
            View::FutureReleases => self.future_releases,
            View::OpenSprTable => self.open_spr_table,
            View::OwnershipChart => self.ownership_chart,
        }
    }
}

impl Default for ViewPeriods {
    fn default() -> Self {
        Self {
            open_spr_count: default_open_spr_count(),
            reviewed_spr_count: default_reviewed_spr_count(),
            current_releases: default_current_releases(),
            future_releases: default_future_releases(),
            open_spr_table: default_open_spr_table(),
            ownership_chart: default_ownership_chart(),
        }
    }
}

fn default_stop_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_open_spr_count() -> Duration {
    Duration::from_secs(30)
}

fn default_reviewed_spr_count() -> Duration {
    Duration::from_secs(40)
}

fn default_current_releases() -> Duration {
    Duration::from_secs(10)
}

fn default_future_releases() -> Duration {
    Duration::from_secs(20)
}

fn default_open_spr_table() -> Duration {
    Duration::from_secs(10)
}

fn default_ownership_chart() -> Duration {
    Duration::from_secs(180)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_view_cadence() {
        let cfg = SprStatsConfig::default();
        let secs: Vec<u64> = View::ALL
            .iter()
            .map(|v| cfg.periods.period_of(*v).as_secs())
            .collect();
        assert_eq!(secs, vec![30, 40, 10, 20, 10, 180]);
        assert_eq!(cfg.stop_timeout, Duration::from_secs(5));
    }

    #[test]
    fn humantime_periods_and_partial_overrides() {
        let cfg: SprStatsConfig = serde_json::from_value(json!({
            "source_path": "data/tracker.json",
            "periods": { "ownership_chart": "3m 30s", "open_spr_count": "500ms" }
        }))
        .unwrap();
        assert_eq!(cfg.periods.ownership_chart, Duration::from_secs(210));
        assert_eq!(cfg.periods.open_spr_count, Duration::from_millis(500));
        assert_eq!(cfg.periods.future_releases, Duration::from_secs(20));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<SprStatsConfig, _> = serde_json::from_value(json!({ "page_size": 10 }));
        assert!(res.is_err());
    }
}
