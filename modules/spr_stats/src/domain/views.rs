//! Dashboard views: what each one computes and how a poll tick publishes it.

use std::fmt;
use std::sync::Arc;

use pollkit::{async_trait, Latest, Refresh};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::contract::model::{Priority, Release, Spr, UserSummary};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    OpenSprCount,
    ReviewedSprCount,
    CurrentReleases,
    FutureReleases,
    OpenSprTable,
    OwnershipChart,
}

impl View {
    pub const COUNT: usize = 6;

    pub const ALL: [View; View::COUNT] = [
        View::OpenSprCount,
        View::ReviewedSprCount,
        View::CurrentReleases,
        View::FutureReleases,
        View::OpenSprTable,
        View::OwnershipChart,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            View::OpenSprCount => "open_spr_count",
            View::ReviewedSprCount => "reviewed_spr_count",
            View::CurrentReleases => "current_releases",
            View::FutureReleases => "future_releases",
            View::OpenSprTable => "open_spr_table",
            View::OwnershipChart => "ownership_chart",
        }
    }

    /// Position in [`View::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the open-record table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSprRow {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Owner login; empty for unassigned records.
    pub owner: String,
}

impl From<&Spr> for OpenSprRow {
    fn from(spr: &Spr) -> Self {
        Self {
            identifier: spr.identifier(),
            priority: spr.priority,
            owner: spr.owner_login().unwrap_or_default().to_string(),
        }
    }
}

/// Output of one view computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewData {
    OpenSprCount { count: usize },
    ReviewedSprCount { count: usize },
    CurrentReleases { releases: Vec<Release> },
    FutureReleases { releases: Vec<Release> },
    OpenSprTable { rows: Vec<OpenSprRow> },
    OwnershipChart { users: Vec<UserSummary> },
}

impl ViewData {
    /// One-line rendering for logs.
    pub fn headline(&self) -> String {
        match self {
            ViewData::OpenSprCount { count } => format!("{count} open SPRs"),
            ViewData::ReviewedSprCount { count } => format!("{count} reviewed SPRs"),
            ViewData::CurrentReleases { releases } => format!("{} current releases", releases.len()),
            ViewData::FutureReleases { releases } => format!("{} future releases", releases.len()),
            ViewData::OpenSprTable { rows } => format!("{} rows of open SPRs", rows.len()),
            ViewData::OwnershipChart { users } => format!("ownership of {} users", users.len()),
        }
    }
}

/// Full recomputation of `view` from a fresh snapshot.
pub async fn compute(service: &Service, view: View) -> Result<ViewData, DomainError> {
    Ok(match view {
        View::OpenSprCount => ViewData::OpenSprCount {
            count: service.all_open_sprs().await?.len(),
        },
        View::ReviewedSprCount => ViewData::ReviewedSprCount {
            count: service.all_reviewed_sprs().await?.len(),
        },
        View::CurrentReleases => ViewData::CurrentReleases {
            releases: service.current_releases().await?,
        },
        View::FutureReleases => ViewData::FutureReleases {
            releases: service.future_releases().await?,
        },
        View::OpenSprTable => ViewData::OpenSprTable {
            rows: service
                .all_open_sprs()
                .await?
                .iter()
                .map(OpenSprRow::from)
                .collect(),
        },
        View::OwnershipChart => ViewData::OwnershipChart {
            users: service.ownership_chart().await?,
        },
    })
}

/// Poll target of one view: recompute, then publish unless a newer tick got there first.
pub struct ViewRefresher {
    view: View,
    service: Arc<Service>,
    latest: Arc<Latest<ViewData>>,
}

impl ViewRefresher {
    pub fn new(view: View, service: Arc<Service>, latest: Arc<Latest<ViewData>>) -> Self {
        Self {
            view,
            service,
            latest,
        }
    }
}

#[async_trait]
impl Refresh for ViewRefresher {
    async fn refresh(self: Arc<Self>, seq: u64) -> anyhow::Result<()> {
        let data = compute(&self.service, self.view).await?;
        let headline = data.headline();
        if self.latest.publish(seq, data) {
            info!(view = %self.view, seq, "{headline}");
        } else {
            debug!(view = %self.view, seq, "stale response discarded");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{Release, Resolution, Spr, Territory, User};
    use crate::domain::ports::TrackerSource;

    struct Fixed;

    #[async_trait]
    impl TrackerSource for Fixed {
        async fn fetch_all_records(&self) -> anyhow::Result<Vec<Spr>> {
            let mut urgent = Spr::new(Territory::Sed, 1)
                .owned_by(User::new(1, "ann"))
                .with_resolution(Resolution::New);
            urgent.priority = Some(Priority::High);
            Ok(vec![
                urgent,
                Spr::new(Territory::Chicago, 7).with_resolution(Resolution::Duplicate),
                Spr::new(Territory::Pscc, 2)
                    .owned_by(User::new(1, "ann"))
                    .with_resolution(Resolution::Reviewed),
            ])
        }

        async fn fetch_all_users(&self) -> anyhow::Result<Vec<User>> {
            Ok(vec![
                User::new(1, "ann"),
                User::new(2, "admin").with_first_name("Administrator"),
            ])
        }

        async fn fetch_all_releases(&self) -> anyhow::Result<Vec<Release>> {
            Ok(Vec::new())
        }
    }

    fn service() -> Arc<Service> {
        Arc::new(Service::new(Arc::new(Fixed)))
    }

    fn refresher(latest: Arc<Latest<ViewData>>) -> Arc<ViewRefresher> {
        Arc::new(ViewRefresher::new(View::OpenSprCount, service(), latest))
    }

    #[test]
    fn view_names_follow_index_order() {
        let names: Vec<String> = View::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            vec![
                "open_spr_count",
                "reviewed_spr_count",
                "current_releases",
                "future_releases",
                "open_spr_table",
                "ownership_chart"
            ]
        );
        for (i, view) in View::ALL.iter().enumerate() {
            assert_eq!(view.index(), i);
        }
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn refresh_publishes_and_logs_headline() {
        let latest = Arc::new(Latest::new());
        refresher(latest.clone()).refresh(1).await.unwrap();

        let snap = latest.load().unwrap();
        assert_eq!(snap.seq, 1);
        assert_eq!(snap.value, ViewData::OpenSprCount { count: 2 });
        assert!(logs_contain("2 open SPRs"));
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn older_tick_is_discarded() {
        let latest = Arc::new(Latest::new());
        let target = refresher(latest.clone());
        target.clone().refresh(5).await.unwrap();
        target.refresh(4).await.unwrap();

        assert_eq!(latest.seq(), 5);
        assert!(logs_contain("stale response discarded"));
    }

    #[tokio::test]
    async fn count_cards_cover_every_owner() {
        let service = service();
        assert_eq!(
            compute(&service, View::ReviewedSprCount).await.unwrap(),
            ViewData::ReviewedSprCount { count: 1 }
        );
    }

    #[tokio::test]
    async fn open_table_lists_identifiers() {
        let data = compute(&service(), View::OpenSprTable).await.unwrap();
        assert_eq!(
            data,
            ViewData::OpenSprTable {
                rows: vec![
                    OpenSprRow {
                        identifier: "SED-1".into(),
                        priority: Some(Priority::High),
                        owner: "ann".into(),
                    },
                    OpenSprRow {
                        identifier: "UN-7".into(),
                        priority: None,
                        owner: String::new(),
                    },
                ]
            }
        );
    }

    #[tokio::test]
    async fn chart_rows_skip_system_accounts() {
        let data = compute(&service(), View::OwnershipChart).await.unwrap();
        let users = match data {
            ViewData::OwnershipChart { users } => users,
            other => panic!("unexpected view data {other:?}"),
        };
        assert_eq!(users.len(), 1);
        assert_eq!(
            (users[0].login.as_str(), users[0].open, users[0].reviewed),
            ("ann", 1, 1)
        );
        assert_eq!(users[0].share.percentage, 67);
    }

    #[test]
    fn table_view_serializes_with_tag() {
        let data = ViewData::OpenSprTable {
            rows: vec![OpenSprRow {
                identifier: "CW-42".into(),
                priority: None,
                owner: "ann".into(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            serde_json::json!({
                "view": "open_spr_table",
                "rows": [ { "identifier": "CW-42", "owner": "ann" } ]
            })
        );
    }
}
