use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use pollkit::{spawn_poller, Latest, PollHandle, PollSpec, Stamped, StopReason};
use tracing::{debug, info};

use crate::config::SprStatsConfig;
use crate::contract::client::SprStatsApi;
use crate::domain::ports::TrackerSource;
use crate::domain::service::Service;
use crate::domain::views::{self, View, ViewData, ViewRefresher};
use crate::gateways::local::SprStatsLocalClient;
use crate::infra::json_source::JsonFileSource;

/// State of one view that outlives its poll loops.
#[derive(Default)]
struct ViewSlot {
    latest: Arc<Latest<ViewData>>,
    sequence: Arc<AtomicU64>,
}

/// The set of dashboard views over one tracker source.
///
/// Each view gets its own poll loop while active and a slot that outlives it, so the last
/// published value stays readable after deactivation and tick numbers keep growing across
/// reactivations. Dropping the dashboard cancels every schedule.
pub struct Dashboard {
    service: Arc<Service>,
    config: SprStatsConfig,
    slots: [ViewSlot; View::COUNT],
    active: Mutex<BTreeMap<View, PollHandle>>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn TrackerSource>, config: SprStatsConfig) -> Self {
        Self {
            service: Arc::new(Service::new(source)),
            config,
            slots: std::array::from_fn(|_| ViewSlot::default()),
            active: Mutex::new(BTreeMap::new()),
        }
    }

    /// Wire the dashboard to the JSON file named by `config.source_path`, resolved
    /// against `base_dir` when relative.
    pub fn from_config(config: SprStatsConfig, base_dir: &Path) -> anyhow::Result<Self> {
        if config.source_path.trim().is_empty() {
            anyhow::bail!("spr_stats.source_path is not set");
        }
        let path = base_dir.join(&config.source_path);
        info!(source = %path.display(), "Initializing spr_stats dashboard");
        let source: Arc<dyn TrackerSource> = Arc::new(JsonFileSource::new(path));
        Ok(Self::new(source, config))
    }

    pub fn config(&self) -> &SprStatsConfig {
        &self.config
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client over the same service.
    pub fn client(&self) -> Arc<dyn SprStatsApi> {
        Arc::new(SprStatsLocalClient::new(self.service.clone()))
    }

    /// Start polling `view`. The first refresh runs immediately. Activating an active view
    /// is a no-op.
    pub fn activate(&self, view: View) -> anyhow::Result<()> {
        let mut active = self.active.lock();
        if active.contains_key(&view) {
            debug!(%view, "view already active");
            return Ok(());
        }

        let slot = self.slot(view);
        let spec = PollSpec::new(view.as_str(), self.config.periods.period_of(view))
            .with_stop_timeout(self.config.stop_timeout)
            .with_sequence(slot.sequence.clone());
        let target = Arc::new(ViewRefresher::new(
            view,
            self.service.clone(),
            slot.latest.clone(),
        ));
        let handle =
            spawn_poller(spec, target).with_context(|| format!("failed to activate view {view}"))?;
        info!(%view, period = ?handle.period(), "view activated");
        active.insert(view, handle);
        Ok(())
    }

    pub fn activate_all(&self) -> anyhow::Result<()> {
        View::ALL.into_iter().try_for_each(|v| self.activate(v))
    }

    /// Cancel the schedule of `view`. Returns `None` if it was not active.
    pub async fn deactivate(&self, view: View) -> Option<StopReason> {
        let handle = self.active.lock().remove(&view)?;
        let reason = handle.stop().await;
        info!(%view, ?reason, "view deactivated");
        Some(reason)
    }

    pub async fn deactivate_all(&self) {
        let handles: Vec<(View, PollHandle)> = std::mem::take(&mut *self.active.lock())
            .into_iter()
            .collect();
        for (view, handle) in handles {
            let reason = handle.stop().await;
            debug!(%view, ?reason, "view deactivated");
        }
    }

    pub fn is_active(&self, view: View) -> bool {
        self.active.lock().contains_key(&view)
    }

    pub fn active_views(&self) -> Vec<View> {
        self.active.lock().keys().copied().collect()
    }

    /// Newest published value of `view`, if any tick has completed.
    pub fn snapshot(&self, view: View) -> Option<Arc<Stamped<ViewData>>> {
        self.slot(view).latest.load()
    }

    /// Compute `view` once, outside any schedule.
    pub async fn refresh_once(&self, view: View) -> anyhow::Result<ViewData> {
        views::compute(&self.service, view)
            .await
            .with_context(|| format!("failed to compute view {view}"))
    }

    fn slot(&self, view: View) -> &ViewSlot {
        &self.slots[view.index()]
    }
}
