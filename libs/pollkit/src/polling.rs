use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::lifecycle::{Lifecycle, LifecycleError, Status, StopReason};

/// One fetch-and-recompute cycle of a view.
///
/// `seq` is the tick number (starting at 1) the cycle was started on; pass it to
/// [`crate::Latest::publish`] so that out-of-order completions are discarded.
#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    async fn refresh(self: Arc<Self>, seq: u64) -> anyhow::Result<()>;
}

/// Adapter turning an async closure into a [`Refresh`].
pub struct FnRefresh<F>(F);

impl<F> FnRefresh<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> Refresh for FnRefresh<F>
where
    F: Fn(u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn refresh(self: Arc<Self>, seq: u64) -> anyhow::Result<()> {
        (self.0)(seq).await
    }
}

/// Static description of a poll loop.
#[derive(Debug, Clone)]
pub struct PollSpec {
    pub name: String,
    pub period: Duration,
    pub stop_timeout: Duration,
    /// Tick counter to continue from. A fresh counter starting at 0 is used when unset.
    pub sequence: Option<Arc<AtomicU64>>,
}

impl PollSpec {
    pub fn new(name: impl Into<String>, period: Duration) -> Self {
        Self {
            name: name.into(),
            period,
            stop_timeout: Duration::from_secs(5),
            sequence: None,
        }
    }

    pub fn with_stop_timeout(mut self, d: Duration) -> Self {
        self.stop_timeout = d;
        self
    }

    /// Number ticks from `counter`, so that a restarted loop keeps handing out sequence
    /// numbers above everything it published before.
    pub fn with_sequence(mut self, counter: Arc<AtomicU64>) -> Self {
        self.sequence = Some(counter);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("poll period for '{name}' must be greater than zero")]
    ZeroPeriod { name: String },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Cancellable handle to a running poll loop.
///
/// The loop lives exactly as long as the handle: [`PollHandle::stop`] ends it
/// deterministically, and dropping the handle cancels it as well. Refresh cycles that are
/// already in flight are not cancelled; they complete and publish on their own.
pub struct PollHandle {
    spec: PollSpec,
    lifecycle: Lifecycle,
    ticks: Arc<AtomicU64>,
}

impl PollHandle {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn period(&self) -> Duration {
        self.spec.period
    }

    /// Last tick number handed out (each tick starts one refresh cycle). Includes earlier
    /// loops that shared the same sequence.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    pub fn status(&self) -> Status {
        self.lifecycle.status()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    /// Cancel the schedule; no tick fires after this returns.
    pub async fn stop(&self) -> StopReason {
        match self.lifecycle.stop(self.spec.stop_timeout).await {
            Ok(reason) => {
                tracing::debug!(view = %self.spec.name, ?reason, "poller stopped");
                reason
            }
            Err(e) => {
                tracing::warn!(view = %self.spec.name, error = %e, "poller stop failed");
                StopReason::Finished
            }
        }
    }
}

/// Start polling `target` every `spec.period`, with the first cycle fired immediately.
pub fn spawn_poller<R: Refresh>(spec: PollSpec, target: Arc<R>) -> Result<PollHandle, PollError> {
    spawn_poller_with_token(spec, target, CancellationToken::new())
}

/// Same as [`spawn_poller`], but the loop also ends when `parent` is cancelled.
pub fn spawn_poller_with_token<R: Refresh>(
    spec: PollSpec,
    target: Arc<R>,
    parent: CancellationToken,
) -> Result<PollHandle, PollError> {
    if spec.period.is_zero() {
        return Err(PollError::ZeroPeriod { name: spec.name });
    }

    let lifecycle = Lifecycle::new();
    let ticks = spec
        .sequence
        .clone()
        .unwrap_or_else(|| Arc::new(AtomicU64::new(0)));

    let name = spec.name.clone();
    let period = spec.period;
    let tick_counter = ticks.clone();
    lifecycle.start_with_token(parent.child_token(), move |cancel| {
        run_loop(name, period, target, tick_counter, cancel)
    })?;

    tracing::info!(view = %spec.name, period = ?spec.period, "poller started");
    Ok(PollHandle {
        spec,
        lifecycle,
        ticks,
    })
}

async fn run_loop<R: Refresh>(
    name: String,
    period: Duration,
    target: Arc<R>,
    ticks: Arc<AtomicU64>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    // The first tick of a tokio interval completes immediately.
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let seq = ticks.fetch_add(1, Ordering::AcqRel) + 1;
                tracing::debug!(view = %name, seq, "poll tick");
                // Cycles are detached: a slow fetch never delays the schedule and may
                // overlap with the next one.
                let target = target.clone();
                let name = name.clone();
                tokio::spawn(async move {
                    if let Err(e) = target.refresh(seq).await {
                        tracing::warn!(view = %name, seq, error = %e, "refresh failed");
                    }
                });
            }
        }
    }
    Ok(())
}
