use parking_lot::Mutex;
use std::future::Future;
use std::sync::{
    atomic::{AtomicBool, AtomicU8, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

// ----- Results & aliases -----------------------------------------------------

type LcResult<T = ()> = std::result::Result<T, LifecycleError>;

/// Result returned by the background task body.
type TaskResult<T = ()> = anyhow::Result<T>;

// ----- Status model ----------------------------------------------------------

/// States of a background loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Stopped,
    Running,
    Stopping,
}

impl Status {
    #[inline]
    const fn as_u8(self) -> u8 {
        match self {
            Status::Stopped => 0,
            Status::Running => 1,
            Status::Stopping => 2,
        }
    }

    #[inline]
    const fn from_u8(x: u8) -> Self {
        match x {
            1 => Status::Running,
            2 => Status::Stopping,
            _ => Status::Stopped,
        }
    }
}

/// Why a loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The task returned on its own.
    Finished,
    /// The task observed cancellation and returned.
    Cancelled,
    /// The task ignored cancellation and was aborted.
    Timeout,
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("already started")]
    AlreadyStarted,
}

// ----- Lifecycle -------------------------------------------------------------

/// Owner of exactly one background task at a time.
///
/// Concurrency notes:
/// - Status transitions are atomics; `Stopped -> Running` is a CAS so a second start fails.
/// - `handle` / `cancel` sit behind short-lived `Mutex` locks.
/// - Dropping the lifecycle cancels and aborts whatever is still running.
pub struct Lifecycle {
    status: Arc<AtomicU8>,
    handle: Mutex<Option<JoinHandle<()>>>,
    cancel: Mutex<Option<CancellationToken>>,
    finished: Arc<AtomicBool>,
    was_cancelled: Arc<AtomicBool>,
    finished_notify: Arc<Notify>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            status: Arc::new(AtomicU8::new(Status::Stopped.as_u8())),
            handle: Mutex::new(None),
            cancel: Mutex::new(None),
            finished: Arc::new(AtomicBool::new(false)),
            was_cancelled: Arc::new(AtomicBool::new(false)),
            finished_notify: Arc::new(Notify::new()),
        }
    }

    #[inline]
    fn store_status(&self, s: Status) {
        self.status.store(s.as_u8(), Ordering::Release);
    }

    /// Spawn `make(cancel)` with a fresh token.
    pub fn start<F, Fut>(&self, make: F) -> LcResult
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult<()>> + Send + 'static,
    {
        self.start_with_token(CancellationToken::new(), make)
    }

    /// Spawn `make(cancel)` using a caller-provided token (e.g. a child of a shutdown token).
    #[tracing::instrument(skip(self, token, make), level = "debug")]
    pub fn start_with_token<F, Fut>(&self, token: CancellationToken, make: F) -> LcResult
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult<()>> + Send + 'static,
    {
        if self
            .status
            .compare_exchange(
                Status::Stopped.as_u8(),
                Status::Running.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return Err(LifecycleError::AlreadyStarted);
        }

        self.finished.store(false, Ordering::Release);
        self.was_cancelled.store(false, Ordering::Release);
        *self.cancel.lock() = Some(token.clone());

        let finished_flag = self.finished.clone();
        let finished_notify = self.finished_notify.clone();
        let status_on_finish = self.status.clone();

        // The future is built inside the task so a panicking `make` cannot strand us in Running.
        let handle = tokio::spawn(async move {
            if let Err(e) = make(token).await {
                tracing::error!(error = %e, "background task error");
            }
            finished_flag.store(true, Ordering::Release);
            finished_notify.notify_waiters();
            status_on_finish.store(Status::Stopped.as_u8(), Ordering::Release);
            tracing::debug!("lifecycle status -> stopped (finished)");
        });

        *self.handle.lock() = Some(handle);
        tracing::debug!("lifecycle status -> running");
        Ok(())
    }

    /// Cancel the task and wait up to `timeout` for it to return; abort it afterwards.
    #[tracing::instrument(skip(self, timeout), level = "debug")]
    pub async fn stop(&self, timeout: Duration) -> LcResult<StopReason> {
        if self.status() == Status::Stopped {
            return Ok(StopReason::Finished);
        }
        self.store_status(Status::Stopping);

        // Only the first caller gets the token; concurrent stops just wait.
        if let Some(tok) = { self.cancel.lock().take() } {
            self.was_cancelled.store(true, Ordering::Release);
            tok.cancel();
        }

        let finished_flag = self.finished.clone();
        let notify = self.finished_notify.clone();
        let finished_wait = async move {
            let notified = notify.notified();
            if finished_flag.load(Ordering::Acquire) {
                return;
            }
            notified.await;
        };

        let reason = tokio::select! {
            _ = finished_wait => {
                if self.was_cancelled.load(Ordering::Acquire) {
                    StopReason::Cancelled
                } else {
                    StopReason::Finished
                }
            }
            _ = tokio::time::sleep(timeout) => StopReason::Timeout,
        };

        let handle_opt = { self.handle.lock().take() };
        if let Some(handle) = handle_opt {
            if reason == StopReason::Timeout && !handle.is_finished() {
                tracing::warn!("stop timed out; aborting task");
                handle.abort();
            }
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => tracing::debug!("task aborted"),
                Err(e) => tracing::warn!(error = %e, "task join error"),
            }
            self.finished.store(true, Ordering::Release);
            self.finished_notify.notify_waiters();
        }

        self.store_status(Status::Stopped);
        tracing::debug!(?reason, "lifecycle stopped");
        Ok(reason)
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> Status {
        Status::from_u8(self.status.load(Ordering::Acquire))
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status() == Status::Running
    }

    /// Wait until the task has returned.
    pub async fn wait_stopped(&self) {
        let notified = self.finished_notify.notified();
        if self.finished.load(Ordering::Acquire) || self.status() == Status::Stopped {
            return;
        }
        notified.await;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        if let Some(tok) = self.cancel.get_mut().take() {
            tok.cancel();
        }
        if let Some(handle) = self.handle.get_mut().take() {
            handle.abort();
        }
    }
}
