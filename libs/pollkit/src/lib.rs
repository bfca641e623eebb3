//! # PollKit - scheduled refresh loops for dashboard views
//!
//! A small toolkit for views that keep themselves fresh by re-fetching on a fixed period.
//!
//! ## Features
//!
//! - **Lifecycle**: start/stop a background task with a cancellation token and a stop timeout
//! - **Polling**: one parameterized poller (period + refresh callback) per view
//! - **Latest**: lock-free publication of the newest result, discarding stale responses
//!
//! ## Example
//!
//! ```rust,ignore
//! use pollkit::{spawn_poller, FnRefresh, PollSpec};
//!
//! let handle = spawn_poller(
//!     PollSpec::new("open_spr_count", Duration::from_secs(10)),
//!     Arc::new(FnRefresh::new(|seq| async move { recompute(seq).await })),
//! )?;
//! // ... later, on teardown:
//! handle.stop().await;
//! ```

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod latest;
pub mod lifecycle;
pub mod polling;
pub mod shutdown;

pub use latest::{Latest, Stamped};
pub use lifecycle::{Lifecycle, LifecycleError, Status, StopReason};
pub use polling::{spawn_poller, spawn_poller_with_token, FnRefresh, PollError, PollHandle, PollSpec, Refresh};
pub use shutdown::wait_for_shutdown;
