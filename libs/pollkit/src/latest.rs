//! Last-applied-wins publication slot for poll results.
//!
//! Every fetch is stamped with the tick sequence number it was started on. Responses can
//! resolve out of order when fetches overlap, so `publish` keeps whichever value carries the
//! highest sequence number seen so far and drops older ones.

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A published value together with the tick that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T> {
    pub seq: u64,
    pub published_at: DateTime<Utc>,
    pub value: T,
}

/// Read-mostly slot holding the newest result of a view.
pub struct Latest<T> {
    slot: ArcSwapOption<Stamped<T>>,
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
        }
    }

    /// Offer a value computed from tick `seq`. Returns `false` if a newer (or the same) tick
    /// has already been applied, in which case the value is discarded.
    pub fn publish(&self, seq: u64, value: T) -> bool {
        let candidate = Arc::new(Stamped {
            seq,
            published_at: Utc::now(),
            value,
        });
        let mut accepted = false;
        self.slot.rcu(|current| match current {
            Some(cur) if cur.seq >= seq => {
                accepted = false;
                Some(cur.clone())
            }
            _ => {
                accepted = true;
                Some(candidate.clone())
            }
        });
        accepted
    }

    /// Newest applied value, if any tick has completed yet.
    pub fn load(&self) -> Option<Arc<Stamped<T>>> {
        self.slot.load_full()
    }

    /// Sequence number of the newest applied value (0 before the first one).
    pub fn seq(&self) -> u64 {
        self.slot.load().as_ref().map_or(0, |s| s.seq)
    }
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_first_publish() {
        let latest: Latest<u32> = Latest::new();
        assert!(latest.load().is_none());
        assert_eq!(latest.seq(), 0);
    }

    #[test]
    fn newer_tick_replaces_older() {
        let latest = Latest::new();
        assert!(latest.publish(1, "a"));
        assert!(latest.publish(2, "b"));
        let cur = latest.load().unwrap();
        assert_eq!(cur.seq, 2);
        assert_eq!(cur.value, "b");
    }

    #[test]
    fn stale_response_is_discarded() {
        let latest = Latest::new();
        assert!(latest.publish(5, 50));
        // tick 3 resolved after tick 5
        assert!(!latest.publish(3, 30));
        assert!(!latest.publish(5, 55));
        let cur = latest.load().unwrap();
        assert_eq!(cur.seq, 5);
        assert_eq!(cur.value, 50);
    }
}
