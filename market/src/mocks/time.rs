//! Mock clock for testing.

use crate::traits::TimeProvider;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct MockTime {
    now: Arc<AtomicU64>,
}

impl MockTime {
    pub fn new(initial_time: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(initial_time)),
        }
    }

    pub fn set(&self, timestamp: u64) {
        self.now.store(timestamp, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Default for MockTime {
    /// 2024-01-01 00:00:00 UTC.
    fn default() -> Self {
        Self::new(1_704_067_200)
    }
}

impl TimeProvider for MockTime {
    fn now_unix(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
