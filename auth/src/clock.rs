use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use chrono::Utc;

/// Source of Unix timestamps (seconds) for token issuance and verification.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> i64;
}

/// Wall-clock time that never goes backwards.
///
/// Remembers the highest timestamp handed out; if the system clock is
/// stepped back, readings are clamped to that value until wall time catches up.
#[derive(Debug, Default)]
pub struct SystemClock {
    high_water: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn observe(&self, wall: i64) -> i64 {
        let previous = self.high_water.fetch_max(wall, Ordering::AcqRel);
        previous.max(wall)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        self.observe(Utc::now().timestamp())
    }
}

/// Manually driven clock, for deterministic issuance and expiry checks.
#[derive(Debug)]
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::Release);
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::AcqRel);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::Acquire)
    }
}
