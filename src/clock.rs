use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::store::Timestamp;

/// Wall clock, kept in sync outside the core.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Seconds since the epoch as stored on flash; 0 outside the `u32` range.
    fn timestamp(&self) -> Timestamp {
        u32::try_from(self.now().timestamp()).unwrap_or(0)
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock. Clones share the same time.
#[derive(Clone)]
pub struct FixedClock(Arc<Mutex<DateTime<Utc>>>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(at)))
    }

    pub fn set(&self, at: DateTime<Utc>) {
        if let Ok(mut now) = self.0.lock() {
            *now = at;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.lock().map(|now| *now).unwrap_or_else(|e| *e.into_inner())
    }
}
