//! Injectable time source.
//!
//! Stores and services never call `Utc::now()` directly; they read the
//! clock handed to them at construction, so tests can pin time and advance
//! it across token lifetimes.

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Shared clock handle. Cheap to clone.
#[derive(Clone, Debug, Default)]
pub struct Clock {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
enum Inner {
    #[default]
    System,
    /// Microseconds since the Unix epoch.
    Fixed(AtomicI64),
}

impl Clock {
    /// Wall-clock time.
    #[must_use]
    pub fn system() -> Self {
        Self {
            inner: Arc::new(Inner::System),
        }
    }

    /// A clock pinned at `start`, moved only by [`Clock::advance`].
    #[must_use]
    pub fn fixed(start: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Inner::Fixed(AtomicI64::new(start.timestamp_micros()))),
        }
    }

    /// Current time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match &*self.inner {
            Inner::System => Utc::now(),
            Inner::Fixed(micros) => {
                DateTime::from_timestamp_micros(micros.load(Ordering::Relaxed))
                    .unwrap_or_default()
            }
        }
    }

    /// Advance a fixed clock. No-op on the system clock.
    pub fn advance(&self, by: Duration) {
        if let Inner::Fixed(micros) = &*self.inner {
            micros.fetch_add(by.num_microseconds().unwrap_or(0), Ordering::Relaxed);
        }
    }
}
