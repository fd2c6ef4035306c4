//! Time sources for governors.
//!
//! The time sources contained in this module decide how a governor
//! measures the time since a key last ran, and how the admitted caller
//! waits out the throttling tail. They additionally allow mocking the
//! passage of time.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::nanos::Nanos;

/// A measurement from a clock.
pub trait Reference: Sized + PartialEq + Eq + Ord + Copy + Clone + Send + Sync + Debug {
    /// Determines the time that separates two measurements of a
    /// clock. Implementations of this must perform a saturating
    /// subtraction - if the `earlier` timestamp should be later,
    /// `duration_since` must return the zero duration.
    fn duration_since(&self, earlier: Self) -> Nanos;
}

/// A time source used by governors.
pub trait Clock: Clone {
    /// A measurement of a monotonically increasing clock.
    type Instant: Reference;

    /// Returns a measurement of the clock.
    fn now(&self) -> Self::Instant;

    /// Blocks the current thread for `duration`, as measured by this clock.
    ///
    /// Governors call this on the admitted caller's thread to wait out the
    /// throttling tail.
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration)
    }
}

impl Reference for Duration {
    fn duration_since(&self, earlier: Self) -> Nanos {
        self.checked_sub(earlier)
            .unwrap_or_else(|| Duration::new(0, 0))
            .into()
    }
}

/// A mock implementation of a clock. All it does is keep track of
/// what "now" is (relative to some point meaningful to the program),
/// and returns that.
///
/// Sleeping on this clock does not block: it advances "now" by the
/// requested duration and returns immediately.
///
/// # Thread safety
/// The mock time is represented as an atomic u64 count of nanoseconds, behind an [`Arc`].
/// Clones of this clock will all show the same time, even if the original advances.
#[derive(Debug, Clone, Default)]
pub struct FakeRelativeClock {
    now: Arc<AtomicU64>,
}

impl FakeRelativeClock {
    /// Advances the fake clock by the given amount.
    pub fn advance(&self, by: Duration) {
        let by: u64 = by
            .as_nanos()
            .try_into()
            .expect("Can not represent times past ~584 years");

        let mut prev = self.now.load(Ordering::Acquire);
        let mut next = prev + by;
        while let Err(next_prev) =
            self.now
                .compare_exchange_weak(prev, next, Ordering::Release, Ordering::Relaxed)
        {
            prev = next_prev;
            next = prev + by;
        }
    }
}

impl PartialEq for FakeRelativeClock {
    fn eq(&self, other: &Self) -> bool {
        self.now.load(Ordering::Relaxed) == other.now.load(Ordering::Relaxed)
    }
}

impl Clock for FakeRelativeClock {
    type Instant = Nanos;

    fn now(&self) -> Self::Instant {
        self.now.load(Ordering::Relaxed).into()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

impl Reference for Nanos {
    fn duration_since(&self, earlier: Self) -> Nanos {
        Nanos::duration_since(*self, earlier)
    }
}

mod with_std;
pub use with_std::*;

#[cfg(feature = "quanta")]
mod quanta;
#[cfg(feature = "quanta")]
pub use self::quanta::*;

mod default;
pub use default::*;
