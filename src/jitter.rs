use crate::nanos::Nanos;
use rand::Rng;
use std::time::Duration;

/// An interval specification for deviating from the nominal throttling tail.
///
/// Jitter is added to every non-zero throttling tail, so that many governors
/// created at the same moment (or a fleet of processes sharing a schedule)
/// don't all reopen in lockstep. A zero tail stays zero.
///
/// A jitter is a random duration between its minimum and its maximum
/// (the minimum plus the interval given at construction).
///
/// # Example
/// ```rust
/// # use call_governor::{Governor, Jitter};
/// # use std::time::Duration;
/// let governor = Governor::direct(Duration::from_millis(100), || ());
/// // Wait between 100ms and 110ms before reopening:
/// governor.set_jitter(Jitter::up_to(Duration::from_millis(10)));
/// governor.call();
/// ```
#[derive(Debug, PartialEq, Eq, Default, Clone, Copy)]
pub struct Jitter {
    min: Nanos,
    max: Nanos,
}

impl Jitter {
    /// Constructs a new Jitter interval, waiting at most a duration of `max`.
    pub fn up_to(max: Duration) -> Jitter {
        Jitter {
            min: Nanos::from(0),
            max: max.into(),
        }
    }

    /// Constructs a new Jitter interval, waiting at least `min` and at most `min+interval`.
    pub fn new(min: Duration, interval: Duration) -> Jitter {
        let min: Nanos = min.into();
        let max: Nanos = min + Nanos::from(interval);
        Jitter { min, max }
    }

    /// Returns a random amount of jitter within the configured interval.
    pub(crate) fn get(&self) -> Nanos {
        if self.min == self.max {
            return self.min;
        }
        let ns = rand::thread_rng().gen_range(self.min.as_u64()..=self.max.as_u64());
        Nanos::from(ns)
    }

    /// Extends a throttling tail by a random amount of jitter.
    pub(crate) fn extend(&self, tail: Duration) -> Duration {
        if tail.is_zero() {
            tail
        } else {
            tail.saturating_add(self.get().into())
        }
    }
}
