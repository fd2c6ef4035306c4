use std::num::NonZeroU32;
use std::time::Duration;

/// A governing policy.
///
/// Policies are expressed as the minimum interval that must separate the
/// completion of one run for a key from the reopening of the gate after
/// the next run for that key, plus what happens to callers that arrive
/// while another call holds the gate: they either return right away
/// ("dropping", the default) or park until that call's cycle is over
/// ("blocking").
///
/// A zero interval is allowed; such a governor only enforces single-flight
/// execution.
///
/// # Examples
///
/// Run an operation at most 5 times a second, dropping callers that arrive
/// while it's busy:
/// ```rust
/// # use call_governor::Policy;
/// # use nonzero_ext::nonzero;
/// # use std::time::Duration;
/// let p = Policy::per_second(nonzero!(5u32));
/// assert_eq!(p.interval(), Duration::from_millis(200));
/// assert!(!p.is_blocking());
/// assert_eq!(p, Policy::every(Duration::from_millis(200)));
/// ```
///
/// Run an operation at most once every 30 minutes, holding other callers
/// until the current run and its throttling tail are over:
/// ```rust
/// # use call_governor::Policy;
/// # use nonzero_ext::nonzero;
/// # use std::time::Duration;
/// let p = Policy::per_hour(nonzero!(2u32)).blocking();
/// assert_eq!(p.interval(), Duration::from_secs(30 * 60));
/// assert!(p.is_blocking());
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Policy {
    pub(crate) interval: Duration,
    pub(crate) blocking: bool,
}

/// Constructors for Policies
impl Policy {
    /// Construct a dropping policy with the given minimum interval.
    pub const fn every(interval: Duration) -> Policy {
        Policy {
            interval,
            blocking: false,
        }
    }

    /// Construct a policy allowing a number of runs per second.
    pub const fn per_second(runs: NonZeroU32) -> Policy {
        let interval_ns = Duration::from_secs(1).as_nanos() / (runs.get() as u128);
        Policy::every(Duration::from_nanos(interval_ns as u64))
    }

    /// Construct a policy allowing a number of runs per 60-second period.
    pub const fn per_minute(runs: NonZeroU32) -> Policy {
        let interval_ns = Duration::from_secs(60).as_nanos() / (runs.get() as u128);
        Policy::every(Duration::from_nanos(interval_ns as u64))
    }

    /// Construct a policy allowing a number of runs per 60-minute (3600-second) period.
    pub const fn per_hour(runs: NonZeroU32) -> Policy {
        let interval_ns = Duration::from_secs(60 * 60).as_nanos() / (runs.get() as u128);
        Policy::every(Duration::from_nanos(interval_ns as u64))
    }

    /// Makes callers that are turned away wait for the current cycle to end.
    pub const fn blocking(self) -> Policy {
        Policy {
            blocking: true,
            ..self
        }
    }

    /// Makes callers that are turned away return immediately.
    pub const fn dropping(self) -> Policy {
        Policy {
            blocking: false,
            ..self
        }
    }
}

/// Retrieving information about a policy
impl Policy {
    /// The minimum interval between runs sharing a key.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether excluded callers wait for the current cycle to end.
    pub const fn is_blocking(&self) -> bool {
        self.blocking
    }
}

impl From<Duration> for Policy {
    fn from(interval: Duration) -> Self {
        Policy::every(interval)
    }
}
