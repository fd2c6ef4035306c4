//! A time-keeping abstraction (nanoseconds) that works for storing in an atomic integer.

use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

/// A number of nanoseconds from a reference point.
///
/// Nanos can not represent durations >584 years, but hopefully that
/// should not be a problem in real-world applications.
#[derive(PartialEq, Eq, Default, Clone, Copy, PartialOrd, Ord)]
pub struct Nanos(u64);

impl Nanos {
    /// The number of nanoseconds as a plain integer.
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// `true` if no time is represented.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns the time between `earlier` and `self`, or zero if `earlier` is in fact later.
    pub const fn duration_since(self, earlier: Nanos) -> Nanos {
        self.saturating_sub(earlier)
    }

    pub(crate) const fn saturating_sub(self, rhs: Nanos) -> Nanos {
        Nanos(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Debug for Nanos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let d = Duration::from_nanos(self.0);
        write!(f, "Nanos({:?})", d)
    }
}

impl From<Duration> for Nanos {
    fn from(d: Duration) -> Self {
        // This will panic:
        Nanos(
            d.as_nanos()
                .try_into()
                .expect("Duration is longer than 584 years"),
        )
    }
}

impl From<u64> for Nanos {
    fn from(u: u64) -> Self {
        Nanos(u)
    }
}

impl From<Nanos> for Duration {
    fn from(n: Nanos) -> Self {
        Duration::from_nanos(n.0)
    }
}

impl From<Nanos> for u64 {
    fn from(n: Nanos) -> Self {
        n.0
    }
}

impl Add<Nanos> for Nanos {
    type Output = Nanos;

    fn add(self, rhs: Nanos) -> Self::Output {
        Nanos(self.0.saturating_add(rhs.0))
    }
}

impl Sub<Nanos> for Nanos {
    type Output = Nanos;

    fn sub(self, rhs: Nanos) -> Self::Output {
        Nanos(self.0 - rhs.0)
    }
}
