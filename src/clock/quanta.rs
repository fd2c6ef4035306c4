use crate::clock::{Clock, Reference};
use crate::nanos::Nanos;

/// A clock using the default [`quanta::Clock`] structure.
///
/// This clock uses [`quanta::Clock.now`], which does retrieve the time synchronously.
/// Sleeping on it falls back to the operating system's thread sleep.
#[derive(Debug, Clone)]
pub struct QuantaClock {
    clock: quanta::Clock,
}

impl Default for QuantaClock {
    fn default() -> Self {
        let clock = quanta::Clock::default();
        Self { clock }
    }
}

impl Clock for QuantaClock {
    type Instant = QuantaInstant;

    fn now(&self) -> Self::Instant {
        let nowish = self.clock.raw();
        QuantaInstant(Nanos::from(self.clock.delta_as_nanos(0, nowish)))
    }
}

/// A nanosecond-scale opaque instant (already scaled to reference time) returned from a
/// [`QuantaClock`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct QuantaInstant(Nanos);

impl Reference for QuantaInstant {
    fn duration_since(&self, earlier: Self) -> Nanos {
        self.0.duration_since(earlier.0)
    }
}
