use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// The admission gate: a single flag deciding whether a governed call may start.
///
/// Entering is one atomic swap and never takes a lock, so callers that lose
/// the race find out without serializing on anything. Only the caller that
/// entered may reopen the gate.
pub(crate) struct Gate(AtomicBool);

impl Gate {
    /// Returns a gate that admits the next caller.
    pub(crate) fn open() -> Gate {
        Gate(AtomicBool::new(true))
    }

    /// Closes the gate, returning `true` if this call is the one that closed it.
    ///
    /// Exactly one of any number of concurrent callers observes `true` per cycle.
    #[inline]
    pub(crate) fn try_enter(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Opens the gate for the next caller.
    #[inline]
    pub(crate) fn reopen(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub(crate) fn is_open(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let state = if self.is_open() { "open" } else { "closed" };
        write!(f, "Gate({})", state)
    }
}
