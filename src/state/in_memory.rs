use std::fmt;
use std::fmt::Debug;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::nanos::Nanos;
use crate::state::{NotKeyed, StateStore};

/// An in-memory record of when a direct governor's operation last completed.
///
/// Implemented using an [`AtomicU64`], this is the state store that direct governors use.
///
/// Internally, the number tracked here is one more than the completion time in nanoseconds
/// since the governor was created, so that zero can stand for "never ran".
#[derive(Default)]
pub struct InMemoryState(AtomicU64);

impl InMemoryState {
    fn load(&self) -> Option<Nanos> {
        NonZeroU64::new(self.0.load(Ordering::Acquire)).map(|n| Nanos::from(n.get() - 1))
    }
}

/// The InMemoryState is the canonical "direct" state store.
impl StateStore for InMemoryState {
    type Key = NotKeyed;

    fn last_run(&self, _key: &Self::Key) -> Option<Nanos> {
        self.load()
    }

    fn record(&self, _key: &Self::Key, at: Nanos) {
        self.0.store(at.as_u64().saturating_add(1), Ordering::Release);
    }

    fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }
}

impl Debug for InMemoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.load() {
            Some(at) => write!(f, "InMemoryState({:?})", Duration::from(at)),
            None => write!(f, "InMemoryState(never)"),
        }
    }
}
