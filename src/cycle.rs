//! The governed call cycle: admission, the guarded run, the throttling tail and reopening.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::clock::{self, Reference};
use crate::errors::OperationFailure;
use crate::gate::Gate;
use crate::middleware::{Execution, Exclusion, GovernorMiddleware};
use crate::nanos::Nanos;
use crate::state::{Governor, Settings, StateStore};

/// How long the admitted caller must keep the gate closed after a run that completed at `now`.
///
/// A key that never ran before gets the full interval, so a burst of first-time calls is
/// still throttled going forward.
pub(crate) fn throttling_tail(interval: Duration, last_run: Option<Nanos>, now: Nanos) -> Duration {
    match last_run {
        None => interval,
        Some(last_run) => interval.saturating_sub(now.duration_since(last_run).into()),
    }
}

/// Reopens the gate when the admitted caller is done with it, however it gets there.
struct Admission<'a, K, A> {
    gate: &'a Gate,
    settings: &'a Mutex<Settings<K, A>>,
    blocking: &'a AtomicBool,
    released: &'a Condvar,
}

impl<K, A> Drop for Admission<'_, K, A> {
    fn drop(&mut self) {
        let mut settings = self.settings.lock();
        self.gate.reopen();
        settings.generation = settings.generation.wrapping_add(1);
        let blocking = self.blocking.load(Ordering::Acquire);
        drop(settings);
        if blocking {
            self.released.notify_all();
        }
    }
}

impl<K, S, C, MW, A> Governor<K, S, C, MW, A>
where
    S: StateStore<Key = K>,
    C: clock::Clock,
    MW: GovernorMiddleware<K>,
{
    pub(crate) fn govern(&self, key: &K, args: A) -> MW::Outcome {
        if !self.gate.try_enter() {
            let exclusion = self.wait_for_release();
            return MW::excluded(key, exclusion);
        }

        let admission = Admission {
            gate: &self.gate,
            settings: &self.settings,
            blocking: &self.blocking,
            released: &self.released,
        };
        let execution = self.run_admitted(key, args);
        drop(admission);
        MW::admitted(key, execution)
    }

    /// Runs the operation and waits out the throttling tail. The gate stays closed throughout.
    fn run_admitted(&self, key: &K, args: A) -> Execution {
        let operation = Arc::clone(&self.settings.lock().operation);
        let failure = match panic::catch_unwind(AssertUnwindSafe(|| operation(key, args))) {
            Ok(failure) => failure,
            Err(payload) => Some(OperationFailure::from_panic(payload)),
        };
        if let Some(failure) = &failure {
            tracing::error!(%failure, "governed operation failed");
        }

        let (tail, first_run) = {
            let settings = self.settings.lock();
            let now = Reference::duration_since(&self.clock.now(), self.start);
            let last_run = self.state.last_run(key);
            self.state.record(key, now);
            let tail = throttling_tail(settings.interval, last_run, now);
            #[cfg(feature = "jitter")]
            let tail = settings.jitter.extend(tail);
            (tail, last_run.is_none())
        };
        if !tail.is_zero() {
            self.clock.sleep(tail);
        }

        Execution {
            failure,
            tail,
            first_run,
        }
    }

    /// Called by a caller that found the gate closed; parks it if the governor is blocking.
    fn wait_for_release(&self) -> Exclusion {
        if !self.blocking.load(Ordering::Acquire) {
            return Exclusion::Dropped;
        }
        let mut settings = self.settings.lock();
        // The cycle may have ended, or blocking been turned off, since we looked.
        if self.gate.is_open() || !self.blocking.load(Ordering::Acquire) {
            return Exclusion::Dropped;
        }
        let generation = settings.generation;
        while settings.generation == generation {
            self.released.wait(&mut settings);
        }
        Exclusion::Released
    }
}
