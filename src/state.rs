//! State stores for governors, and the [`Governor`] type itself.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::errors::{Completion, OperationFailure};
use crate::gate::Gate;
#[cfg(feature = "jitter")]
use crate::Jitter;
use crate::{clock, middleware::GovernorMiddleware, middleware::NoOpMiddleware, nanos::Nanos, Policy};

pub mod direct;
mod in_memory;
pub mod keyed;

pub use self::in_memory::InMemoryState;
pub use direct::*;

/// A way for governors to keep track of when a key last ran.
///
/// There are two important kinds of state stores: Direct and keyed. The direct kind have only
/// one state, and are useful for "global" governing (e.g. a process should refresh its
/// configuration at most once a minute). The keyed kind keep one completion time per key
/// (e.g. log a "disk almost full" warning at most once an hour per disk), while every key
/// still shares the governor's single admission gate.
///
/// Governors only touch their state store while holding their settings lock, so a store's
/// reads and writes are never interleaved with a `reset`.
pub trait StateStore {
    /// The type of key that the state store can represent.
    type Key;

    /// Returns when `key` last completed a run, if it did.
    fn last_run(&self, key: &Self::Key) -> Option<Nanos>;

    /// Records that `key` completed a run at `at`.
    fn record(&self, key: &Self::Key, at: Nanos);

    /// Forgets every recorded run.
    fn reset(&self);
}

/// The operation a governor calls, type-erased so it can be replaced at runtime.
pub(crate) type Operation<K, A> = Arc<dyn Fn(&K, A) -> Option<OperationFailure> + Send + Sync>;

pub(crate) fn operation<K, A, F, R>(f: F) -> Operation<K, A>
where
    F: Fn(&K, A) -> R + Send + Sync + 'static,
    R: Completion,
{
    Arc::new(move |key: &K, args: A| f(key, args).into_failure())
}

/// Everything guarded by the governor's settings lock.
pub(crate) struct Settings<K, A> {
    pub(crate) interval: Duration,
    #[cfg(feature = "jitter")]
    pub(crate) jitter: Jitter,
    pub(crate) operation: Operation<K, A>,
    /// Bumped whenever parked callers should return.
    pub(crate) generation: u64,
}

/// A call governor.
///
/// A governor wraps an operation and makes sure that at most one caller runs it at any
/// instant, and that after each run the gate stays closed until the key's interval has
/// elapsed since its previous run. Callers that find the gate closed are turned away, either
/// immediately or (if the governor is blocking) once the current cycle ends. Only the
/// admitted caller ever runs the operation.
///
/// This is the entry point to the library's governing functionality. Governors come in two
/// shapes: direct ones, which keep a single interval (see
/// [the direct constructors](#direct-governors---constructors)), and keyed ones, which track
/// the interval per key (see [the keyed constructors](#keyed-governors---constructors)).
pub struct Governor<K, S, C, MW = NoOpMiddleware, A = ()>
where
    S: StateStore<Key = K>,
    C: clock::Clock,
    MW: GovernorMiddleware<K>,
{
    pub(crate) gate: Gate,
    pub(crate) state: S,
    pub(crate) clock: C,
    pub(crate) start: C::Instant,
    /// Mirrors the blocking policy so turned-away callers can read it without the lock.
    /// Only written while holding `settings`.
    pub(crate) blocking: AtomicBool,
    pub(crate) settings: Mutex<Settings<K, A>>,
    pub(crate) released: Condvar,
    middleware: PhantomData<MW>,
}

impl<K, S, C, A> Governor<K, S, C, NoOpMiddleware, A>
where
    S: StateStore<Key = K>,
    C: clock::Clock,
{
    /// Creates a new governor from components.
    ///
    /// This is the most generic way to construct a governor; most users should prefer
    /// [`direct`][Governor::direct] or other methods instead.
    pub fn new<F, R>(policy: impl Into<Policy>, state: S, clock: C, operation: F) -> Self
    where
        F: Fn(&K, A) -> R + Send + Sync + 'static,
        R: Completion,
    {
        let policy = policy.into();
        let start = clock.now();
        Governor {
            gate: Gate::open(),
            state,
            clock,
            start,
            blocking: AtomicBool::new(policy.blocking),
            settings: Mutex::new(Settings {
                interval: policy.interval,
                #[cfg(feature = "jitter")]
                jitter: Jitter::default(),
                operation: self::operation(operation),
                generation: 0,
            }),
            released: Condvar::new(),
            middleware: PhantomData,
        }
    }
}

impl<K, S, C, MW, A> Governor<K, S, C, MW, A>
where
    S: StateStore<Key = K>,
    C: clock::Clock,
    MW: GovernorMiddleware<K>,
{
    /// Convert the governor into one with a different middleware.
    ///
    /// The resulting governor keeps its state, clock, policy and operation.
    pub fn with_middleware<Outer: GovernorMiddleware<K>>(self) -> Governor<K, S, C, Outer, A> {
        Governor {
            gate: self.gate,
            state: self.state,
            clock: self.clock,
            start: self.start,
            blocking: self.blocking,
            settings: self.settings,
            released: self.released,
            middleware: PhantomData,
        }
    }

    /// Consumes the `Governor` and returns the state store.
    ///
    /// This is mostly useful for debugging and testing.
    pub fn into_state_store(self) -> S {
        self.state
    }

    /// Returns a reference to the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns `true` if a call made right now would be admitted.
    ///
    /// This is only a snapshot: another caller may close the gate right after.
    pub fn is_open(&self) -> bool {
        self.gate.is_open()
    }
}

/// # Configuration
///
/// All of these take the governor's settings lock briefly and can be called from any thread,
/// including from within the governed operation.
impl<K, S, C, MW, A> Governor<K, S, C, MW, A>
where
    S: StateStore<Key = K>,
    C: clock::Clock,
    MW: GovernorMiddleware<K>,
{
    /// The governor's current policy.
    pub fn policy(&self) -> Policy {
        let settings = self.settings.lock();
        Policy {
            interval: settings.interval,
            blocking: self.blocking.load(Ordering::Relaxed),
        }
    }

    /// The minimum interval between runs sharing a key.
    pub fn interval(&self) -> Duration {
        self.settings.lock().interval
    }

    /// Whether callers that are turned away wait for the current cycle to end.
    pub fn is_blocking(&self) -> bool {
        self.blocking.load(Ordering::Acquire)
    }

    /// Changes the minimum interval. Runs that already computed their throttling tail are
    /// not affected.
    pub fn set_interval(&self, interval: Duration) {
        self.settings.lock().interval = interval;
    }

    /// Changes whether callers that are turned away wait for the current cycle to end.
    ///
    /// Turning blocking off releases every caller that is currently waiting.
    pub fn set_blocking(&self, blocking: bool) {
        let mut settings = self.settings.lock();
        self.update_blocking(&mut settings, blocking);
    }

    /// Replaces the governor's policy as a whole.
    pub fn set_policy(&self, policy: impl Into<Policy>) {
        let policy = policy.into();
        let mut settings = self.settings.lock();
        settings.interval = policy.interval;
        self.update_blocking(&mut settings, policy.blocking);
    }

    /// Adds random jitter to every non-zero throttling tail.
    #[cfg(feature = "jitter")]
    pub fn set_jitter(&self, jitter: Jitter) {
        self.settings.lock().jitter = jitter;
    }

    /// Forgets when every key last ran: the next run for any key is treated as its first.
    ///
    /// This does not open the gate if a call currently holds it.
    pub fn reset(&self) {
        let _settings = self.settings.lock();
        self.state.reset();
    }

    pub(crate) fn replace_operation(&self, operation: Operation<K, A>) {
        self.settings.lock().operation = operation;
    }

    fn update_blocking(&self, settings: &mut Settings<K, A>, blocking: bool) {
        let was_blocking = self.blocking.swap(blocking, Ordering::AcqRel);
        if was_blocking && !blocking {
            // release any callers still parked on the old policy
            settings.generation = settings.generation.wrapping_add(1);
            self.released.notify_all();
        }
    }
}

impl<K, S, C, MW, A> fmt::Debug for Governor<K, S, C, MW, A>
where
    S: StateStore<Key = K> + fmt::Debug,
    C: clock::Clock + fmt::Debug,
    MW: GovernorMiddleware<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Governor")
            .field("gate", &self.gate)
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("policy", &self.policy())
            .finish_non_exhaustive()
    }
}
