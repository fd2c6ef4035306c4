//! Keyed governors.
//!
//! These are governors that have one policy and one admission gate, but keep a separate
//! completion time per key. Only one call runs at a time across all keys; whether it then
//! holds the gate closed, and for how long, depends on when its own key last ran.

use std::hash::Hash;

use crate::errors::Completion;
use crate::nanos::Nanos;
use crate::state::{operation, StateStore};
use crate::{clock, middleware::GovernorMiddleware, Governor, Policy};

/// A trait for state stores with one completion time per key.
///
/// Implemented by [`HashMapStateStore`] and (with the `dashmap` feature)
/// `DashMapStateStore`.
pub trait KeyedStateStore<K: Hash>: StateStore<Key = K> {
    /// Shrinks the capacity of the state store, if possible.
    ///
    /// This is useful after a [`reset`][StateStore::reset] of a store that tracked many keys.
    fn shrink_to_fit(&self);

    /// Returns the number of keys in the state store.
    fn len(&self) -> usize;

    /// Returns `true` if the state store tracks no keys.
    fn is_empty(&self) -> bool;
}

/// # Keyed governors - Constructors
///
/// Here we construct a keyed governor: one gate shared by all callers, with an interval
/// kept per key.
impl<K> Governor<K, DefaultKeyedStateStore<K>, clock::DefaultClock>
where
    K: Clone + Hash + Eq,
{
    /// Constructs a new keyed governor backed by
    /// the [`DefaultKeyedStateStore`].
    pub fn keyed<F, R>(policy: impl Into<Policy>, operation: F) -> Self
    where
        F: Fn(&K) -> R + Send + Sync + 'static,
        R: Completion,
    {
        let state = DefaultKeyedStateStore::default();
        let clock = clock::DefaultClock::default();
        Governor::new(policy, state, clock, move |key: &K, ()| operation(key))
    }
}

/// # Keyed governors - Making calls
impl<K, S, C, MW> Governor<K, S, C, MW>
where
    S: KeyedStateStore<K>,
    K: Hash,
    C: clock::Clock,
    MW: GovernorMiddleware<K>,
{
    /// Attempts a governed call of the operation for `key`.
    ///
    /// If the gate is open, this caller runs the operation with `key`, then holds the gate
    /// closed (for callers of *every* key) for the remainder of `key`'s interval. Otherwise,
    /// the call returns without running anything.
    pub fn call_key(&self, key: &K) -> MW::Outcome {
        self.govern(key, ())
    }

    /// Replaces the governed operation. Runs already in progress finish with the old one.
    pub fn set_key_operation<F, R>(&self, operation: F)
    where
        F: Fn(&K) -> R + Send + Sync + 'static,
        R: Completion,
    {
        self.replace_operation(self::operation(move |key: &K, ()| operation(key)))
    }
}

/// # Keyed governors - Housekeeping
impl<K, S, C, MW, A> Governor<K, S, C, MW, A>
where
    S: KeyedStateStore<K>,
    K: Hash,
    C: clock::Clock,
    MW: GovernorMiddleware<K>,
{
    /// Returns when `key` last completed a run, measured from the governor's creation.
    pub fn last_run(&self, key: &K) -> Option<Nanos> {
        let _settings = self.settings.lock();
        self.state.last_run(key)
    }

    /// Shrinks the capacity of the governor's state store, if possible.
    pub fn shrink_to_fit(&self) {
        self.state.shrink_to_fit();
    }

    /// Returns the number of keys the governor has seen since it was created or last reset.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns `true` if no key ran since the governor was created or last reset.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

mod hashmap;

pub use hashmap::HashMapStateStore;

#[cfg(feature = "dashmap")]
mod dashmap;

#[cfg(feature = "dashmap")]
pub use self::dashmap::DashMapStateStore;

#[cfg(feature = "dashmap")]
/// The default keyed governor state: a [`DashMap`][::dashmap::DashMap].
pub type DefaultKeyedStateStore<K> = DashMapStateStore<K>;

#[cfg(not(feature = "dashmap"))]
/// The default keyed governor state: a [`HashMap`][std::collections::HashMap] behind a lock.
pub type DefaultKeyedStateStore<K> = HashMapStateStore<K>;
