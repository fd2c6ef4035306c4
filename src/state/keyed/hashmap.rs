use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use parking_lot::Mutex;

use crate::errors::Completion;
use crate::nanos::Nanos;
use crate::state::keyed::KeyedStateStore;
use crate::state::StateStore;
use crate::{clock, Governor, Policy};

/// A thread-safe (but not very performant) implementation of a keyed governor state
/// store using [`HashMap`].
///
/// The `HashMapStateStore` is the default state store when the `dashmap` feature is disabled.
pub type HashMapStateStore<K, S = RandomState> = Mutex<HashMap<K, Nanos, S>>;

impl<K: Hash + Eq + Clone, S: BuildHasher> StateStore for HashMapStateStore<K, S> {
    type Key = K;

    fn last_run(&self, key: &Self::Key) -> Option<Nanos> {
        self.lock().get(key).copied()
    }

    fn record(&self, key: &Self::Key, at: Nanos) {
        let mut map = self.lock();
        if let Some(v) = map.get_mut(key) {
            // fast path: the key ran before.
            *v = at;
            return;
        }
        map.insert(key.clone(), at);
    }

    fn reset(&self) {
        self.lock().clear();
    }
}

impl<K: Hash + Eq + Clone, S: BuildHasher> KeyedStateStore<K> for HashMapStateStore<K, S> {
    fn shrink_to_fit(&self) {
        self.lock().shrink_to_fit();
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// # Keyed governors - [`HashMap`]-backed
impl<K> Governor<K, HashMapStateStore<K>, clock::DefaultClock>
where
    K: Hash + Eq + Clone,
{
    /// Constructs a new keyed governor explicitly backed by a [`HashMap`].
    pub fn hashmap<F, R>(policy: impl Into<Policy>, operation: F) -> Self
    where
        F: Fn(&K) -> R + Send + Sync + 'static,
        R: Completion,
    {
        let clock = clock::DefaultClock::default();
        Self::hashmap_with_clock(policy, operation, clock)
    }
}

impl<K, C> Governor<K, HashMapStateStore<K>, C>
where
    K: Hash + Eq + Clone,
    C: clock::Clock,
{
    /// Constructs a new keyed governor with a custom clock, backed by a [`HashMap`].
    pub fn hashmap_with_clock<F, R>(policy: impl Into<Policy>, operation: F, clock: C) -> Self
    where
        F: Fn(&K) -> R + Send + Sync + 'static,
        R: Completion,
    {
        let state: HashMapStateStore<K> = Mutex::new(HashMap::new());
        Governor::new(policy, state, clock, move |key: &K, ()| operation(key))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn records_and_forgets() {
        let store: HashMapStateStore<&str> = Mutex::new(HashMap::new());
        assert!(store.is_empty());
        assert_eq!(store.last_run(&"a"), None);

        store.record(&"a", Nanos::from(5));
        store.record(&"a", Nanos::from(9));
        store.record(&"b", Nanos::from(7));
        assert_eq!(store.len(), 2);
        assert_eq!(store.last_run(&"a"), Some(Nanos::from(9)));

        store.reset();
        store.shrink_to_fit();
        assert!(store.is_empty());
        assert_eq!(store.last_run(&"b"), None);
    }
}
