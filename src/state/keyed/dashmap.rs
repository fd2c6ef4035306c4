use std::hash::Hash;

use dashmap::DashMap;

use crate::errors::Completion;
use crate::nanos::Nanos;
use crate::state::keyed::KeyedStateStore;
use crate::state::StateStore;
use crate::{clock, Governor, Policy};

/// A concurrent, thread-safe and fairly performant hashmap based on [`DashMap`].
pub type DashMapStateStore<K> = DashMap<K, Nanos>;

impl<K: Hash + Eq + Clone> StateStore for DashMapStateStore<K> {
    type Key = K;

    fn last_run(&self, key: &Self::Key) -> Option<Nanos> {
        self.get(key).map(|v| *v)
    }

    fn record(&self, key: &Self::Key, at: Nanos) {
        if let Some(mut v) = self.get_mut(key) {
            // fast path: the key ran before.
            *v = at;
            return;
        }
        self.insert(key.clone(), at);
    }

    fn reset(&self) {
        self.clear();
    }
}

impl<K: Hash + Eq + Clone> KeyedStateStore<K> for DashMapStateStore<K> {
    fn shrink_to_fit(&self) {
        DashMap::shrink_to_fit(self);
    }

    fn len(&self) -> usize {
        DashMap::len(self)
    }

    fn is_empty(&self) -> bool {
        DashMap::is_empty(self)
    }
}

/// # Keyed governors - [`DashMap`]-backed
impl<K> Governor<K, DashMapStateStore<K>, clock::DefaultClock>
where
    K: Hash + Eq + Clone,
{
    /// Constructs a new keyed governor explicitly backed by a [`DashMap`].
    pub fn dashmap<F, R>(policy: impl Into<Policy>, operation: F) -> Self
    where
        F: Fn(&K) -> R + Send + Sync + 'static,
        R: Completion,
    {
        let clock = clock::DefaultClock::default();
        Self::dashmap_with_clock(policy, operation, clock)
    }
}

impl<K, C> Governor<K, DashMapStateStore<K>, C>
where
    K: Hash + Eq + Clone,
    C: clock::Clock,
{
    /// Constructs a new keyed governor with a custom clock, backed by a [`DashMap`].
    pub fn dashmap_with_clock<F, R>(policy: impl Into<Policy>, operation: F, clock: C) -> Self
    where
        F: Fn(&K) -> R + Send + Sync + 'static,
        R: Completion,
    {
        let state: DashMapStateStore<K> = DashMap::default();
        Governor::new(policy, state, clock, move |key: &K, ()| operation(key))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn records_and_forgets() {
        let store: DashMapStateStore<u32> = DashMap::default();
        assert!(KeyedStateStore::is_empty(&store));
        store.record(&1, Nanos::from(5));
        store.record(&1, Nanos::from(6));
        store.record(&2, Nanos::from(7));
        assert_eq!(KeyedStateStore::len(&store), 2);
        assert_eq!(store.last_run(&1), Some(Nanos::from(6)));

        StateStore::reset(&store);
        KeyedStateStore::shrink_to_fit(&store);
        assert!(KeyedStateStore::is_empty(&store));
        assert_eq!(store.last_run(&2), None);
    }
}
