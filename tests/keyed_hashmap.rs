use call_governor::{
    clock::{Clock, FakeRelativeClock},
    middleware::{CallOutcome, Exclusion, OutcomeMiddleware},
    state::keyed::HashMapStateStore,
    Governor, Nanos,
};
use std::collections::HashMap;
use std::time::Duration;

const KEYS: &[u32] = &[1u32, 2u32];

#[test]
fn intervals_are_kept_per_key() {
    let clock = FakeRelativeClock::default();
    let s = Duration::from_secs(1);
    let governor = Governor::hashmap_with_clock(s * 2, |_: &u32| (), clock.clone())
        .with_middleware::<OutcomeMiddleware>();

    for key in KEYS {
        match governor.call_key(key) {
            CallOutcome::Ran(execution) => {
                assert!(execution.is_first_run());
                assert_eq!(execution.tail(), s * 2);
            }
            other => panic!("expected the call to run, got {:?}", other),
        }
    }
    assert_eq!(clock.now(), Nanos::from(s * 4));
    assert_eq!(governor.len(), 2);

    // key 2 completed at t=2s; it's now t=4s.
    match governor.call_key(&2) {
        CallOutcome::Ran(execution) => assert_eq!(execution.tail(), Duration::ZERO),
        other => panic!("expected the call to run, got {:?}", other),
    }
    // ...and just ran again.
    match governor.call_key(&2) {
        CallOutcome::Ran(execution) => assert_eq!(execution.tail(), s * 2),
        other => panic!("expected the call to run, got {:?}", other),
    }
}

#[test]
fn keys_share_the_gate() {
    let (started_tx, started_rx) = crossbeam::channel::unbounded();
    let (proceed_tx, proceed_rx) = crossbeam::channel::bounded::<()>(0);
    let governor = Governor::hashmap(Duration::ZERO, move |key: &u32| {
        if *key == 1 {
            started_tx.send(()).unwrap();
            proceed_rx.recv().unwrap();
        }
    })
    .with_middleware::<OutcomeMiddleware>();

    crossbeam::scope(|scope| {
        let admitted = scope.spawn(|_| governor.call_key(&1));
        started_rx.recv().unwrap();
        assert_eq!(
            governor.call_key(&2),
            CallOutcome::Excluded(Exclusion::Dropped)
        );
        proceed_tx.send(()).unwrap();
        assert!(admitted.join().unwrap().ran());
    })
    .unwrap();
}

#[test]
fn housekeeping() {
    let clock = FakeRelativeClock::default();
    let governor = Governor::hashmap_with_clock(Duration::ZERO, |_: &u32| (), clock);
    assert!(governor.is_empty());
    for key in 0..100u32 {
        governor.call_key(&key);
    }
    assert_eq!(governor.len(), 100);

    governor.reset();
    governor.shrink_to_fit();
    assert!(governor.is_empty());

    let state: HashMapStateStore<u32> = governor.into_state_store();
    let map: HashMap<u32, Nanos> = state.into_inner();
    assert!(map.capacity() < 100);
}
