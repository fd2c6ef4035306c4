use all_asserts::{assert_ge, assert_lt};
use call_governor::{
    middleware::{CallOutcome, Exclusion, OutcomeMiddleware},
    Governor, Policy,
};
use std::thread;
use std::time::{Duration, Instant};

/// A governor whose operation signals that it started, then waits to be told to return.
fn held_governor(
    policy: Policy,
) -> (
    call_governor::DefaultDirectGovernor<OutcomeMiddleware>,
    crossbeam::channel::Receiver<()>,
    crossbeam::channel::Sender<()>,
) {
    let (started_tx, started_rx) = crossbeam::channel::unbounded();
    let (proceed_tx, proceed_rx) = crossbeam::channel::bounded::<()>(0);
    let governor = Governor::direct(policy, move || {
        started_tx.send(()).unwrap();
        proceed_rx.recv().unwrap();
    })
    .with_middleware::<OutcomeMiddleware>();
    (governor, started_rx, proceed_tx)
}

#[test]
fn excluded_callers_wait_for_the_cycle() {
    let ms = Duration::from_millis(1);
    let (governor, started, proceed) = held_governor(Policy::every(ms * 200).blocking());

    crossbeam::scope(|scope| {
        let admitted = scope.spawn(|_| governor.call());
        started.recv().unwrap();

        let waiter = scope.spawn(|_| {
            let start = Instant::now();
            let outcome = governor.call();
            (outcome, start.elapsed())
        });

        thread::sleep(ms * 100);
        proceed.send(()).unwrap();

        let (outcome, waited) = waiter.join().unwrap();
        assert_eq!(outcome, CallOutcome::Excluded(Exclusion::Released));
        // the admitted caller's first run holds the gate for the full 200ms tail
        assert_ge!(waited, ms * 200);
        assert!(admitted.join().unwrap().ran());
    })
    .unwrap();

    assert!(governor.is_open());
}

#[test]
fn dropping_callers_return_immediately() {
    let (governor, started, proceed) = held_governor(Policy::every(Duration::ZERO));

    crossbeam::scope(|scope| {
        let admitted = scope.spawn(|_| governor.call());
        started.recv().unwrap();

        // returns while the operation is still running
        let start = Instant::now();
        assert_eq!(governor.call(), CallOutcome::Excluded(Exclusion::Dropped));
        assert_lt!(start.elapsed(), Duration::from_secs(1));
        assert!(!governor.is_open());

        proceed.send(()).unwrap();
        assert!(admitted.join().unwrap().ran());
    })
    .unwrap();
}

#[test]
fn turning_blocking_off_releases_waiters() {
    let (governor, started, proceed) = held_governor(Policy::every(Duration::ZERO).blocking());

    crossbeam::scope(|scope| {
        let admitted = scope.spawn(|_| governor.call());
        started.recv().unwrap();

        let waiters: Vec<_> = (0..4).map(|_| scope.spawn(|_| governor.call())).collect();
        thread::sleep(Duration::from_millis(100));
        governor.set_blocking(false);
        assert!(!governor.is_blocking());

        // every waiter returns while the admitted caller still holds the gate
        for waiter in waiters {
            assert!(!waiter.join().unwrap().ran());
        }
        assert!(!governor.is_open());

        proceed.send(()).unwrap();
        assert!(admitted.join().unwrap().ran());
    })
    .unwrap();
}

#[test]
fn blocking_can_be_turned_on_later() {
    let (governor, started, proceed) = held_governor(Policy::every(Duration::ZERO));
    governor.set_blocking(true);

    crossbeam::scope(|scope| {
        let admitted = scope.spawn(|_| governor.call());
        started.recv().unwrap();
        let waiter = scope.spawn(|_| governor.call());

        thread::sleep(Duration::from_millis(100));
        proceed.send(()).unwrap();

        assert!(admitted.join().unwrap().ran());
        // the waiter parked, or found the cycle already over
        assert!(!waiter.join().unwrap().ran());
    })
    .unwrap();
    assert!(governor.is_open());
}
