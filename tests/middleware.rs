use core::fmt;

use call_governor::{
    clock::FakeRelativeClock,
    middleware::{CallOutcome, Execution, Exclusion, GovernorMiddleware, OutcomeMiddleware},
    Governor,
};
use std::time::Duration;

#[derive(Debug)]
struct MyMW;

#[derive(Debug, PartialEq)]
struct NotAdmitted;

impl fmt::Display for NotAdmitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Not admitted")
    }
}

impl<K> GovernorMiddleware<K> for MyMW {
    type Outcome = Result<u16, NotAdmitted>;

    fn admitted(_key: &K, _execution: Execution) -> Self::Outcome {
        Ok(666)
    }

    fn excluded(_key: &K, _exclusion: Exclusion) -> Self::Outcome {
        Err(NotAdmitted)
    }
}

#[test]
fn changes_outcome_type() {
    let (started_tx, started_rx) = crossbeam::channel::unbounded();
    let (proceed_tx, proceed_rx) = crossbeam::channel::bounded::<()>(0);
    let governor = Governor::direct_with_clock(
        Duration::from_secs(1),
        move || {
            started_tx.send(()).unwrap();
            proceed_rx.recv().unwrap();
        },
        FakeRelativeClock::default(),
    )
    .with_middleware::<MyMW>();

    crossbeam::scope(|scope| {
        let admitted = scope.spawn(|_| governor.call());
        started_rx.recv().unwrap();
        assert_eq!(Err(NotAdmitted), governor.call());
        proceed_tx.send(()).unwrap();
        assert_eq!(Ok(666), admitted.join().unwrap());
    })
    .unwrap();
}

#[test]
fn outcome_information() {
    let clock = FakeRelativeClock::default();
    let governor = Governor::hashmap_with_clock(Duration::from_secs(3), |_: &u8| (), clock)
        .with_middleware::<OutcomeMiddleware>();

    match governor.call_key(&7) {
        CallOutcome::Ran(execution) => {
            assert!(execution.succeeded());
            assert!(execution.is_first_run());
            assert_eq!(execution.tail(), Duration::from_secs(3));
        }
        other => panic!("expected the call to run, got {:?}", other),
    }
    match governor.call_key(&7) {
        CallOutcome::Ran(execution) => {
            assert!(!execution.is_first_run());
            assert_eq!(execution.tail(), Duration::ZERO);
        }
        other => panic!("expected the call to run, got {:?}", other),
    }
}

#[test]
fn mymw_derives() {
    assert_eq!(NotAdmitted, NotAdmitted);
    assert_eq!(format!("{}", NotAdmitted), "Not admitted");
    assert_eq!(format!("{:?}", MyMW), "MyMW");
}
