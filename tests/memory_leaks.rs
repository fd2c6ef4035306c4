#![cfg(unix)]

// This test uses getrusage, so can only be run on Unix.
extern crate libc;

use call_governor::Governor;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn resident_memory_size() -> i64 {
    let mut out: libc::rusage = unsafe { std::mem::zeroed() };
    assert!(unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut out) } == 0);
    out.ru_maxrss
}

const LEAK_TOLERANCE: i64 = 1024 * 1024 * 10;

struct LeakCheck {
    usage_before: i64,
    n_iter: usize,
}

impl Drop for LeakCheck {
    fn drop(&mut self) {
        let usage_after = resident_memory_size();
        assert!(
            usage_after <= self.usage_before + LEAK_TOLERANCE,
            "Plausible memory leak!\nAfter {} iterations, usage before: {}, usage after: {}",
            self.n_iter,
            self.usage_before,
            usage_after
        );
    }
}

impl LeakCheck {
    fn new(n_iter: usize) -> Self {
        LeakCheck {
            n_iter,
            usage_before: resident_memory_size(),
        }
    }
}

#[test]
fn memleak_direct() {
    let governor = Governor::direct(Duration::ZERO, || ());

    let leak_check = LeakCheck::new(500_000);

    for _i in 0..leak_check.n_iter {
        governor.call();
    }
}

#[test]
fn memleak_failing_operation() {
    let governor = Governor::direct(Duration::ZERO, || -> Result<(), String> {
        Err(String::from("nope"))
    });
    let leak_check = LeakCheck::new(100_000);

    for _i in 0..leak_check.n_iter {
        governor.call();
    }
}

#[test]
fn memleak_keyed_reset() {
    let governor = Governor::keyed(Duration::ZERO, |_: &u64| ());
    let leak_check = LeakCheck::new(100);

    for i in 0..leak_check.n_iter as u64 {
        for key in 0..1_000u64 {
            governor.call_key(&(i * 1_000 + key));
        }
        governor.reset();
        governor.shrink_to_fit();
    }
}

#[test]
fn memleak_threaded() {
    let governor = Arc::new(Governor::direct(Duration::ZERO, || ()));
    let leak_check = LeakCheck::new(5_000);

    for _i in 0..leak_check.n_iter {
        let governor = governor.clone();
        thread::spawn(move || {
            governor.call();
        })
        .join()
        .unwrap();
    }
}
