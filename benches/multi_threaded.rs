use call_governor::state::keyed::{DashMapStateStore, HashMapStateStore, KeyedStateStore};
use call_governor::{clock, Governor};
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub fn bench_all(c: &mut Criterion) {
    bench_direct(c);
    bench_keyed::<HashMapStateStore<u32>>(c);
    bench_keyed::<DashMapStateStore<u32>>(c);
}

const THREADS: u32 = 20;

fn bench_direct(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_threaded");
    group.throughput(Throughput::Elements(1));
    group.bench_function("direct", |b| {
        let clock = clock::FakeRelativeClock::default();
        let governor = Arc::new(Governor::direct_with_clock(
            Duration::from_millis(1),
            || (),
            clock,
        ));

        b.iter_custom(|iters| {
            let mut children = vec![];
            let start = Instant::now();
            for _i in 0..THREADS {
                let governor = governor.clone();
                children.push(thread::spawn(move || {
                    for _i in 0..iters {
                        black_box(governor.call());
                    }
                }));
            }
            for child in children {
                child.join().unwrap()
            }
            start.elapsed()
        })
    });
    group.finish();
}

fn bench_keyed<M: KeyedStateStore<u32> + Default + Send + Sync + 'static>(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_threaded");

    // We perform 3 calls per thread per iter:
    group.throughput(Throughput::Elements(3));

    group.bench_function(BenchmarkId::new("keyed", tynm::type_name::<M>()), |b| {
        let clock = clock::FakeRelativeClock::default();
        let state: M = Default::default();
        let governor = Arc::new(Governor::new(
            Duration::from_millis(1),
            state,
            clock,
            |_: &u32, ()| (),
        ));

        b.iter_custom(|iters| {
            let mut children = vec![];
            let start = Instant::now();
            for _i in 0..THREADS {
                let governor = governor.clone();
                children.push(thread::spawn(move || {
                    for _i in 0..iters {
                        black_box(governor.call_key(&1u32));
                        black_box(governor.call_key(&2u32));
                        black_box(governor.call_key(&3u32));
                    }
                }));
            }
            for child in children {
                child.join().unwrap()
            }
            start.elapsed()
        })
    });
    group.finish();
}
