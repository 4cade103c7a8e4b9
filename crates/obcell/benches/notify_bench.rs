//! Criterion benchmarks for the notification hot path.
//!
//! Measures `set()` fan-out cost against subscription count, plus the
//! subscribe/unsubscribe churn path. Keep subscriber work trivial so the
//! numbers reflect container overhead, not callback bodies.

use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use obcell::{Interest, ObservableValue, ObserverId};

fn bench_set_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_fanout");
    for subscriber_count in [0usize, 1, 8, 64] {
        group.throughput(Throughput::Elements(subscriber_count.max(1) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            &subscriber_count,
            |b, &subscriber_count| {
                let observable = ObservableValue::new(0u64);
                let sink = Rc::new(Cell::new(0u64));
                let mut owners = Vec::new();
                for _ in 0..subscriber_count {
                    let owner = Rc::new(());
                    let id = ObserverId::of(&owner);
                    owners.push(owner);
                    let sink_cb = Rc::clone(&sink);
                    observable.subscribe(&id, Interest::OLD | Interest::NEW, move |v, _| {
                        sink_cb.set(sink_cb.get().wrapping_add(*v));
                    });
                }
                let mut tick = 0u64;
                b.iter(|| {
                    tick = tick.wrapping_add(1);
                    observable.set(black_box(tick));
                });
                black_box(sink.get());
            },
        );
    }
    group.finish();
}

fn bench_subscribe_churn(c: &mut Criterion) {
    c.bench_function("subscribe_unsubscribe_churn", |b| {
        let observable = ObservableValue::new(0u32);
        let owner = Rc::new(());
        let id = ObserverId::of(&owner);
        b.iter(|| {
            observable.subscribe(&id, Interest::NEW, |v, _| {
                black_box(*v);
            });
            observable.unsubscribe(&id);
        });
    });
}

fn bench_prune_dead(c: &mut Criterion) {
    c.bench_function("set_with_dead_majority", |b| {
        b.iter_batched(
            || {
                let observable = ObservableValue::new(0u32);
                let keeper = Rc::new(());
                let keeper_id = ObserverId::of(&keeper);
                observable.subscribe(&keeper_id, Interest::NEW, |v, _| {
                    black_box(*v);
                });
                for _ in 0..63 {
                    let transient = Rc::new(());
                    let id = ObserverId::of(&transient);
                    observable.subscribe(&id, Interest::NEW, |v, _| {
                        black_box(*v);
                    });
                    // transient dropped here; entry stays until next set().
                }
                (observable, keeper)
            },
            |(observable, _keeper)| observable.set(1),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_set_fanout, bench_subscribe_churn, bench_prune_dead);
criterion_main!(benches);
