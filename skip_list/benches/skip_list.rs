use std::hint::black_box;
use std::thread;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use ordo_skip_list::skip_list::{SkipList, SkipListBuilder};

const THREADS: u64 = 16;
const TOTAL_OPS: u64 = 50_000;

fn seeded() -> SkipList<u64, u64> {
    let mut builder = SkipListBuilder::default();
    builder.set_seed(99);
    builder.build()
}

fn insert_sequential(c: &mut Criterion) {
    c.bench_function("insert_4k_sequential", |b| {
        b.iter_batched(
            seeded,
            |list| {
                for key in 0..4096u64 {
                    list.insert(key, key);
                }
                list
            },
            BatchSize::SmallInput,
        )
    });
}

fn search_prefilled(c: &mut Criterion) {
    let list = seeded();
    for key in 0..TOTAL_OPS {
        list.insert(key, key);
    }
    let mut probe = 0;
    c.bench_function("search_prefilled_50k", |b| {
        b.iter(|| {
            probe = (probe + 7919) % TOTAL_OPS;
            black_box(list.search(&probe))
        })
    });
}

fn concurrent_insert_pressure(c: &mut Criterion) {
    let per_thread = TOTAL_OPS / THREADS;
    c.bench_function("concurrent_insert_16_threads", |b| {
        b.iter_batched(
            seeded,
            |list| {
                thread::scope(|s| {
                    for t in 0..THREADS {
                        let list = list.clone();
                        s.spawn(move || {
                            for i in 0..per_thread {
                                list.insert(t * per_thread + i, i);
                            }
                        });
                    }
                });
                list
            },
            BatchSize::PerIteration,
        )
    });
}

criterion_group!(
    benches,
    insert_sequential,
    search_prefilled,
    concurrent_insert_pressure
);
criterion_main!(benches);
