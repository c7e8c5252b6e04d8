use chained_hashmap::ChainedHashMap;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert_fixed(c: &mut Criterion) {
    c.bench_function("chained_map_insert_10k_fixed", |b| {
        b.iter_batched(
            || ChainedHashMap::<String, u64>::with_buckets(1024).expect("valid count"),
            |mut m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.set(key(x), i as u64).expect("set");
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_growing(c: &mut Criterion) {
    // Starts tiny so the run pays for every doubling up to 10k entries.
    c.bench_function("chained_map_insert_10k_growing", |b| {
        b.iter_batched(
            || ChainedHashMap::<String, u64>::with_growth(2, 0.75).expect("valid growth"),
            |mut m| {
                for (i, x) in lcg(3).take(10_000).enumerate() {
                    m.set(key(x), i as u64).expect("set");
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("chained_map_get_hit", |b| {
        let mut m = ChainedHashMap::<String, u64>::with_growth(16, 0.75).expect("valid growth");
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            m.set(k.clone(), i as u64).expect("set");
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().expect("cycle never ends");
            black_box(m.get(k.as_str()));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("chained_map_get_miss", |b| {
        let mut m = ChainedHashMap::<String, u64>::with_growth(16, 0.75).expect("valid growth");
        for (i, x) in lcg(11).take(10_000).enumerate() {
            m.set(key(x), i as u64).expect("set");
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // keys from a disjoint stream, essentially never in the map
            let k = key(miss.next().expect("stream never ends"));
            black_box(m.get(k.as_str()));
        })
    });
}

fn bench_delete_reinsert(c: &mut Criterion) {
    c.bench_function("chained_map_delete_reinsert", |b| {
        let mut m = ChainedHashMap::<String, u64>::with_buckets(1024).expect("valid count");
        let keys: Vec<_> = lcg(17).take(10_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            m.set(k.clone(), i as u64).expect("set");
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().expect("cycle never ends");
            let v = m.delete(k.as_str()).expect("present");
            m.set(k.clone(), v).expect("reinsert");
        })
    });
}

fn bench_traverse(c: &mut Criterion) {
    c.bench_function("chained_map_traverse_10k", |b| {
        let mut m = ChainedHashMap::<String, u64>::with_growth(16, 0.75).expect("valid growth");
        for (i, x) in lcg(23).take(10_000).enumerate() {
            m.set(key(x), i as u64).expect("set");
        }
        b.iter(|| {
            let mut sum = 0u64;
            m.traverse(|_, v| {
                sum = sum.wrapping_add(*v);
                Ok::<(), ()>(())
            })
            .expect("callback never fails");
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_fixed, bench_insert_growing, bench_get_hit, bench_get_miss,
        bench_delete_reinsert, bench_traverse
}
criterion_main!(benches);
