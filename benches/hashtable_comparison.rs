use core::hash::Hash;
use core::hash::Hasher;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::hash_table::Entry as HashbrownEntry;
use hashbrown::hash_table::HashTable as HashbrownHashTable;
use probing_hash::FastHasher;
use probing_hash::HashMap as ProbingHashMap;
use probing_hash::HashTable as ProbingHashTable;
use probing_hash::ReprHash;
use probing_hash::hash_table::Entry as ProbingEntry;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

trait KeyValuePair: Clone {
    fn new(key: u64) -> Self;

    fn hash_key(&self) -> u64;
    fn eq_key(&self, other: &Self) -> bool;
}

#[derive(Clone)]
struct TestItem {
    key: String,
    _value: u64,
}

impl KeyValuePair for TestItem {
    fn new(key: u64) -> Self {
        black_box(Self {
            key: format!("key_{:016X}", key),
            _value: key,
        })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[derive(Clone)]
struct SmallTestItem {
    key: u64,
}

impl KeyValuePair for SmallTestItem {
    fn new(key: u64) -> Self {
        black_box(Self { key })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Find,
    Remove,
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 11),
    (1 << 12),
    (1 << 13),
    (1 << 14),
    (1 << 15),
    (1 << 16),
];

fn random_items<TestItem: KeyValuePair>(count: usize) -> Vec<(u64, TestItem)> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| {
            let key = rng.try_next_u64().unwrap();
            let item = TestItem::new(key);
            (item.hash_key(), item)
        })
        .collect()
}

fn fill_probing<TestItem: KeyValuePair>(
    items: &[(u64, TestItem)],
) -> ProbingHashTable<TestItem> {
    let mut table = ProbingHashTable::new();
    for (hash, item) in items.iter().cloned() {
        if let ProbingEntry::Vacant(entry) = table.entry(hash, |v| v.eq_key(&item)).unwrap() {
            entry.insert(item);
        }
    }
    table
}

fn fill_hashbrown<TestItem: KeyValuePair>(
    items: &[(u64, TestItem)],
) -> HashbrownHashTable<TestItem> {
    let mut table = HashbrownHashTable::new();
    for (hash, item) in items.iter().cloned() {
        if let HashbrownEntry::Vacant(entry) =
            table.entry(hash, |v: &TestItem| v.eq_key(&item), |v| v.hash_key())
        {
            entry.insert(item);
        }
    }
    table
}

fn bench_insert_random<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_{}",
        core::any::type_name::<TestItem>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let hash_and_item = random_items::<TestItem>(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_function(format!("probing_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = hash_and_item.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    let mut table = ProbingHashTable::<TestItem>::with_capacity(1).unwrap();
                    for (hash, item) in hash_and_item {
                        match table.entry(hash, |v| v.eq_key(&item)).unwrap() {
                            ProbingEntry::Vacant(entry) => {
                                black_box(entry.insert(item));
                            }
                            ProbingEntry::Occupied(_) => unreachable!(),
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = hash_and_item.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    let mut table = HashbrownHashTable::with_capacity(1);
                    for (hash, item) in hash_and_item {
                        match table.entry(hash, |v: &TestItem| v.eq_key(&item), |v| v.hash_key()) {
                            HashbrownEntry::Vacant(entry) => {
                                black_box(entry.insert(item));
                            }
                            HashbrownEntry::Occupied(_) => unreachable!(),
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "find_hit_miss_{}",
        core::any::type_name::<TestItem>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let present = random_items::<TestItem>(*size);
        let absent = random_items::<TestItem>(*size);
        let mut lookups = present.iter().chain(absent.iter()).cloned().collect::<Vec<_>>();
        lookups.shuffle(&mut SmallRng::from_os_rng());

        let probing = fill_probing(&present);
        let hashbrown = fill_hashbrown(&present);

        group.throughput(Throughput::Elements(lookups.len() as u64));
        group.bench_function(format!("probing_hash/{size}"), |b| {
            b.iter(|| {
                for (hash, item) in lookups.iter() {
                    black_box(probing.find(*hash, |v| v.eq_key(item)));
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for (hash, item) in lookups.iter() {
                    black_box(hashbrown.find(*hash, |v| v.eq_key(item)));
                }
            })
        });
    }

    group.finish();
}

fn bench_remove<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", core::any::type_name::<TestItem>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let hash_and_item = random_items::<TestItem>(*size);
        let probing = fill_probing(&hash_and_item);
        let hashbrown = fill_hashbrown(&hash_and_item);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("probing_hash/{size}"), |b| {
            b.iter_batched(
                || probing.clone(),
                |mut table| {
                    for (hash, item) in hash_and_item.iter() {
                        black_box(table.remove(*hash, |v| v.eq_key(item)));
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || hashbrown.clone(),
                |mut table| {
                    for (hash, item) in hash_and_item.iter() {
                        if let Ok(entry) = table.find_entry(*hash, |v| v.eq_key(item)) {
                            black_box(entry.remove());
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_mixed_probabilistic_zipf<TestItem: KeyValuePair, const MAX_SIZE: usize>(
    c: &mut Criterion,
) {
    for exponent in [1.0, 1.3] {
        let mut group = c.benchmark_group(format!(
            "mixed_probabilistic_zipf_{:.01}_{}",
            exponent,
            core::any::type_name::<TestItem>()
        ));
        group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

        const KEY_SPACE_MULTIPLIER: u64 = 2;

        for size in SIZES[..=MAX_SIZE].iter() {
            let mut rng = SmallRng::from_os_rng();
            let op_distr = Zipf::new(3.0, exponent).unwrap();
            let operations = (0..size * 3)
                .map(|_| {
                    let op_choice: f64 = rng.sample(op_distr);
                    if op_choice <= 1.0 {
                        Operation::Find
                    } else if op_choice <= 2.0 {
                        Operation::Insert
                    } else {
                        Operation::Remove
                    }
                })
                .collect::<Vec<Operation>>();

            let insert_distr = Zipf::new(*size as f32 - 1.0, 1.0).unwrap();
            let find_remove_distr =
                Zipf::new(*size as f32 * KEY_SPACE_MULTIPLIER as f32 - 1.0, 1.0).unwrap();
            let keyed = |operation: Operation, rng: &mut SmallRng| {
                let key = match operation {
                    Operation::Insert => rng.sample(insert_distr),
                    Operation::Find | Operation::Remove => rng.sample(find_remove_distr),
                } as u64;
                let item = TestItem::new(key);
                (operation, item.hash_key(), item)
            };

            group.throughput(Throughput::Elements(*size as u64 * 3));
            group.bench_function(format!("probing_hash/{size}"), |b| {
                b.iter_batched(
                    || {
                        let mut rng = SmallRng::from_os_rng();
                        let mut operations = operations.clone();
                        operations.shuffle(&mut rng);
                        operations
                            .into_iter()
                            .map(|operation| keyed(operation, &mut rng))
                            .collect::<Vec<_>>()
                    },
                    |operations| {
                        let mut table = ProbingHashTable::<TestItem>::new();
                        for (operation, hash, item) in operations {
                            match operation {
                                Operation::Insert => {
                                    match table.entry(hash, |v| v.eq_key(&item)).unwrap() {
                                        ProbingEntry::Vacant(entry) => {
                                            black_box(entry.insert(item));
                                        }
                                        ProbingEntry::Occupied(mut occupied) => {
                                            *occupied.get_mut() = item;
                                        }
                                    }
                                }
                                Operation::Remove => {
                                    black_box(table.remove(hash, |v| v.eq_key(&item)));
                                }
                                Operation::Find => {
                                    black_box(table.find(hash, |v| v.eq_key(&item)));
                                }
                            }
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });

            group.bench_function(format!("hashbrown/{size}"), |b| {
                b.iter_batched(
                    || {
                        let mut rng = SmallRng::from_os_rng();
                        let mut operations = operations.clone();
                        operations.shuffle(&mut rng);
                        operations
                            .into_iter()
                            .map(|operation| keyed(operation, &mut rng))
                            .collect::<Vec<_>>()
                    },
                    |operations| {
                        let mut table = HashbrownHashTable::<TestItem>::new();
                        for (operation, hash, item) in operations {
                            match operation {
                                Operation::Insert => {
                                    match table.entry(
                                        hash,
                                        |v: &TestItem| v.eq_key(&item),
                                        |v| v.hash_key(),
                                    ) {
                                        HashbrownEntry::Vacant(entry) => {
                                            black_box(entry.insert(item));
                                        }
                                        HashbrownEntry::Occupied(mut occupied) => {
                                            *occupied.get_mut() = item;
                                        }
                                    }
                                }
                                Operation::Remove => {
                                    if let Ok(entry) = table.find_entry(hash, |v| v.eq_key(&item))
                                    {
                                        black_box(entry.remove());
                                    }
                                }
                                Operation::Find => {
                                    black_box(table.find(hash, |v| v.eq_key(&item)));
                                }
                            }
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.finish();
    }
}

fn bench_churn<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<TestItem>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let initial = random_items::<TestItem>(*size / 2);
        let incoming = random_items::<TestItem>(*size);
        let probing = fill_probing(&initial);

        // Each round removes an old item and inserts a new one, so tombstones
        // pile up until growth sweeps them away.
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("probing_hash/{size}"), |b| {
            b.iter_batched(
                || probing.clone(),
                |mut table| {
                    for ((old_hash, old), (hash, item)) in
                        initial.iter().cycle().zip(incoming.iter().cloned())
                    {
                        black_box(table.remove(*old_hash, |v| v.eq_key(old)));
                        if let ProbingEntry::Vacant(entry) =
                            table.entry(hash, |v| v.eq_key(&item)).unwrap()
                        {
                            entry.insert(item);
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_keyed_hashers<const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_insert_get");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let mut keys = (0..*size as u64).collect::<Vec<_>>();
        keys.shuffle(&mut SmallRng::from_os_rng());

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("repr_hash/{size}"), |b| {
            b.iter(|| {
                let mut map = ProbingHashMap::with_hasher(ReprHash::new());
                for &key in keys.iter() {
                    map.insert(key, key).unwrap();
                }
                for key in keys.iter() {
                    black_box(map.get(key).ok());
                }
                black_box(map)
            })
        });

        group.bench_function(format!("fast_hasher/{size}"), |b| {
            b.iter(|| {
                let mut map = ProbingHashMap::with_hasher(FastHasher::default());
                for &key in keys.iter() {
                    map.insert(key, key).unwrap();
                }
                for key in keys.iter() {
                    black_box(map.get(key).ok());
                }
                black_box(map)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<SmallTestItem, 6>,
    bench_insert_random::<TestItem, 6>,
    bench_find_hit_miss::<SmallTestItem, 6>,
    bench_find_hit_miss::<TestItem, 6>,
    bench_remove::<SmallTestItem, 6>,
    bench_remove::<TestItem, 6>,
    bench_mixed_probabilistic_zipf::<SmallTestItem, 6>,
    bench_mixed_probabilistic_zipf::<TestItem, 6>,
    bench_churn::<SmallTestItem, 6>,
    bench_churn::<TestItem, 6>,
    bench_keyed_hashers::<2>,
);

criterion_main!(benches);
