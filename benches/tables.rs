use std::hash::BuildHasherDefault;
use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use hashbrown::HashSet;
use rand::{distributions::Uniform, prelude::Distribution, Rng};
use rustc_hash::FxHasher;

use hashing_gym::hash::{HashFamily, PolynomialFamily};
use hashing_gym::table::{
    ChainedTable, CuckooTable, LinearProbingTable, RobinHoodTable, SecondChoiceTable, Table,
};
use hashing_gym::Key;

const FAMILY_SEED: u64 = 137;
const BATCH_SIZE: usize = 1024;

fn slots_for<S: SetLike>(keys: usize) -> usize {
    (keys as f64 / S::MAX_LOAD).ceil() as usize + 1
}

fn lookup_dense<S: SetLike>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("Lookups (Dense, {})", S::NAME));
    let mut rng = rand::thread_rng();
    for set_size in [1usize << 10, 1 << 16, 1 << 20] {
        let mut set = S::with_slots(slots_for::<S>(set_size));
        for key in 0..set_size as Key {
            set.add(key);
        }

        group.throughput(Throughput::Elements(BATCH_SIZE as u64));
        group.bench_with_input(format!("hits, size={set_size}"), &set, |b, s| {
            let between = Uniform::from(0..set_size as Key);
            let elts: Vec<Key> = (0..BATCH_SIZE).map(|_| between.sample(&mut rng)).collect();
            b.iter(|| {
                for elt in &elts {
                    black_box(s.lookup(*elt));
                }
            })
        });
        group.bench_with_input(format!("misses, size={set_size}"), &set, |b, s| {
            let between = Uniform::from(set_size as Key..Key::MAX);
            let elts: Vec<Key> = (0..BATCH_SIZE).map(|_| between.sample(&mut rng)).collect();
            b.iter(|| {
                for elt in &elts {
                    black_box(s.lookup(*elt));
                }
            })
        });
    }
}

fn lookup_random<S: SetLike>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("Lookups (Random, {})", S::NAME));
    let mut rng = rand::thread_rng();
    for set_size in [1usize << 10, 1 << 16, 1 << 20] {
        // Generate `set_size` unique keys
        let mut keys: HashSet<Key> = HashSet::with_capacity(set_size);
        while keys.len() < set_size {
            keys.insert(rng.gen());
        }
        let mut set = S::with_slots(slots_for::<S>(set_size));
        for key in &keys {
            set.add(*key);
        }

        group.throughput(Throughput::Elements(BATCH_SIZE as u64));
        group.bench_with_input(format!("hits, size={set_size}"), &set, |b, s| {
            let elts: Vec<Key> = keys.iter().take(BATCH_SIZE).copied().collect();
            b.iter(|| {
                for elt in &elts {
                    black_box(s.lookup(*elt));
                }
            })
        });
        group.bench_with_input(format!("misses, size={set_size}"), &set, |b, s| {
            let mut elts = Vec::with_capacity(BATCH_SIZE);
            for _ in 0..BATCH_SIZE {
                let mut candidate = rng.gen();
                while keys.contains(&candidate) {
                    candidate = rng.gen();
                }
                elts.push(candidate);
            }
            b.iter(|| {
                for elt in &elts {
                    black_box(s.lookup(*elt));
                }
            })
        });
    }
}

fn churn<S: SetLike>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("Churn ({})", S::NAME));
    let mut rng = rand::thread_rng();
    for set_size in [1usize << 10, 1 << 16] {
        let mut keys: HashSet<Key> = HashSet::with_capacity(set_size);
        while keys.len() < set_size {
            keys.insert(rng.gen());
        }
        let mut set = S::with_slots(slots_for::<S>(set_size));
        for key in &keys {
            set.add(*key);
        }
        let batch: Vec<Key> = keys.iter().take(BATCH_SIZE).copied().collect();

        group.throughput(Throughput::Elements(2 * BATCH_SIZE as u64));
        // Each pass removes and reinserts the batch, so the load factor is
        // the same at every iteration boundary.
        group.bench_function(format!("remove+insert, size={set_size}"), |b| {
            b.iter(|| {
                for key in &batch {
                    set.del(*key);
                    set.add(*key);
                }
            })
        });
    }
}

trait SetLike {
    const NAME: &'static str;
    /// Steady-state load factor the scheme is benched at; sizing divides
    /// the key count by this.
    const MAX_LOAD: f64;
    fn with_slots(slots: usize) -> Self;
    fn add(&mut self, k: Key);
    fn lookup(&self, k: Key) -> bool;
    fn del(&mut self, k: Key);
}

criterion_group!(
    benches,
    lookup_dense::<FxSet>,
    lookup_dense::<ChainedTable>,
    lookup_dense::<LinearProbingTable>,
    lookup_dense::<RobinHoodTable>,
    lookup_dense::<SecondChoiceTable>,
    lookup_dense::<CuckooTable>,
    lookup_random::<FxSet>,
    lookup_random::<ChainedTable>,
    lookup_random::<LinearProbingTable>,
    lookup_random::<RobinHoodTable>,
    lookup_random::<SecondChoiceTable>,
    lookup_random::<CuckooTable>,
    churn::<FxSet>,
    churn::<ChainedTable>,
    churn::<LinearProbingTable>,
    churn::<RobinHoodTable>,
    churn::<SecondChoiceTable>,
    churn::<CuckooTable>,
);

criterion_main!(benches);

type FxSet = HashSet<Key, BuildHasherDefault<FxHasher>>;

impl SetLike for FxSet {
    const NAME: &'static str = "hashbrown-fx";
    const MAX_LOAD: f64 = 0.9;
    fn with_slots(slots: usize) -> Self {
        FxSet::with_capacity_and_hasher(slots, Default::default())
    }
    fn add(&mut self, k: Key) {
        self.insert(k);
    }
    fn lookup(&self, k: Key) -> bool {
        self.contains(&k)
    }
    fn del(&mut self, k: Key) {
        self.remove(&k);
    }
}

impl SetLike for ChainedTable {
    const NAME: &'static str = "chained";
    const MAX_LOAD: f64 = 1.0;
    fn with_slots(slots: usize) -> Self {
        ChainedTable::new(slots, &PolynomialFamily::new(2, FAMILY_SEED))
    }
    fn add(&mut self, k: Key) {
        Table::insert(self, k);
    }
    fn lookup(&self, k: Key) -> bool {
        Table::contains(self, k)
    }
    fn del(&mut self, k: Key) {
        Table::remove(self, k);
    }
}

impl SetLike for LinearProbingTable {
    const NAME: &'static str = "linear-probing";
    const MAX_LOAD: f64 = 0.9;
    fn with_slots(slots: usize) -> Self {
        LinearProbingTable::new(slots, &PolynomialFamily::new(2, FAMILY_SEED))
    }
    fn add(&mut self, k: Key) {
        Table::insert(self, k);
    }
    fn lookup(&self, k: Key) -> bool {
        Table::contains(self, k)
    }
    fn del(&mut self, k: Key) {
        Table::remove(self, k);
    }
}

impl SetLike for RobinHoodTable {
    const NAME: &'static str = "robin-hood";
    const MAX_LOAD: f64 = 0.9;
    fn with_slots(slots: usize) -> Self {
        RobinHoodTable::new(slots, &PolynomialFamily::new(2, FAMILY_SEED))
    }
    fn add(&mut self, k: Key) {
        Table::insert(self, k);
    }
    fn lookup(&self, k: Key) -> bool {
        Table::contains(self, k)
    }
    fn del(&mut self, k: Key) {
        Table::remove(self, k);
    }
}

impl SetLike for SecondChoiceTable {
    const NAME: &'static str = "second-choice";
    const MAX_LOAD: f64 = 1.0;
    fn with_slots(slots: usize) -> Self {
        SecondChoiceTable::new(slots, &PolynomialFamily::new(2, FAMILY_SEED))
    }
    fn add(&mut self, k: Key) {
        Table::insert(self, k);
    }
    fn lookup(&self, k: Key) -> bool {
        Table::contains(self, k)
    }
    fn del(&mut self, k: Key) {
        Table::remove(self, k);
    }
}

impl SetLike for CuckooTable {
    const NAME: &'static str = "cuckoo";
    const MAX_LOAD: f64 = 0.45;
    fn with_slots(slots: usize) -> Self {
        let family: Rc<dyn HashFamily> = Rc::new(PolynomialFamily::new(2, FAMILY_SEED));
        CuckooTable::new(slots, family)
    }
    fn add(&mut self, k: Key) {
        Table::insert(self, k);
    }
    fn lookup(&self, k: Key) -> bool {
        Table::contains(self, k)
    }
    fn del(&mut self, k: Key) {
        Table::remove(self, k);
    }
}
