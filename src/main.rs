use std::rc::Rc;
use std::time::Instant;

use rand::distributions::{Distribution, Uniform, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use hashing_gym::fenwick::FenwickTree;
use hashing_gym::hash::{all_families, fixed_hashes, HashFamily};
use hashing_gym::table::{
    ChainedTable, CuckooTable, LinearProbingTable, RobinHoodTable, SecondChoiceTable, Table,
};
use hashing_gym::tree::trees;
use hashing_gym::workload::{mixed_ops, run_differential};
use hashing_gym::Key;

const USAGE: &str = "\
hashing-gym: drive every collision-resolution scheme under every hash family

usage: hashing-gym [--seed N] [--ops N] [--table NAME] [--family NAME]
                   [--trees] [--skip-timing] [--help]

  --seed N        base seed for hash sampling and workloads (default 137)
  --ops N         operations per timing run (default 100000)
  --table NAME    only run schemes whose name contains NAME
  --family NAME   only run families whose name contains NAME
  --trees         also run the static search tree timings
  --skip-timing   stop after the correctness phase
";

const SCHEMES: [&str; 5] = [
    "chained",
    "linear-probing",
    "robin-hood",
    "second-choice",
    "cuckoo",
];

/// Schemes that sample one hash function and so also run under the fixed
/// hashes.
const SINGLE_HASH_SCHEMES: [&str; 3] = ["chained", "linear-probing", "robin-hood"];

// Load-factor ladders. Chained schemes can be pushed past one key per
// bucket; the probing tables stop just short of full; cuckoo rarely
// settles past half load, so its ladder creeps up on 0.5 instead.
const PROBING_LOADS: [f64; 5] = [0.3, 0.5, 0.7, 0.9, 0.99];
const CHAINED_LOADS: [f64; 7] = [0.3, 0.5, 0.7, 0.9, 0.99, 2.0, 5.0];
const CUCKOO_LOADS: [f64; 5] = [0.2, 0.3, 0.4, 0.45, 0.47];

const TREE_KEYS: usize = 1 << 16;
const TREE_LOOKUPS: usize = 1 << 18;
const ZIPF_EXPONENTS: [f64; 5] = [0.5, 0.75, 1.0, 1.2, 1.3];

struct Args {
    seed: u64,
    ops: usize,
    table: Option<String>,
    family: Option<String>,
    trees: bool,
    skip_timing: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains("--help") {
        print!("{USAGE}");
        std::process::exit(0);
    }
    let parsed = Args {
        seed: args.opt_value_from_str("--seed")?.unwrap_or(137),
        ops: args.opt_value_from_str("--ops")?.unwrap_or(100_000),
        table: args.opt_value_from_str("--table")?,
        family: args.opt_value_from_str("--family")?,
        trees: args.contains("--trees"),
        skip_timing: args.contains("--skip-timing"),
    };
    let rest = args.finish();
    anyhow::ensure!(rest.is_empty(), "unrecognized arguments: {rest:?}");
    Ok(parsed)
}

fn keep(filter: &Option<String>, name: &str) -> bool {
    filter.as_ref().map_or(true, |f| name.contains(f.as_str()))
}

fn build_table(scheme: &str, capacity: usize, family: &Rc<dyn HashFamily>) -> Box<dyn Table> {
    match scheme {
        "chained" => ChainedTable::new(capacity, family.as_ref()).boxed(),
        "linear-probing" => LinearProbingTable::new(capacity, family.as_ref()).boxed(),
        "robin-hood" => RobinHoodTable::new(capacity, family.as_ref()).boxed(),
        "second-choice" => SecondChoiceTable::new(capacity, family.as_ref()).boxed(),
        "cuckoo" => CuckooTable::new(capacity, Rc::clone(family)).boxed(),
        _ => unreachable!("unknown scheme {scheme}"),
    }
}

/// Replay the differential workload at three sizes; one line per scheme
/// and family, with failures detailed on the error log.
fn run_correctness(args: &Args) -> usize {
    println!("correctness: differential replay against the reference set");
    let tiers = [(12usize, 5usize), (120, 50), (12_000, 5_000)];
    let mut failures = 0;
    let mut check = |scheme: &str, family_name: &str, family: &Rc<dyn HashFamily>| {
        let mut verdict = "pass";
        for &(capacity, count) in &tiers {
            let mut table = build_table(scheme, capacity, family);
            let mut rng = StdRng::seed_from_u64(args.seed.wrapping_add(1));
            let ops = mixed_ops(count, count as Key * 4, &mut rng);
            if let Err(divergence) = run_differential(table.as_mut(), &ops) {
                log::error!("{scheme} under {family_name} ({capacity} slots): {divergence}");
                verdict = "FAIL";
                failures += 1;
            }
        }
        println!("  {scheme:16} {family_name:26} {verdict}");
    };
    for (family_name, family) in all_families(args.seed) {
        if !keep(&args.family, &family_name) {
            continue;
        }
        log::info!("checking schemes under {family_name}");
        for scheme in SCHEMES {
            if keep(&args.table, scheme) {
                check(scheme, &family_name, &family);
            }
        }
    }
    for (hash_name, hash) in fixed_hashes() {
        if !keep(&args.family, &hash_name) {
            continue;
        }
        for scheme in SINGLE_HASH_SCHEMES {
            if keep(&args.table, scheme) {
                check(scheme, &hash_name, &hash);
            }
        }
    }
    failures
}

fn loads_for(scheme: &str) -> &'static [f64] {
    match scheme {
        "cuckoo" => &CUCKOO_LOADS,
        "chained" | "second-choice" => &CHAINED_LOADS,
        _ => &PROBING_LOADS,
    }
}

/// Fill `table` to `load` and report (insert ns/op, lookup ns/op).
fn time_table(
    table: &mut dyn Table,
    load: f64,
    ops: usize,
    key_space: Key,
    seed: u64,
) -> (f64, f64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let spread = Uniform::from(0..key_space);
    let inserts = (ops as f64 * load) as usize;
    let keys: Vec<Key> = (0..inserts).map(|_| spread.sample(&mut rng)).collect();
    let start = Instant::now();
    for &key in &keys {
        table.insert(key);
    }
    let insert_ns = start.elapsed().as_nanos() as f64 / inserts.max(1) as f64;

    let probes: Vec<Key> = (0..ops).map(|_| spread.sample(&mut rng)).collect();
    let start = Instant::now();
    let mut hits = 0usize;
    for &key in &probes {
        hits += table.contains(key) as usize;
    }
    let lookup_ns = start.elapsed().as_nanos() as f64 / ops.max(1) as f64;
    std::hint::black_box(hits);
    (insert_ns, lookup_ns)
}

fn run_timing(args: &Args) {
    let capacity = args.ops + 2;
    let key_space = (args.ops as i64 * 4).min(Key::MAX as i64).max(4) as Key;
    println!();
    println!("timing: {} operations per run, {} slots", args.ops, capacity);
    println!(
        "  {:16} {:26} {:>6} {:>12} {:>12}",
        "table", "family", "load", "insert ns", "lookup ns"
    );
    let mut report = |scheme: &str, family_name: &str, family: &Rc<dyn HashFamily>| {
        log::info!("timing {scheme} under {family_name}");
        for &load in loads_for(scheme) {
            let mut table = build_table(scheme, capacity, family);
            let (insert_ns, lookup_ns) = time_table(
                table.as_mut(),
                load,
                args.ops,
                key_space,
                args.seed.wrapping_add(2),
            );
            println!(
                "  {scheme:16} {family_name:26} {load:>6.2} {insert_ns:>12.1} {lookup_ns:>12.1}"
            );
        }
    };
    for (family_name, family) in all_families(args.seed) {
        if !keep(&args.family, &family_name) {
            continue;
        }
        for scheme in SCHEMES {
            if keep(&args.table, scheme) {
                report(scheme, &family_name, &family);
            }
        }
    }
    for (hash_name, hash) in fixed_hashes() {
        if !keep(&args.family, &hash_name) {
            continue;
        }
        for scheme in SINGLE_HASH_SCHEMES {
            if keep(&args.table, scheme) {
                report(scheme, &hash_name, &hash);
            }
        }
    }
}

/// Lookup streams for the tree experiment, each with the weight vector the
/// trees are built from. The zipf streams use their true distribution as
/// the weights; the rest are uniform.
fn access_patterns(rng: &mut StdRng) -> Vec<(String, Vec<f64>, Vec<Key>)> {
    let n = TREE_KEYS;
    let uniform_weights = vec![1.0; n];
    let mut patterns = Vec::new();

    let sequential: Vec<Key> = (0..TREE_LOOKUPS).map(|i| (i % n) as Key).collect();
    patterns.push(("sequential sweep".to_string(), uniform_weights.clone(), sequential));

    let reverse: Vec<Key> = (0..TREE_LOOKUPS).map(|i| (n - 1 - i % n) as Key).collect();
    patterns.push(("reverse sweep".to_string(), uniform_weights.clone(), reverse));

    let die = Uniform::from(0..n as Key);
    let uniform: Vec<Key> = (0..TREE_LOOKUPS).map(|_| die.sample(rng)).collect();
    patterns.push(("uniform random".to_string(), uniform_weights.clone(), uniform));

    // Bursts of locality: probe a random 64-key window 256 times, move on.
    let window = 64;
    let mut working_sets = Vec::with_capacity(TREE_LOOKUPS);
    while working_sets.len() < TREE_LOOKUPS {
        let base = rng.gen_range(0..n - window) as Key;
        for _ in 0..256 {
            working_sets.push(base + rng.gen_range(0..window as Key));
        }
    }
    working_sets.truncate(TREE_LOOKUPS);
    patterns.push(("working sets".to_string(), uniform_weights, working_sets));

    for z in ZIPF_EXPONENTS {
        // Zipf mass over a shuffled rank-to-key assignment, so key order
        // and popularity are uncorrelated.
        let mut weights: Vec<f64> = (0..n).map(|i| 1.0 / ((i + 1) as f64).powf(z)).collect();
        weights.shuffle(rng);
        let index = WeightedIndex::new(&weights).unwrap();
        let stream: Vec<Key> = (0..TREE_LOOKUPS).map(|_| index.sample(rng) as Key).collect();
        patterns.push((format!("zipf z={z}"), weights, stream));
    }
    patterns
}

fn run_trees(args: &Args) {
    println!();
    println!("trees: {TREE_KEYS} keys, {TREE_LOOKUPS} lookups per pattern");
    let mut rng = StdRng::seed_from_u64(args.seed.wrapping_add(3));
    for (pattern_name, weights, stream) in access_patterns(&mut rng) {
        // Histogram the stream as a sanity check on the generators: the
        // share of lookups landing in the low half of the key range.
        let mut histogram = FenwickTree::new(TREE_KEYS);
        for &key in &stream {
            histogram.increment(key as usize, 1);
        }
        let low_half =
            histogram.prefix_sum(TREE_KEYS / 2 - 1) as f64 / histogram.total().max(1) as f64;
        println!("  {pattern_name} ({:.1}% of lookups below key {})", low_half * 100.0, TREE_KEYS / 2);
        for (tree_name, tree) in trees(&weights).iter_mut() {
            let start = Instant::now();
            let mut hits = 0usize;
            for &key in &stream {
                hits += tree.contains(key) as usize;
            }
            let elapsed = start.elapsed();
            std::hint::black_box(hits);
            println!(
                "    {tree_name:16} {:>10.1} ns/lookup",
                elapsed.as_nanos() as f64 / stream.len() as f64
            );
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;
    let failures = run_correctness(&args);
    if !args.skip_timing {
        run_timing(&args);
    }
    if args.trees {
        run_trees(&args);
    }
    anyhow::ensure!(failures == 0, "{failures} correctness run(s) diverged");
    Ok(())
}
