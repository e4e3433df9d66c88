//! Hash families: distributions over functions from keys to `u64`.
//!
//! Tables never hash keys themselves. They sample functions from a
//! [`HashFamily`] at construction time, and cuckoo hashing samples again on
//! every rehash, so the unit the gym varies is the family rather than any
//! single function. A family owns its generator; two families built from
//! the same seed sample identical function sequences.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Key;

/// A sampled hash function. Output ranges over `u64`; tables reduce it
/// modulo their slot count.
pub type HashFn = Box<dyn Fn(Key) -> u64>;

/// The Mersenne prime 2^31 - 1. The polynomial and tabulation families
/// reduce into this field, so their outputs fit comfortably in 31 bits and
/// all intermediate products fit in a `u64`.
const FIELD_PRIME: u64 = (1 << 31) - 1;

/// A distribution over hash functions.
///
/// `get` samples a fresh function each call, independent of every earlier
/// sample. The fixed "families" in [`FixedHash`] break that rule on
/// purpose; see its docs for where they are usable.
pub trait HashFamily {
    fn get(&self) -> HashFn;

    /// Diagnostic label for reports and test output.
    fn name(&self) -> String;
}

/// k-independent hashing by random polynomials over the field mod
/// [`FIELD_PRIME`]: h(x) = c_{k-1} x^{k-1} + ... + c_1 x + c_0, with every
/// coefficient drawn uniformly per sampled function.
pub struct PolynomialFamily {
    k: usize,
    rng: RefCell<StdRng>,
}

impl PolynomialFamily {
    /// `k` is the independence level, which is also the coefficient count.
    pub fn new(k: usize, seed: u64) -> Self {
        assert!(k >= 1, "a polynomial hash needs at least one coefficient");
        PolynomialFamily {
            k,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl HashFamily for PolynomialFamily {
    fn get(&self) -> HashFn {
        let mut rng = self.rng.borrow_mut();
        let coefficients: Vec<u64> = (0..self.k).map(|_| rng.gen_range(0..FIELD_PRIME)).collect();
        Box::new(move |key| {
            let x = field_element(key);
            // Horner evaluation. Both operands of the multiply are below
            // 2^31, so nothing here can overflow a u64.
            coefficients
                .iter()
                .fold(0, |acc, &c| (acc * x + c) % FIELD_PRIME)
        })
    }

    fn name(&self) -> String {
        format!("{}-independent polynomial", self.k)
    }
}

/// Map a signed key into the field. `rem_euclid` keeps negative keys in
/// `0..FIELD_PRIME` instead of handing the polynomial a negative residue.
fn field_element(key: Key) -> u64 {
    (key as i64).rem_euclid(FIELD_PRIME as i64) as u64
}

/// Simple tabulation hashing: each of the key's four bytes indexes its own
/// table of 256 random values and the four lookups are XORed together.
/// Only 3-independent, but in practice it behaves like a far stronger
/// family, which is exactly the contrast the gym is after.
pub struct TabulationFamily {
    rng: RefCell<StdRng>,
}

impl TabulationFamily {
    pub fn new(seed: u64) -> Self {
        TabulationFamily {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl HashFamily for TabulationFamily {
    fn get(&self) -> HashFn {
        let mut rng = self.rng.borrow_mut();
        let mut tables = Box::new([[0u64; 256]; 4]);
        for table in tables.iter_mut() {
            for entry in table.iter_mut() {
                *entry = rng.gen();
            }
        }
        Box::new(move |key| {
            let bytes = (key as u32).to_le_bytes();
            let mixed = bytes
                .iter()
                .zip(tables.iter())
                .fold(0u64, |acc, (&byte, table)| acc ^ table[byte as usize]);
            mixed % FIELD_PRIME
        })
    }

    fn name(&self) -> String {
        "tabulation".to_string()
    }
}

/// A "family" of exactly one fixed function: every `get` returns the same
/// thing.
///
/// Usable only with tables that sample a single hash. Second-choice and
/// cuckoo hashing need independent pairs, and a pair drawn from a fixed
/// family is two copies of one function, which collapses both schemes.
pub struct FixedHash {
    label: &'static str,
    func: fn(Key) -> u64,
}

impl FixedHash {
    /// h(x) = x. Deliberately terrible on structured key sets; the classic
    /// way to force long probe runs.
    pub fn identity() -> Self {
        FixedHash {
            label: "identity",
            func: |key| key as u64,
        }
    }

    /// A fixed 32-bit avalanche mix (Jenkins-style shift-and-add rounds).
    /// One function, but with good empirical dispersion.
    pub fn mix32() -> Self {
        FixedHash {
            label: "mix32",
            func: mix32,
        }
    }
}

fn mix32(key: Key) -> u64 {
    let mut a = key as u32;
    a = a.wrapping_add(0x7ed55d16).wrapping_add(a << 12);
    a = (a ^ 0xc761c23c) ^ (a >> 19);
    a = a.wrapping_add(0x165667b1).wrapping_add(a << 5);
    a = a.wrapping_add(0xd3a2646c) ^ (a << 9);
    a = a.wrapping_add(0xfd7046c5).wrapping_add(a << 3);
    a = (a ^ 0xb55a4f09) ^ (a >> 16);
    a as u64
}

impl HashFamily for FixedHash {
    fn get(&self) -> HashFn {
        let func = self.func;
        Box::new(move |key| func(key))
    }

    fn name(&self) -> String {
        self.label.to_string()
    }
}

/// Every true family, keyed by its name in a stable order. Seeds are
/// derived from `seed`, so the whole registry is reproducible.
pub fn all_families(seed: u64) -> IndexMap<String, Rc<dyn HashFamily>> {
    let mut families: IndexMap<String, Rc<dyn HashFamily>> = IndexMap::new();
    for family in [
        Rc::new(PolynomialFamily::new(2, seed)) as Rc<dyn HashFamily>,
        Rc::new(PolynomialFamily::new(3, seed.wrapping_add(1))),
        Rc::new(PolynomialFamily::new(5, seed.wrapping_add(2))),
        Rc::new(TabulationFamily::new(seed.wrapping_add(3))),
    ] {
        families.insert(family.name(), family);
    }
    families
}

/// The fixed single-function hashes. Only meaningful for tables that
/// sample one function; see [`FixedHash`].
pub fn fixed_hashes() -> IndexMap<String, Rc<dyn HashFamily>> {
    let mut hashes: IndexMap<String, Rc<dyn HashFamily>> = IndexMap::new();
    for hash in [
        Rc::new(FixedHash::identity()) as Rc<dyn HashFamily>,
        Rc::new(FixedHash::mix32()),
    ] {
        hashes.insert(hash.name(), hash);
    }
    hashes
}

/// True families followed by the fixed hashes, for callers that want the
/// whole menu.
pub fn all_hashes(seed: u64) -> IndexMap<String, Rc<dyn HashFamily>> {
    let mut hashes = all_families(seed);
    hashes.extend(fixed_hashes());
    hashes
}
