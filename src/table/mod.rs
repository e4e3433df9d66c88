//! Fixed-capacity integer sets, one per collision-resolution scheme.
//!
//! Construction fixes the slot count for the table's lifetime. Nothing
//! here resizes under load: the chained variants degrade gracefully past
//! their nominal capacity, the open-addressing variants treat overfilling
//! as a caller bug, and cuckoo rehashing replaces hash functions, never
//! capacity. That is the design point of the gym: load factor is an
//! input, not something the table manages away.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::hash::HashFamily;
use crate::Key;

pub mod chained;
pub mod cuckoo;
pub mod linear_probing;
pub mod robin_hood;
pub mod second_choice;


pub use chained::ChainedTable;
pub use cuckoo::CuckooTable;
pub use linear_probing::LinearProbingTable;
pub use robin_hood::RobinHoodTable;
pub use second_choice::SecondChoiceTable;

/// The membership contract every scheme implements.
///
/// All operations run to completion on the caller's thread. Inserting a
/// present key and removing an absent key are no-ops, so the interface has
/// no failure mode of its own; the one hard precondition is that the
/// open-addressing tables must never be asked to hold more keys than
/// slots, which panics rather than degrades.
pub trait Table {
    /// Add `key` to the set. Idempotent.
    fn insert(&mut self, key: Key);

    /// Whether `key` is currently in the set.
    fn contains(&self, key: Key) -> bool;

    /// Drop `key` from the set. Idempotent.
    fn remove(&mut self, key: Key);

    /// Number of keys currently in the set.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn boxed(self) -> Box<dyn Table>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// All five schemes over the same family, keyed by scheme name in a
/// stable order.
///
/// `family` should be a true family: second-choice and cuckoo hashing
/// sample two functions each, and a fixed single-function family gives
/// them an identical pair. Use [`single_hash_tables`] for the fixed
/// hashes.
pub fn tables(
    capacity: usize,
    family: &Rc<dyn HashFamily>,
) -> IndexMap<&'static str, Box<dyn Table>> {
    let mut map: IndexMap<&'static str, Box<dyn Table>> = IndexMap::new();
    map.insert("chained", ChainedTable::new(capacity, family.as_ref()).boxed());
    map.insert(
        "linear-probing",
        LinearProbingTable::new(capacity, family.as_ref()).boxed(),
    );
    map.insert(
        "robin-hood",
        RobinHoodTable::new(capacity, family.as_ref()).boxed(),
    );
    map.insert(
        "second-choice",
        SecondChoiceTable::new(capacity, family.as_ref()).boxed(),
    );
    map.insert("cuckoo", CuckooTable::new(capacity, Rc::clone(family)).boxed());
    map
}

/// The schemes that sample exactly one hash function, and so run
/// meaningfully under the fixed hashes as well as under true families.
pub fn single_hash_tables(
    capacity: usize,
    family: &dyn HashFamily,
) -> IndexMap<&'static str, Box<dyn Table>> {
    let mut map: IndexMap<&'static str, Box<dyn Table>> = IndexMap::new();
    map.insert("chained", ChainedTable::new(capacity, family).boxed());
    map.insert(
        "linear-probing",
        LinearProbingTable::new(capacity, family).boxed(),
    );
    map.insert("robin-hood", RobinHoodTable::new(capacity, family).boxed());
    map
}
