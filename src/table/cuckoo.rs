//! Cuckoo hashing: two sub-tables, one hash each, eviction on collision.
//!
//! A key lives in exactly one of two candidate slots, one per side, so a
//! lookup probes at most twice. Insertion may evict a resident, which
//! re-homes on the other side, possibly evicting again. Each eviction
//! bumps a counter carried with the displaced entry; a chain whose counter
//! passes the `4 * ceil(log2(n))` bound almost certainly means the current
//! pair of functions has driven the key set into a cycle, so the table
//! samples a fresh pair from its family and rebuilds from scratch,
//! retrying with further pairs until a pass settles every key. The table
//! therefore keeps its family for life, not just two sampled functions.

use std::rc::Rc;

use crate::hash::{HashFamily, HashFn};
use crate::table::Table;
use crate::Key;

#[derive(Clone, Copy)]
struct Entry {
    key: Key,
    kicks: u32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub struct CuckooTable {
    family: Rc<dyn HashFamily>,
    left_hash: HashFn,
    right_hash: HashFn,
    left: Vec<Option<Entry>>,
    right: Vec<Option<Entry>>,
    start_left: bool,
    len: usize,
    rehashes: usize,
}

impl CuckooTable {
    /// `capacity` counts total slots; each side gets half, rounded up.
    pub fn new(capacity: usize, family: Rc<dyn HashFamily>) -> Self {
        assert!(capacity > 0, "slot count must be positive");
        let side = (capacity + 1) / 2;
        let left_hash = family.get();
        let right_hash = family.get();
        CuckooTable {
            family,
            left_hash,
            right_hash,
            left: vec![None; side],
            right: vec![None; side],
            start_left: false,
            len: 0,
            rehashes: 0,
        }
    }

    /// How many full rebuilds this table has performed.
    pub fn rehashes(&self) -> usize {
        self.rehashes
    }

    fn index_on(&self, side: Side, key: Key) -> usize {
        let hash = match side {
            Side::Left => (self.left_hash)(key),
            Side::Right => (self.right_hash)(key),
        };
        (hash % self.left.len() as u64) as usize
    }

    /// Eviction chains longer than this are treated as evidence of a
    /// cycle. A random cuckoo graph below the load threshold keeps its
    /// insertion paths within O(log n), so the constant 4 makes false
    /// alarms rare without letting a real cycle spin for long.
    fn kick_limit(&self) -> u32 {
        let n = self.len.max(2) as u64;
        4 * (64 - (n - 1).leading_zeros())
    }

    /// Place `entry` starting on `side`, evicting residents as needed.
    /// Returns the entry left in hand if its counter passes the limit,
    /// which is the signal to rehash.
    fn place(&mut self, mut entry: Entry, mut side: Side) -> Result<(), Entry> {
        loop {
            if entry.kicks > self.kick_limit() {
                return Err(entry);
            }
            let index = self.index_on(side, entry.key);
            let slot = match side {
                Side::Left => &mut self.left[index],
                Side::Right => &mut self.right[index],
            };
            match slot.take() {
                None => {
                    *slot = Some(entry);
                    return Ok(());
                }
                Some(mut resident) => {
                    *slot = Some(entry);
                    resident.kicks += 1;
                    entry = resident;
                    side = side.other();
                }
            }
        }
    }

    /// Sample a fresh function pair and rebuild both sides from scratch,
    /// drawing again whenever a pair fails to settle the current keys.
    /// `pending` is the entry the failed chain left in hand.
    fn rehash(&mut self, pending: Entry) {
        let mut keys: Vec<Key> = Vec::with_capacity(self.len);
        keys.push(pending.key);
        for slot in self.left.iter().chain(self.right.iter()) {
            if let Some(entry) = slot {
                keys.push(entry.key);
            }
        }
        debug_assert_eq!(keys.len(), self.len);
        assert!(
            keys.len() <= self.left.len() + self.right.len(),
            "cuckoo table is full ({} keys in {} slots)",
            keys.len(),
            self.left.len() + self.right.len()
        );
        'attempt: loop {
            self.rehashes += 1;
            log::debug!("cuckoo rehash #{} over {} keys", self.rehashes, keys.len());
            self.left_hash = self.family.get();
            self.right_hash = self.family.get();
            self.left.fill(None);
            self.right.fill(None);
            let mut side = Side::Left;
            for &key in &keys {
                if self.place(Entry { key, kicks: 0 }, side).is_err() {
                    continue 'attempt;
                }
                side = side.other();
            }
            return;
        }
    }
}

impl Table for CuckooTable {
    fn insert(&mut self, key: Key) {
        if self.contains(key) {
            return;
        }
        // Alternate the starting side between top-level inserts; within a
        // chain, every eviction already flips sides.
        self.start_left = !self.start_left;
        let side = if self.start_left { Side::Left } else { Side::Right };
        self.len += 1;
        if let Err(stuck) = self.place(Entry { key, kicks: 0 }, side) {
            self.rehash(stuck);
        }
    }

    fn contains(&self, key: Key) -> bool {
        let left = self.index_on(Side::Left, key);
        if matches!(self.left[left], Some(entry) if entry.key == key) {
            return true;
        }
        let right = self.index_on(Side::Right, key);
        matches!(self.right[right], Some(entry) if entry.key == key)
    }

    fn remove(&mut self, key: Key) {
        let left = self.index_on(Side::Left, key);
        if matches!(self.left[left], Some(entry) if entry.key == key) {
            self.left[left] = None;
            self.len -= 1;
            return;
        }
        let right = self.index_on(Side::Right, key);
        if matches!(self.right[right], Some(entry) if entry.key == key) {
            self.right[right] = None;
            self.len -= 1;
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::hash::PolynomialFamily;

    impl CuckooTable {
        /// Every resident must sit exactly where its side's current hash
        /// says. Catches stale placements after a rehash.
        fn check_residency(&self) {
            for (index, slot) in self.left.iter().enumerate() {
                if let Some(entry) = slot {
                    assert_eq!(self.index_on(Side::Left, entry.key), index);
                }
            }
            for (index, slot) in self.right.iter().enumerate() {
                if let Some(entry) = slot {
                    assert_eq!(self.index_on(Side::Right, entry.key), index);
                }
            }
        }
    }

    /// Rigged family: the first pair of functions sends every key to slot
    /// 0 on both sides, forcing a cycle on the third insert. Later samples
    /// are shifted identities, which settle immediately.
    struct RiggedFamily {
        calls: Cell<u64>,
    }

    impl RiggedFamily {
        fn new() -> Self {
            RiggedFamily { calls: Cell::new(0) }
        }
    }

    impl HashFamily for RiggedFamily {
        fn get(&self) -> HashFn {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if call < 2 {
                Box::new(|_| 0)
            } else {
                Box::new(move |key| (key as u64).wrapping_add(call))
            }
        }

        fn name(&self) -> String {
            "rigged".to_string()
        }
    }

    #[test]
    fn cycle_triggers_a_rehash_that_keeps_every_key() {
        let mut table = CuckooTable::new(16, Rc::new(RiggedFamily::new()));
        for key in [1, 2, 3] {
            table.insert(key);
        }
        assert!(table.rehashes() >= 1);
        assert_eq!(table.len(), 3);
        for key in [1, 2, 3] {
            assert!(table.contains(key));
        }
        table.check_residency();
    }

    #[test]
    fn lookups_touch_at_most_two_slots() {
        let family: Rc<dyn HashFamily> = Rc::new(PolynomialFamily::new(2, 21));
        let mut table = CuckooTable::new(64, Rc::clone(&family));
        for key in 0..24 {
            table.insert(key);
        }
        table.check_residency();
        assert!((0..24).all(|key| table.contains(key)));
        assert!(!table.contains(99));
    }

    #[test]
    fn eviction_chains_relocate_but_never_lose_keys() {
        let family: Rc<dyn HashFamily> = Rc::new(PolynomialFamily::new(3, 2));
        let mut table = CuckooTable::new(100, Rc::clone(&family));
        let mut rng = StdRng::seed_from_u64(7);
        let mut present = Vec::new();
        // Load factor ~0.45, churned; every key stays reachable whether or
        // not the run happened to rehash.
        for _ in 0..5_000 {
            let key = rng.gen_range(0..60);
            if rng.gen_bool(0.7) && !present.contains(&key) && present.len() < 45 {
                table.insert(key);
                present.push(key);
            } else if let Some(at) = present.iter().position(|&k| k == key) {
                table.remove(key);
                present.swap_remove(at);
            }
            assert_eq!(table.len(), present.len());
        }
        table.check_residency();
        for &key in &present {
            assert!(table.contains(key));
        }
    }

    #[test]
    fn duplicate_insert_does_not_grow_or_relocate() {
        let family: Rc<dyn HashFamily> = Rc::new(PolynomialFamily::new(2, 3));
        let mut table = CuckooTable::new(8, Rc::clone(&family));
        table.insert(5);
        let before = table.rehashes();
        for _ in 0..10 {
            table.insert(5);
        }
        assert_eq!(table.len(), 1);
        assert_eq!(table.rehashes(), before);
    }

    #[test]
    #[should_panic(expected = "full")]
    fn overfilling_panics_instead_of_spinning() {
        let mut table = CuckooTable::new(2, Rc::new(PolynomialFamily::new(2, 4)));
        for key in 0..3 {
            table.insert(key);
        }
    }
}
