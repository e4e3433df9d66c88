//! Linear probing with tombstone deletion.
//!
//! A key's probe sequence starts at its home slot and walks forward,
//! wrapping at the end of the array. Removal plants a tombstone instead of
//! compacting the run, so later lookups keep probing across the gap; only
//! a genuinely empty slot ends a probe. Tombstones are never reclaimed in
//! bulk: a table that has seen heavy churn probes long even when nearly
//! empty, and the timing sweeps are meant to show exactly that.

use crate::hash::{HashFamily, HashFn};
use crate::table::Table;
use crate::Key;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Slot {
    Empty,
    Tombstone,
    Occupied(Key),
}

pub struct LinearProbingTable {
    hash: HashFn,
    slots: Vec<Slot>,
    len: usize,
}

impl LinearProbingTable {
    pub fn new(capacity: usize, family: &dyn HashFamily) -> Self {
        assert!(capacity > 0, "slot count must be positive");
        LinearProbingTable {
            hash: family.get(),
            slots: vec![Slot::Empty; capacity],
            len: 0,
        }
    }

    fn home_of(&self, key: Key) -> usize {
        ((self.hash)(key) % self.slots.len() as u64) as usize
    }

    #[cfg(test)]
    fn tombstones(&self) -> usize {
        self.slots.iter().filter(|&&slot| slot == Slot::Tombstone).count()
    }
}

impl Table for LinearProbingTable {
    fn insert(&mut self, key: Key) {
        let capacity = self.slots.len();
        let mut index = self.home_of(key);
        // A tombstone can hold the new key, but only once the whole probe
        // run has shown the key absent: the key may be resident past it,
        // and filling early would duplicate it.
        let mut reusable = None;
        for _ in 0..capacity {
            match self.slots[index] {
                Slot::Occupied(resident) if resident == key => return,
                Slot::Occupied(_) => {}
                Slot::Tombstone => {
                    if reusable.is_none() {
                        reusable = Some(index);
                    }
                }
                Slot::Empty => {
                    self.slots[reusable.unwrap_or(index)] = Slot::Occupied(key);
                    self.len += 1;
                    return;
                }
            }
            index = (index + 1) % capacity;
        }
        // No empty slot anywhere. A remembered tombstone still takes the
        // key; with none, the caller has overfilled the table.
        match reusable {
            Some(slot) => {
                self.slots[slot] = Slot::Occupied(key);
                self.len += 1;
            }
            None => panic!("linear probing table is full (capacity {capacity})"),
        }
    }

    fn contains(&self, key: Key) -> bool {
        let capacity = self.slots.len();
        let mut index = self.home_of(key);
        for _ in 0..capacity {
            match self.slots[index] {
                Slot::Occupied(resident) if resident == key => return true,
                Slot::Empty => return false,
                _ => {}
            }
            index = (index + 1) % capacity;
        }
        false
    }

    fn remove(&mut self, key: Key) {
        let capacity = self.slots.len();
        let mut index = self.home_of(key);
        for _ in 0..capacity {
            match self.slots[index] {
                Slot::Occupied(resident) if resident == key => {
                    self.slots[index] = Slot::Tombstone;
                    self.len -= 1;
                    return;
                }
                Slot::Empty => return,
                _ => {}
            }
            index = (index + 1) % capacity;
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::FixedHash;

    #[test]
    fn removal_leaves_a_tombstone() {
        let identity = FixedHash::identity();
        let mut table = LinearProbingTable::new(8, &identity);
        table.insert(1);
        table.remove(1);
        assert_eq!(table.tombstones(), 1);
        assert!(!table.contains(1));
        assert!(table.is_empty());
    }

    #[test]
    fn probes_continue_past_tombstones() {
        let identity = FixedHash::identity();
        let mut table = LinearProbingTable::new(12, &identity);
        // 5 sits at home; 17 homes to 5 as well and probes into slot 6.
        table.insert(5);
        table.insert(17);
        table.remove(5);
        assert!(table.contains(17));
        assert!(!table.contains(5));
    }

    #[test]
    fn insert_reuses_the_earliest_tombstone() {
        let identity = FixedHash::identity();
        let mut table = LinearProbingTable::new(12, &identity);
        for key in [3, 15, 27] {
            table.insert(key);
        }
        table.remove(15);
        assert_eq!(table.tombstones(), 1);
        // 39 homes to 3: the run is [3, †, 27], so 39 fills the hole.
        table.insert(39);
        assert_eq!(table.tombstones(), 0);
        for key in [3, 27, 39] {
            assert!(table.contains(key));
        }
    }

    #[test]
    fn reinserting_a_key_past_a_tombstone_does_not_duplicate_it() {
        let identity = FixedHash::identity();
        let mut table = LinearProbingTable::new(12, &identity);
        for key in [3, 15, 27] {
            table.insert(key);
        }
        table.remove(3);
        // 27 still lives two slots past the tombstone; reinserting it must
        // find that copy rather than grab the hole.
        table.insert(27);
        assert_eq!(table.len(), 2);
        table.remove(27);
        assert!(!table.contains(27));
    }

    #[test]
    fn probe_wraps_around_the_end_of_the_array() {
        let identity = FixedHash::identity();
        let mut table = LinearProbingTable::new(4, &identity);
        table.insert(3);
        table.insert(7);
        assert!(table.contains(7));
        table.remove(3);
        assert!(table.contains(7));
    }

    #[test]
    fn lookups_terminate_in_a_tombstone_saturated_table() {
        let identity = FixedHash::identity();
        let mut table = LinearProbingTable::new(4, &identity);
        for key in 0..4 {
            table.insert(key);
        }
        for key in 0..4 {
            table.remove(key);
        }
        assert_eq!(table.tombstones(), 4);
        assert!(!table.contains(9));
        table.insert(9);
        assert!(table.contains(9));
        assert_eq!(table.len(), 1);
    }

    #[test]
    #[should_panic(expected = "full")]
    fn overfilling_panics() {
        let identity = FixedHash::identity();
        let mut table = LinearProbingTable::new(2, &identity);
        table.insert(0);
        table.insert(1);
        table.insert(2);
    }
}
