//! Robin Hood hashing with backward-shift deletion.
//!
//! Linear probing, but on a collision the slot goes to whichever key has
//! probed further from home: a "rich" resident (close to home) surrenders
//! its slot to a "poor" arrival and continues down the run itself. Probe
//! lengths stay tightly clustered, and every run is sorted by probe
//! distance, which gives lookups an early exit. Removal shifts the tail of
//! the run back one slot instead of planting a tombstone, so this table
//! never accumulates deletion debris.

use crate::hash::{HashFamily, HashFn};
use crate::table::Table;
use crate::Key;

#[derive(Clone, Copy)]
struct Resident {
    key: Key,
    home: usize,
}

pub struct RobinHoodTable {
    hash: HashFn,
    slots: Vec<Option<Resident>>,
    len: usize,
}

impl RobinHoodTable {
    pub fn new(capacity: usize, family: &dyn HashFamily) -> Self {
        assert!(capacity > 0, "slot count must be positive");
        RobinHoodTable {
            hash: family.get(),
            slots: vec![None; capacity],
            len: 0,
        }
    }

    fn home_of(&self, key: Key) -> usize {
        ((self.hash)(key) % self.slots.len() as u64) as usize
    }

    /// Probe distance of a key homed at `home` when sitting at `index`.
    fn distance(&self, index: usize, home: usize) -> usize {
        (index + self.slots.len() - home) % self.slots.len()
    }
}

impl Table for RobinHoodTable {
    fn insert(&mut self, key: Key) {
        let capacity = self.slots.len();
        let mut incoming = Resident {
            key,
            home: self.home_of(key),
        };
        let mut index = incoming.home;
        let mut distance = 0;
        for _ in 0..capacity {
            match self.slots[index] {
                None => {
                    self.slots[index] = Some(incoming);
                    self.len += 1;
                    return;
                }
                Some(resident) => {
                    if resident.key == incoming.key {
                        return;
                    }
                    let resident_distance = self.distance(index, resident.home);
                    if resident_distance < distance {
                        // The arrival has probed further: it takes the slot
                        // and the displaced resident carries on down the
                        // run from here.
                        self.slots[index] = Some(incoming);
                        incoming = resident;
                        distance = resident_distance;
                    }
                }
            }
            index = (index + 1) % capacity;
            distance += 1;
        }
        panic!("robin hood table is full (capacity {capacity})");
    }

    fn contains(&self, key: Key) -> bool {
        let capacity = self.slots.len();
        let mut index = self.home_of(key);
        let mut distance = 0;
        for _ in 0..capacity {
            match self.slots[index] {
                None => return false,
                Some(resident) => {
                    if resident.key == key {
                        return true;
                    }
                    if self.distance(index, resident.home) < distance {
                        // A resident closer to home than our probe is so
                        // far would have been displaced if the key were in
                        // this run. The key is absent.
                        return false;
                    }
                }
            }
            index = (index + 1) % capacity;
            distance += 1;
        }
        false
    }

    fn remove(&mut self, key: Key) {
        let capacity = self.slots.len();
        let mut index = self.home_of(key);
        let mut distance = 0;
        let mut found = None;
        for _ in 0..capacity {
            match self.slots[index] {
                None => return,
                Some(resident) => {
                    if resident.key == key {
                        found = Some(index);
                        break;
                    }
                    if self.distance(index, resident.home) < distance {
                        return;
                    }
                }
            }
            index = (index + 1) % capacity;
            distance += 1;
        }
        let Some(mut hole) = found else { return };
        self.len -= 1;
        // Shift the rest of the run back one slot. The run ends at an
        // empty slot or at a key sitting at its home, which must not move.
        for _ in 0..capacity {
            let next = (hole + 1) % capacity;
            match self.slots[next] {
                None => break,
                Some(resident) if self.distance(next, resident.home) == 0 => break,
                Some(resident) => {
                    self.slots[hole] = Some(resident);
                    hole = next;
                }
            }
        }
        self.slots[hole] = None;
    }

    fn len(&self) -> usize {
        self.len
    }
}
