//! Two-choice chaining: every key has two candidate buckets and joins the
//! emptier one.

use crate::hash::{HashFamily, HashFn};
use crate::table::Table;
use crate::Key;

/// Power-of-two-choices load balancing. Nothing bounds the worst chain,
/// but letting each insert compare two random buckets drops the expected
/// maximum load from O(log n / log log n) to O(log log n), and the gym
/// exists to make that difference visible next to [`ChainedTable`].
///
/// A key is only ever stored in one of its two buckets; both are checked
/// on lookup and removal.
pub struct SecondChoiceTable {
    first: HashFn,
    second: HashFn,
    buckets: Vec<Vec<Key>>,
    len: usize,
}

impl SecondChoiceTable {
    /// Samples two functions from `family`. The family must produce
    /// independent samples for the two-choice argument to hold; a fixed
    /// single-function family degenerates this into plain chaining.
    pub fn new(capacity: usize, family: &dyn HashFamily) -> Self {
        assert!(capacity > 0, "bucket count must be positive");
        SecondChoiceTable {
            first: family.get(),
            second: family.get(),
            buckets: vec![Vec::new(); capacity],
            len: 0,
        }
    }

    fn candidates(&self, key: Key) -> (usize, usize) {
        let buckets = self.buckets.len() as u64;
        (
            ((self.first)(key) % buckets) as usize,
            ((self.second)(key) % buckets) as usize,
        )
    }

    #[cfg(test)]
    fn chain_len(&self, bucket: usize) -> usize {
        self.buckets[bucket].len()
    }
}

impl Table for SecondChoiceTable {
    fn insert(&mut self, key: Key) {
        let (first, second) = self.candidates(key);
        if self.buckets[first].contains(&key) || self.buckets[second].contains(&key) {
            return;
        }
        // Ties go to the first candidate.
        let target = if self.buckets[first].len() <= self.buckets[second].len() {
            first
        } else {
            second
        };
        self.buckets[target].push(key);
        self.len += 1;
    }

    fn contains(&self, key: Key) -> bool {
        let (first, second) = self.candidates(key);
        self.buckets[first].contains(&key) || self.buckets[second].contains(&key)
    }

    fn remove(&mut self, key: Key) {
        let (first, second) = self.candidates(key);
        // At most one bucket holds the key, so stop at the first hit.
        for bucket in [first, second] {
            if let Some(at) = self.buckets[bucket].iter().position(|&k| k == key) {
                self.buckets[bucket].swap_remove(at);
                self.len -= 1;
                return;
            }
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}
