//! Separate chaining: one growable bucket per hash value.

use crate::hash::{HashFamily, HashFn};
use crate::table::Table;
use crate::Key;

/// The baseline scheme. A collision costs a chain scan and nothing else,
/// and the table never fills up, only slows down, which is why the
/// timing sweeps can push it past load factor 1.
pub struct ChainedTable {
    hash: HashFn,
    buckets: Vec<Vec<Key>>,
    len: usize,
}

impl ChainedTable {
    pub fn new(capacity: usize, family: &dyn HashFamily) -> Self {
        assert!(capacity > 0, "bucket count must be positive");
        ChainedTable {
            hash: family.get(),
            buckets: vec![Vec::new(); capacity],
            len: 0,
        }
    }

    fn bucket_of(&self, key: Key) -> usize {
        ((self.hash)(key) % self.buckets.len() as u64) as usize
    }

    #[cfg(test)]
    fn chain_len(&self, bucket: usize) -> usize {
        self.buckets[bucket].len()
    }
}

impl Table for ChainedTable {
    fn insert(&mut self, key: Key) {
        let bucket = self.bucket_of(key);
        let chain = &mut self.buckets[bucket];
        if !chain.contains(&key) {
            chain.push(key);
            self.len += 1;
        }
    }

    fn contains(&self, key: Key) -> bool {
        self.buckets[self.bucket_of(key)].contains(&key)
    }

    fn remove(&mut self, key: Key) {
        let bucket = self.bucket_of(key);
        let chain = &mut self.buckets[bucket];
        if let Some(at) = chain.iter().position(|&k| k == key) {
            chain.swap_remove(at);
            self.len -= 1;
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}
