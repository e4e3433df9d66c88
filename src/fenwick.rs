//! Fenwick tree: prefix sums over a fixed-size histogram in O(log n) per
//! update and query.
//!
//! The gym uses one to histogram generated access streams, but the
//! structure is generic: `increment` adjusts one counter, `prefix_sum`
//! folds everything up to an index. Counters are `i64`, so decrements and
//! mixed-sign bookkeeping are fine.

pub struct FenwickTree {
    // One-based low-bit tree; sums[0] stays zero and unused. Each node
    // covers the lowbit(i) counters ending at i.
    sums: Vec<i64>,
}

impl FenwickTree {
    /// A histogram of `len` zeroed counters.
    pub fn new(len: usize) -> Self {
        FenwickTree { sums: vec![0; len + 1] }
    }

    pub fn len(&self) -> usize {
        self.sums.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add `amount` (possibly negative) to the counter at `index`.
    pub fn increment(&mut self, index: usize, amount: i64) {
        assert!(
            index < self.len(),
            "index {index} out of bounds for length {}",
            self.len()
        );
        let mut node = index + 1;
        while node < self.sums.len() {
            self.sums[node] += amount;
            node += node & node.wrapping_neg();
        }
    }

    /// Sum of the counters at `0..=index`.
    pub fn prefix_sum(&self, index: usize) -> i64 {
        assert!(
            index < self.len(),
            "index {index} out of bounds for length {}",
            self.len()
        );
        let mut node = index + 1;
        let mut total = 0;
        while node > 0 {
            total += self.sums[node];
            node -= node & node.wrapping_neg();
        }
        total
    }

    /// Sum of every counter.
    pub fn total(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.prefix_sum(self.len() - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn prefix_sums_accumulate() {
        let mut tree = FenwickTree::new(10);
        tree.increment(0, 3);
        tree.increment(4, 5);
        tree.increment(9, 1);
        assert_eq!(tree.prefix_sum(0), 3);
        assert_eq!(tree.prefix_sum(3), 3);
        assert_eq!(tree.prefix_sum(4), 8);
        assert_eq!(tree.prefix_sum(9), 9);
        assert_eq!(tree.total(), 9);
    }

    #[test]
    fn negative_amounts_decrement() {
        let mut tree = FenwickTree::new(4);
        tree.increment(2, 10);
        tree.increment(2, -4);
        assert_eq!(tree.prefix_sum(2), 6);
        assert_eq!(tree.prefix_sum(1), 0);
    }

    #[test]
    fn matches_a_plain_histogram() {
        let mut rng = StdRng::seed_from_u64(19);
        let mut tree = FenwickTree::new(64);
        let mut plain = [0i64; 64];
        for _ in 0..10_000 {
            let index = rng.gen_range(0..64);
            let amount = rng.gen_range(-50..=50);
            tree.increment(index, amount);
            plain[index] += amount;
            let probe = rng.gen_range(0..64);
            let expected: i64 = plain[..=probe].iter().sum();
            assert_eq!(tree.prefix_sum(probe), expected);
        }
    }

    #[test]
    fn zero_length_tree_sums_to_zero() {
        let tree = FenwickTree::new(0);
        assert!(tree.is_empty());
        assert_eq!(tree.total(), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn increment_past_the_end_panics() {
        FenwickTree::new(3).increment(3, 1);
    }
}
