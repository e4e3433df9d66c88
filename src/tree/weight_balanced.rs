//! Weight-balanced tree: every range is rooted where the weight split is
//! most even.
//!
//! With the true access distribution as weights, this is a 2-approximation
//! of the optimal static tree at a fraction of the construction cost: the
//! split point per range comes from a binary search over prefix sums, so
//! the whole build is O(n log n).

use ordered_float::NotNan;

use crate::tree::{StaticTree, NIL};
use crate::Key;

struct Node {
    key: Key,
    left: usize,
    right: usize,
}

pub struct WeightBalancedTree {
    nodes: Vec<Node>,
    root: usize,
}

impl WeightBalancedTree {
    /// Weights must be non-negative and free of NaN; violating either is a
    /// caller bug and panics.
    pub fn new(weights: &[f64]) -> Self {
        let mut prefix = Vec::with_capacity(weights.len() + 1);
        let mut total = NotNan::new(0.0).unwrap();
        prefix.push(total);
        for &weight in weights {
            let weight = NotNan::new(weight).expect("access weights must not be NaN");
            assert!(
                weight.into_inner() >= 0.0,
                "access weights must be non-negative"
            );
            total += weight;
            prefix.push(total);
        }

        let mut tree = WeightBalancedTree {
            nodes: Vec::with_capacity(weights.len()),
            root: NIL,
        };
        // Explicit work list: heavily skewed weights legally produce a
        // linear-depth tree, which would blow the stack if built by
        // recursion.
        let mut ranges = vec![(0 as Key, weights.len() as Key, NIL, false)];
        while let Some((lo, hi, parent, is_left)) = ranges.pop() {
            if lo >= hi {
                continue;
            }
            let split = best_split(&prefix, lo, hi);
            let index = tree.nodes.len();
            tree.nodes.push(Node {
                key: split,
                left: NIL,
                right: NIL,
            });
            if parent == NIL {
                tree.root = index;
            } else if is_left {
                tree.nodes[parent].left = index;
            } else {
                tree.nodes[parent].right = index;
            }
            ranges.push((lo, split, index, true));
            ranges.push((split + 1, hi, index, false));
        }
        tree
    }
}

/// The key in `lo..hi` whose left/right subtree weights differ the least.
///
/// imbalance(s) = weight(lo..s) - weight(s+1..hi) only grows with `s`, so
/// the minimizer in absolute value sits at the sign crossing: binary
/// search for the first non-negative point, then compare with its left
/// neighbor.
fn best_split(prefix: &[NotNan<f64>], lo: Key, hi: Key) -> Key {
    let (lo, hi) = (lo as usize, hi as usize);
    let imbalance = |s: usize| {
        let left = prefix[s] - prefix[lo];
        let right = prefix[hi] - prefix[s + 1];
        (left - right).into_inner()
    };
    let (mut low, mut high) = (lo, hi - 1);
    while low < high {
        let mid = low + (high - low) / 2;
        if imbalance(mid) < 0.0 {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    if low > lo && imbalance(low - 1).abs() <= imbalance(low).abs() {
        low -= 1;
    }
    low as Key
}

impl StaticTree for WeightBalancedTree {
    fn contains(&mut self, key: Key) -> bool {
        let mut node = self.root;
        while node != NIL {
            let current = &self.nodes[node];
            if key == current.key {
                return true;
            }
            node = if key < current.key {
                current.left
            } else {
                current.right
            };
        }
        false
    }
}
