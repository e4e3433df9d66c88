//! Midpoint-split tree: the control subject that ignores the weights.

use crate::tree::{StaticTree, NIL};
use crate::Key;

struct Node {
    key: Key,
    left: usize,
    right: usize,
}

pub struct PerfectlyBalancedTree {
    nodes: Vec<Node>,
    root: usize,
}

impl PerfectlyBalancedTree {
    /// The weights only fix the key count; a perfectly balanced tree has
    /// no use for access frequencies.
    pub fn new(weights: &[f64]) -> Self {
        let mut tree = PerfectlyBalancedTree {
            nodes: Vec::with_capacity(weights.len()),
            root: NIL,
        };
        tree.root = tree.build(0, weights.len() as Key);
        tree
    }

    // Recursion depth is log of the range, so the stack is safe even for
    // large key sets.
    fn build(&mut self, lo: Key, hi: Key) -> usize {
        if lo >= hi {
            return NIL;
        }
        let mid = lo + (hi - lo) / 2;
        let left = self.build(lo, mid);
        let right = self.build(mid + 1, hi);
        let index = self.nodes.len();
        self.nodes.push(Node { key: mid, left, right });
        index
    }
}

impl StaticTree for PerfectlyBalancedTree {
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
