//! Splay tree with top-down splaying.
//!
//! The build ignores the weights entirely: splaying adapts to whatever
//! access pattern actually arrives, and the experiment is whether that
//! online adaptation can match a tree shaped offline from the true
//! distribution.

use crate::tree::{StaticTree, NIL};
use crate::Key;

struct Node {
    key: Key,
    left: usize,
    right: usize,
}

/// Index 0 is a scratch node that anchors the two assembly trees during a
/// splay; real nodes start at 1.
const SCRATCH: usize = 0;

pub struct SplayTree {
    nodes: Vec<Node>,
    root: usize,
}

impl SplayTree {
    pub fn new(weights: &[f64]) -> Self {
        let mut tree = SplayTree {
            nodes: Vec::with_capacity(weights.len() + 1),
            root: NIL,
        };
        tree.nodes.push(Node {
            key: 0,
            left: NIL,
            right: NIL,
        });
        // Start perfectly balanced; any shape is legal, this one keeps the
        // cold start fair against the other trees.
        tree.root = tree.build(0, weights.len() as Key);
        tree
    }

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

    /// Top-down splay: walk toward `key`, hanging over-rotated fringes off
    /// the scratch node's two sides, then reassemble under the last node
    /// reached. That node becomes the root: `key` itself if present,
    /// otherwise a neighbor in key order.
    fn splay(&mut self, key: Key) {
        if self.root == NIL {
            return;
        }
        self.nodes[SCRATCH].left = NIL;
        self.nodes[SCRATCH].right = NIL;
        let mut current = self.root;
        let mut left_tail = SCRATCH; // rightmost node of the left assembly
        let mut right_tail = SCRATCH; // leftmost node of the right assembly
        loop {
            if key < self.nodes[current].key {
                let mut child = self.nodes[current].left;
                if child == NIL {
                    break;
                }
                if key < self.nodes[child].key {
                    // Zig-zig: rotate right before linking.
                    self.nodes[current].left = self.nodes[child].right;
                    self.nodes[child].right = current;
                    current = child;
                    child = self.nodes[current].left;
                    if child == NIL {
                        break;
                    }
                }
                self.nodes[right_tail].left = current;
                right_tail = current;
                current = child;
            } else if key > self.nodes[current].key {
                let mut child = self.nodes[current].right;
                if child == NIL {
                    break;
                }
                if key > self.nodes[child].key {
                    self.nodes[current].right = self.nodes[child].left;
                    self.nodes[child].left = current;
                    current = child;
                    child = self.nodes[current].right;
                    if child == NIL {
                        break;
                    }
                }
                self.nodes[left_tail].right = current;
                left_tail = current;
                current = child;
            } else {
                break;
            }
        }
        self.nodes[left_tail].right = self.nodes[current].left;
        self.nodes[right_tail].left = self.nodes[current].right;
        self.nodes[current].left = self.nodes[SCRATCH].right;
        self.nodes[current].right = self.nodes[SCRATCH].left;
        self.root = current;
    }
}

impl StaticTree for SplayTree {
    fn contains(&mut self, key: Key) -> bool {
        if self.root == NIL {
            return false;
        }
        self.splay(key);
        self.nodes[self.root].key == key
    }
}
