//! Static binary search trees over the keys `0..n`, built once from a
//! vector of access weights.
//!
//! The trees exist for one experiment: given the distribution the lookups
//! will actually follow, how much does it help to shape the tree for it
//! up front (weight balancing), to ignore it (perfect balancing), or to
//! adapt online instead (splaying)? The key set is always `0..n` where
//! `n = weights.len()`, so membership itself is trivial; the interesting
//! output is the lookup timing in the gym binary.
//!
//! Nodes live in a flat arena indexed by `usize`, with [`NIL`] as the null
//! pointer. Trees are built once and never change shape afterwards, splay
//! rotations aside.

use indexmap::IndexMap;

use crate::Key;

pub mod perfectly_balanced;
pub mod splay;
pub mod weight_balanced;


pub use perfectly_balanced::PerfectlyBalancedTree;
pub use splay::SplayTree;
pub use weight_balanced::WeightBalancedTree;

/// Null arena index.
pub(crate) const NIL: usize = usize::MAX;

/// Lookup-only membership over a fixed key set. `contains` takes `&mut
/// self` because the splay tree restructures itself on every probe.
pub trait StaticTree {
    fn contains(&mut self, key: Key) -> bool;
}

/// All three trees built from the same weights, keyed by name in a stable
/// order.
pub fn trees(weights: &[f64]) -> IndexMap<&'static str, Box<dyn StaticTree>> {
    let mut map: IndexMap<&'static str, Box<dyn StaticTree>> = IndexMap::new();
    map.insert("balanced", Box::new(PerfectlyBalancedTree::new(weights)));
    map.insert("weight-balanced", Box::new(WeightBalancedTree::new(weights)));
    map.insert("splay", Box::new(SplayTree::new(weights)));
    map
}
