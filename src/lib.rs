//! A gym for comparing collision-resolution strategies on fixed-capacity
//! integer sets.
//!
//! Five tables implement one small membership contract over `i32` keys and
//! differ only in how they resolve collisions: separate chaining, linear
//! probing with tombstones, Robin Hood probing with backward-shift deletion,
//! two-choice chaining, and cuckoo hashing with a bounded displacement chain
//! and full-table rehash. Each table draws its hash functions from a
//! pluggable [`hash::HashFamily`], so the same scheme can be run under
//! k-independent polynomials, tabulation hashing, or deliberately bad fixed
//! functions.
//!
//! Correctness is checked differentially: [`workload`] replays an operation
//! sequence against a table and a reference set in lockstep and reports the
//! first step where they disagree. The `hashing-gym` binary wires the whole
//! thing together and adds timing sweeps over load factors, plus an optional
//! side experiment on static search trees ([`tree`]) and a Fenwick tree used
//! for histogram bookkeeping ([`fenwick`]).
//!
//! Everything here is single-threaded and deterministic: all randomness
//! flows from explicitly seeded generators, so a failing workload replays
//! exactly.

pub mod fenwick;
pub mod hash;
pub mod table;
pub mod tree;
pub mod workload;

/// The key type every table stores. Signed on purpose: negative keys are
/// legal and exercise the key-to-field mapping in [`hash`].
pub type Key = i32;

pub use table::Table;
