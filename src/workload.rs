//! Differential testing: replay one operation sequence against a table and
//! a reference set, in lockstep, and report the first disagreement.
//!
//! The reference is an `FxHashSet`, which shares no code with any scheme
//! under test. Around every operation the harness compares membership of
//! the touched key before and after, plus the occupancy after, so a
//! divergence surfaces at the first step where it is observable rather
//! than at the end of the run.

use std::fmt;

use rand::rngs::StdRng;
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::table::Table;
use crate::Key;

/// One step of a workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Insert(Key),
    Remove(Key),
    Query(Key),
}

impl Op {
    pub fn key(self) -> Key {
        match self {
            Op::Insert(key) | Op::Remove(key) | Op::Query(key) => key,
        }
    }
}

/// The first point where a table and the reference set disagreed.
#[derive(Clone, Copy, Debug)]
pub enum Divergence {
    /// `contains` answered differently from the reference.
    Membership {
        step: usize,
        op: Op,
        key: Key,
        expected: bool,
        got: bool,
    },
    /// `len` drifted from the reference's size.
    Occupancy {
        step: usize,
        op: Op,
        expected: usize,
        got: usize,
    },
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Divergence::Membership {
                step,
                op,
                key,
                expected,
                got,
            } => write!(
                f,
                "step {step}: at {op:?}, contains({key}) is {got} but the reference says {expected}"
            ),
            Divergence::Occupancy {
                step,
                op,
                expected,
                got,
            } => write!(
                f,
                "step {step}: after {op:?}, len() is {got} but the reference holds {expected}"
            ),
        }
    }
}

/// Replay `ops` against `table` and the reference, checking after every
/// step. The table is left in its final state so a caller can poke at it
/// after a clean run.
pub fn run_differential(table: &mut dyn Table, ops: &[Op]) -> Result<(), Divergence> {
    let mut reference: FxHashSet<Key> = FxHashSet::default();
    for (step, &op) in ops.iter().enumerate() {
        let key = op.key();
        check_membership(table, &reference, step, op, key)?;
        match op {
            Op::Insert(key) => {
                table.insert(key);
                reference.insert(key);
            }
            Op::Remove(key) => {
                table.remove(key);
                reference.remove(&key);
            }
            Op::Query(_) => {}
        }
        check_membership(table, &reference, step, op, key)?;
        if table.len() != reference.len() {
            return Err(Divergence::Occupancy {
                step,
                op,
                expected: reference.len(),
                got: table.len(),
            });
        }
    }
    Ok(())
}

fn check_membership(
    table: &dyn Table,
    reference: &FxHashSet<Key>,
    step: usize,
    op: Op,
    key: Key,
) -> Result<(), Divergence> {
    let expected = reference.contains(&key);
    let got = table.contains(key);
    if expected != got {
        return Err(Divergence::Membership {
            step,
            op,
            key,
            expected,
            got,
        });
    }
    Ok(())
}

fn random_op(key: Key, rng: &mut StdRng) -> Op {
    match rng.gen_range(0..4) {
        0 | 1 => Op::Insert(key),
        2 => Op::Remove(key),
        _ => Op::Query(key),
    }
}

/// A mixed stream over keys uniform in `0..key_space`: half inserts, a
/// quarter removes, a quarter queries. Spreading keys over several times
/// the insert count keeps peak occupancy well below the operation count.
pub fn mixed_ops(count: usize, key_space: Key, rng: &mut StdRng) -> Vec<Op> {
    let key_space = key_space.max(1);
    (0..count)
        .map(|_| random_op(rng.gen_range(0..key_space), rng))
        .collect()
}

/// Like [`mixed_ops`], but every key is `1 mod stride`: under the identity
/// hash on a table of `stride` slots, the whole stream lands in one chain
/// or probe run.
pub fn colliding_ops(count: usize, stride: Key, rng: &mut StdRng) -> Vec<Op> {
    let span = (count as Key).max(1);
    (0..count)
        .map(|_| {
            let key = rng.gen_range(0..span) * stride + 1;
            random_op(key, rng)
        })
        .collect()
}
