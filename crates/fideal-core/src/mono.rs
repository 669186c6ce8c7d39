//! `Mononode`: a finite multiset of `Node`s (a power-product), represented as
//! a `Node -> exponent` mapping with positive exponents, stored as a vector
//! sorted by the node order so hash-consing needs no comparator-aware map --
//! the ordering needs arena context a plain `BTreeMap` can't carry.

use crate::node::{NodeRef, Stats};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a `Mononode` stored in the arena.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
pub struct MonoRef(pub(crate) u32);

impl fmt::Display for MonoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m#{}", self.0)
    }
}

/// Arena-owned data for one interned Mononode.
///
/// `factors` is sorted ascending by the node order: all `Fun(·)`
/// factors precede all `Var(·)` factors, and is the canonical key used for
/// hash-consing. The empty vector is the identity `1`.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Mononode {
    pub factors: Vec<(NodeRef, u32)>,
}

/// Derived, non-identity-bearing bookkeeping for a Mononode: degree counts
/// (used by the monomial order) and stats (used by ordering/display only).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonoDerived {
    /// Sum of exponents over `Var(·)` factors.
    pub var_degree: u64,
    /// Sum of exponents over `Fun(·)` factors.
    pub pol_degree: u64,
    pub stats: Stats,
}

impl Mononode {
    pub fn is_one(&self) -> bool {
        self.factors.is_empty()
    }
}
