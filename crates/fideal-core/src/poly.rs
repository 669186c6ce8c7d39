//! `Polynode`: a finite ℚ-linear combination of Mononodes, the ring element
//! hypotheses and basis elements are made of.

use crate::mono::MonoRef;
use crate::node::Stats;
use crate::number::Q;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a `Polynode` stored in the arena.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
pub struct PolyRef(pub(crate) u32);

impl fmt::Display for PolyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p#{}", self.0)
    }
}

/// Arena-owned data for one interned Polynode.
///
/// `summands` is sorted ascending by the monomial order so the leading
/// monomial (the one most eligible for `Fun(·)`-elimination) is always at
/// index 0 (see DESIGN.md's reversal-convention note). The empty
/// vector is the additive identity `0`.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Polynode {
    pub summands: Vec<(MonoRef, Q)>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PolyDerived {
    pub stats: Stats,
}

impl Polynode {
    pub fn is_zero(&self) -> bool {
        self.summands.is_empty()
    }

    /// Leading monomial, or `None` for the zero Polynode.
    pub fn lm(&self) -> Option<MonoRef> {
        self.summands.first().map(|(m, _)| *m)
    }

    /// Leading coefficient, or `None` for the zero Polynode.
    pub fn lc(&self) -> Option<&Q> {
        self.summands.first().map(|(_, c)| c)
    }
}
