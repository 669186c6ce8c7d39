//! `Node`: a single ring indeterminate, either a variable `x_i` or a formal
//! application `f(P)` of the unknown function to a `Polynode`.
//!
//! `NodeRef` is a lightweight `Copy` handle (u32 index) into the arena.
//! Hash-consing guarantees structural equality reduces to `NodeRef` equality.

use crate::poly::PolyRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a `Node` stored in the arena.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
pub struct NodeRef(pub(crate) u32);

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n#{}", self.0)
    }
}

/// The two indeterminate kinds.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Node {
    /// `x_i`, `i >= 1`.
    Var(u32),
    /// `f(P)` where `P` is an already-interned Polynode.
    Fun(PolyRef),
}

/// Weight/depth/length bookkeeping used only by ordering, the preprocessing
/// simplification sort, and display -- never by hash-consing equality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub weight: u64,
    pub nested_weight: u64,
    pub depth: u32,
    pub approx_length: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `Stats` round-trips through JSON -- exercised by tooling that
    /// snapshots basis statistics between runs.
    #[test]
    fn stats_json_round_trip() {
        let s = Stats {
            weight: 9,
            nested_weight: 3,
            depth: 2,
            approx_length: 11,
        };
        let encoded = serde_json::to_string(&s).unwrap();
        let decoded: Stats = serde_json::from_str(&encoded).unwrap();
        assert_eq!(s, decoded);
    }

    #[test]
    fn node_ref_json_round_trip() {
        let r = NodeRef(7);
        let encoded = serde_json::to_string(&r).unwrap();
        let decoded: NodeRef = serde_json::from_str(&encoded).unwrap();
        assert_eq!(r, decoded);
    }
}

impl Node {
    /// Compute stats for a `Var`/`Fun` node given the stats of its `Polynode`
    /// argument (ignored for `Var`).
    pub(crate) fn stats_for(kind: &Node, fun_arg_stats: Option<Stats>) -> Stats {
        match kind {
            Node::Var(_) => Stats {
                weight: 2,
                nested_weight: 0,
                depth: 0,
                approx_length: 2,
            },
            Node::Fun(_) => {
                let p = fun_arg_stats.expect("Fun node requires its Polynode's stats");
                Stats {
                    weight: p.weight.saturating_mul(p.weight),
                    nested_weight: p.weight,
                    depth: p.depth + 1,
                    approx_length: p.approx_length + 3,
                }
            }
        }
    }
}
