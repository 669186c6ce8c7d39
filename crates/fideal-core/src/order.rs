//! Monomial order: elimination on the `Fun` block, graded reverse
//! lexicographic (grevlex) within each block.
//!
//! Conventions (documented in DESIGN.md's Open Question resolutions):
//! - `Ordering::Less` always means "sorts first" -- both in `compare_node`
//!   (node order) and in `compare_mono` (monomial order).
//! - For `compare_mono`, "sorts first" means "more eliminable / chosen as
//!   the leading monomial": a higher total `Fun`-degree is `Less`. Polynode
//!   summands are stored ascending by this order, so `summands[0]` is
//!   always the leading term.

use crate::arena::Arena;
use crate::mono::MonoRef;
use crate::node::{Node, NodeRef};
use std::cmp::Ordering;

/// Node order: `Fun(·)` before `Var(·)`; among `Fun`s, higher weight
/// first (raw hash breaks ties); among `Var`s, smaller index first.
pub fn compare_node(arena: &Arena, a: NodeRef, b: NodeRef) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    match (arena.node(a), arena.node(b)) {
        (Node::Fun(_), Node::Var(_)) => Ordering::Less,
        (Node::Var(_), Node::Fun(_)) => Ordering::Greater,
        (Node::Var(i), Node::Var(j)) => i.cmp(j),
        (Node::Fun(_), Node::Fun(_)) => {
            let wa = arena.node_stats(a).weight;
            let wb = arena.node_stats(b).weight;
            match wb.cmp(&wa) {
                Ordering::Equal => arena.node_hash(a).cmp(&arena.node_hash(b)),
                other => other,
            }
        }
    }
}

/// Monomial order.
pub fn compare_mono(arena: &Arena, a: MonoRef, b: MonoRef) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let da = arena.mono_derived(a);
    let db = arena.mono_derived(b);

    // 1. Elimination: higher total Fun-degree sorts first ("is smaller").
    match db.pol_degree.cmp(&da.pol_degree) {
        Ordering::Equal => {}
        other => return other,
    }

    let (fa_fun, fa_var) = split_fun_var(arena, &arena.mono(a).factors);
    let (fb_fun, fb_var) = split_fun_var(arena, &arena.mono(b).factors);

    // 2. Within the Fun prefix: grevlex walk.
    match grevlex_walk(arena, &fa_fun, &fb_fun) {
        Ordering::Equal => {}
        other => return other,
    }

    // 3. Entering Var factors: total Var-degree first, then grevlex walk.
    match db.var_degree.cmp(&da.var_degree) {
        Ordering::Equal => {}
        other => return other,
    }
    grevlex_walk(arena, &fa_var, &fb_var)
}

fn split_fun_var(
    arena: &Arena,
    factors: &[(NodeRef, u32)],
) -> (Vec<(NodeRef, u32)>, Vec<(NodeRef, u32)>) {
    let mut fun = Vec::new();
    let mut var = Vec::new();
    for &(n, e) in factors {
        match arena.node(n) {
            Node::Fun(_) => fun.push((n, e)),
            Node::Var(_) => var.push((n, e)),
        }
    }
    (fun, var)
}

/// Grevlex comparison of two factor lists, each sorted ascending by
/// `compare_node`. Walks from the highest (by node order) factor backward;
/// at the first differing exponent, the smaller exponent sorts first.
fn grevlex_walk(arena: &Arena, fa: &[(NodeRef, u32)], fb: &[(NodeRef, u32)]) -> Ordering {
    let mut ia = fa.len();
    let mut ib = fb.len();
    loop {
        if ia == 0 && ib == 0 {
            return Ordering::Equal;
        }
        let na = if ia > 0 { Some(fa[ia - 1].0) } else { None };
        let nb = if ib > 0 { Some(fb[ib - 1].0) } else { None };
        let node = match (na, nb) {
            (Some(x), Some(y)) => {
                if compare_node(arena, x, y) == Ordering::Greater {
                    x
                } else {
                    y
                }
            }
            (Some(x), None) => x,
            (None, Some(y)) => y,
            (None, None) => unreachable!(),
        };
        let ea = if na == Some(node) {
            let e = fa[ia - 1].1;
            ia -= 1;
            e
        } else {
            0
        };
        let eb = if nb == Some(node) {
            let e = fb[ib - 1].1;
            ib -= 1;
            e
        } else {
            0
        };
        if ea != eb {
            return ea.cmp(&eb);
        }
    }
}
