//! Canonical (non-scrambled) rendering and output assembly.
//!
//! `format_polynode` is the round-trip-safe form the parser's own grammar
//! can re-read: coefficient `1` is omitted, `-1` is written as a lone `-`,
//! and `*` is always written explicitly between factors.

use fideal_core::{Arena, Node, NodeRef, PolyRef};
use std::fmt::Write as _;

pub fn format_polynode(arena: &Arena, p: PolyRef) -> String {
    let summands = &arena.poly(p).summands;
    if summands.is_empty() {
        return "0".to_string();
    }
    let mut out = String::new();
    for (i, (m, c)) in summands.iter().enumerate() {
        let negative = c.is_negative();
        if i > 0 {
            out.push_str(if negative { " - " } else { " + " });
        } else if negative {
            out.push('-');
        }
        let magnitude = if negative { -c.clone() } else { c.clone() };
        let factors = &arena.mono(*m).factors;
        if factors.is_empty() {
            write!(out, "{}", magnitude).unwrap();
            continue;
        }
        if !magnitude.is_one() {
            write!(out, "{}*", magnitude).unwrap();
        }
        let mut first_factor = true;
        for (n, e) in factors.iter() {
            let rendered = format_node(arena, *n);
            for _ in 0..*e {
                if !first_factor {
                    out.push('*');
                }
                out.push_str(&rendered);
                first_factor = false;
            }
        }
    }
    out
}

fn format_node(arena: &Arena, n: NodeRef) -> String {
    match *arena.node(n) {
        Node::Var(i) => format!("x{}", i),
        Node::Fun(p) => format!("f({})", format_polynode(arena, p)),
    }
}

/// One basis line: `b<i> [<stats>]: <expr>`, sorted by `stats.weight`
/// ascending by the caller before this is invoked per-entry.
pub fn format_basis_line(arena: &Arena, index: usize, p: PolyRef) -> String {
    let stats = arena.poly_derived(p).stats;
    format!(
        "b{} [weight={}, depth={}]: {}",
        index + 1,
        stats.weight,
        stats.depth,
        format_polynode(arena, p)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fideal_core::Q;

    #[test]
    fn zero_renders_as_zero() {
        let arena = Arena::new();
        assert_eq!(format_polynode(&arena, arena.zero_p()), "0");
    }

    #[test]
    fn coefficient_one_is_omitted() {
        let mut arena = Arena::new();
        let n = arena.node_var(1);
        let m = arena.mononode(vec![(n, 1)]);
        let p = arena.polynode(vec![(m, Q::one())]);
        assert_eq!(format_polynode(&arena, p), "x1");
    }

    #[test]
    fn negative_one_is_lone_dash() {
        let mut arena = Arena::new();
        let n = arena.node_var(1);
        let m = arena.mononode(vec![(n, 1)]);
        let p = arena.polynode(vec![(m, -Q::one())]);
        assert_eq!(format_polynode(&arena, p), "-x1");
    }

    #[test]
    fn bare_constant_keeps_its_digit() {
        let mut arena = Arena::new();
        let one_m = arena.one_m();
        let p = arena.polynode(vec![(one_m, -Q::one())]);
        assert_eq!(format_polynode(&arena, p), "-1");
    }

    #[test]
    fn two_term_sum_has_explicit_star_and_sign() {
        let mut arena = Arena::new();
        let n1 = arena.node_var(1);
        let n2 = arena.node_var(2);
        let m1 = arena.mononode(vec![(n1, 2)]);
        let m2 = arena.mononode(vec![(n2, 1)]);
        let p = arena.polynode(vec![(m1, Q::from(3i64)), (m2, -Q::one())]);
        assert_eq!(format_polynode(&arena, p), "3*x1*x1 - x2");
    }
}
