//! the ring operations on Polynodes -- everything built on top of the
//! hash-consed arena primitives in `arena.rs`.
//!
//! All functions here are pure with respect to their `PolyRef`/`MonoRef`
//! arguments: they read/intern through `&mut Arena` but never mutate an
//! existing entity. None of this module does I/O, spawns threads, or reads
//! randomness.

use crate::arena::Arena;
use crate::mono::MonoRef;
use crate::number::Q;
use crate::poly::PolyRef;
use std::cmp::Ordering;
use std::fmt;

/// `-p`.
pub fn neg(arena: &mut Arena, p: PolyRef) -> PolyRef {
    let summands = arena
        .poly(p)
        .summands
        .iter()
        .map(|(m, c)| (*m, -c.clone()))
        .collect();
    arena.polynode(summands)
}

/// `c * p` for a scalar `c`.
pub fn scale(arena: &mut Arena, c: &Q, p: PolyRef) -> PolyRef {
    if c.is_zero() {
        return arena.zero_p();
    }
    let summands = arena
        .poly(p)
        .summands
        .iter()
        .map(|(m, pc)| (*m, c * pc))
        .collect();
    arena.polynode(summands)
}

/// `a + b`.
pub fn add(arena: &mut Arena, a: PolyRef, b: PolyRef) -> PolyRef {
    let mut summands = arena.poly(a).summands.clone();
    summands.extend(arena.poly(b).summands.iter().cloned());
    arena.polynode(summands)
}

/// `a - b`.
pub fn sub(arena: &mut Arena, a: PolyRef, b: PolyRef) -> PolyRef {
    let mut summands = arena.poly(a).summands.clone();
    summands.extend(arena.poly(b).summands.iter().map(|(m, c)| (*m, -c.clone())));
    arena.polynode(summands)
}

/// `a * b`, distributing over summands and using the cached `mono_mul` fast
/// path for each term product.
pub fn mul(arena: &mut Arena, a: PolyRef, b: PolyRef) -> PolyRef {
    if a == arena.zero_p() || b == arena.zero_p() {
        return arena.zero_p();
    }
    let a_summands = arena.poly(a).summands.clone();
    let b_summands = arena.poly(b).summands.clone();
    let mut out = Vec::with_capacity(a_summands.len() * b_summands.len());
    for (ma, ca) in &a_summands {
        for (mb, cb) in &b_summands {
            let m = arena.mono_mul(*ma, *mb);
            out.push((m, ca * cb));
        }
    }
    arena.polynode(out)
}

/// Multiply a Polynode by a single monomial with coefficient 1 (used
/// pervasively by Buchberger's S-polynomial and reduction steps).
pub fn mul_mono(arena: &mut Arena, p: PolyRef, m: MonoRef) -> PolyRef {
    let summands = arena.poly(p).summands.clone();
    let out = summands
        .into_iter()
        .map(|(pm, c)| (arena.mono_mul(pm, m), c))
        .collect();
    arena.polynode(out)
}

/// `P.apply_func(Q) = f(P + Q) - f(Q)`.
pub fn apply_func(arena: &mut Arena, p: PolyRef, q: PolyRef) -> PolyRef {
    let sum = add(arena, p, q);
    let lhs_node = arena.node_fun(sum);
    let rhs_node = arena.node_fun(q);
    let lhs_m = arena.mononode(vec![(lhs_node, 1)]);
    let rhs_m = arena.mononode(vec![(rhs_node, 1)]);
    arena.polynode(vec![(lhs_m, Q::one()), (rhs_m, -Q::one())])
}

/// `true` iff every factor of `a` appears in `b` with at least as high an
/// exponent: the monomial-divisibility test used by both reduction and the
/// Criterion-1 pair filter.
pub fn mono_divides(arena: &Arena, a: MonoRef, b: MonoRef) -> bool {
    if a == arena.one_m() {
        return true;
    }
    arena
        .mono(a)
        .factors
        .iter()
        .all(|(n, e)| match b_exp(arena, b, *n) {
            Some(be) => be >= *e,
            None => false,
        })
}

fn b_exp(arena: &Arena, m: MonoRef, node: crate::node::NodeRef) -> Option<u32> {
    arena
        .mono(m)
        .factors
        .iter()
        .find(|(n, _)| *n == node)
        .map(|(_, e)| *e)
}

/// `a / b` as monomials, assuming `mono_divides(b, a)`.
pub fn mono_quotient(arena: &mut Arena, a: MonoRef, b: MonoRef) -> MonoRef {
    if b == arena.one_m() {
        return a;
    }
    let fa = arena.mono(a).factors.clone();
    let fb = arena.mono(b).factors.clone();
    let mut out = Vec::with_capacity(fa.len());
    for (n, ea) in fa {
        let eb = fb.iter().find(|(bn, _)| *bn == n).map(|(_, e)| *e).unwrap_or(0);
        let rem = ea.checked_sub(eb).expect("mono_quotient: divisor exponent exceeds dividend");
        if rem > 0 {
            out.push((n, rem));
        }
    }
    arena.mononode(out)
}

/// Least common multiple of two monomials: per-node max exponent.
pub fn mono_lcm(arena: &mut Arena, a: MonoRef, b: MonoRef) -> MonoRef {
    let mut out = arena.mono(a).factors.clone();
    for (n, e) in arena.mono(b).factors.clone() {
        if let Some(slot) = out.iter_mut().find(|(on, _)| *on == n) {
            slot.1 = slot.1.max(e);
        } else {
            out.push((n, e));
        }
    }
    arena.mononode(out)
}

/// The pair of complementary factors `(lcm(a, b)/a, lcm(a, b)/b)` that makes
/// two monomials' S-polynomial cancel its leading terms exactly.
pub fn symmetric_quotient(arena: &mut Arena, m1: MonoRef, m2: MonoRef) -> (MonoRef, MonoRef) {
    let lcm = mono_lcm(arena, m1, m2);
    let comp_1 = mono_quotient(arena, lcm, m1);
    let comp_2 = mono_quotient(arena, lcm, m2);
    (comp_1, comp_2)
}

/// `true` iff `a` and `b` share no common node factor (Criterion 1: a
/// coprime-leading-monomial critical pair S-reduces to zero automatically).
pub fn mono_coprime(arena: &Arena, a: MonoRef, b: MonoRef) -> bool {
    let fb = &arena.mono(b).factors;
    arena
        .mono(a)
        .factors
        .iter()
        .all(|(n, _)| !fb.iter().any(|(bn, _)| bn == n))
}

/// Substitute `V` for `x_k` everywhere it occurs as a bare `Var(k)` factor,
/// reconstructing every Mononode and Polynode that mentions it bottom-up.
/// Occurrences of `x_k` nested inside a `Fun(·)` argument are substituted
/// too (substitution is hereditary through `Fun`, an explicit Open Question
/// resolution: a hypothesis constrains `f` globally, not only at its
/// literal argument list).
pub fn subs_var(arena: &mut Arena, p: PolyRef, k: u32, v: PolyRef) -> PolyRef {
    let summands = arena.poly(p).summands.clone();
    let mut out = arena.zero_p();
    for (m, c) in summands {
        let term = subs_var_mono(arena, m, k, v);
        let scaled = scale(arena, &c, term);
        out = add(arena, out, scaled);
    }
    out
}

fn subs_var_mono(arena: &mut Arena, m: MonoRef, k: u32, v: PolyRef) -> PolyRef {
    let factors = arena.mono(m).factors.clone();
    let mut acc = arena.one_p();
    for (n, e) in factors {
        let base = subs_var_node(arena, n, k, v);
        let mut term = arena.one_p();
        for _ in 0..e {
            term = mul(arena, term, base);
        }
        acc = mul(arena, acc, term);
    }
    acc
}

fn subs_var_node(arena: &mut Arena, n: crate::node::NodeRef, k: u32, v: PolyRef) -> PolyRef {
    match *arena.node(n) {
        crate::node::Node::Var(i) if i == k => v,
        crate::node::Node::Var(i) => {
            let var_node = arena.node_var(i);
            let m = arena.mononode(vec![(var_node, 1)]);
            arena.polynode(vec![(m, Q::one())])
        }
        crate::node::Node::Fun(inner) => {
            let substituted = subs_var(arena, inner, k, v);
            let node = arena.node_fun(substituted);
            let m = arena.mononode(vec![(node, 1)]);
            arena.polynode(vec![(m, Q::one())])
        }
    }
}

/// Substitute `0` for every variable in `vars`. A thin wrapper over
/// `subs_var` with the zero Polynode, applied for each variable in turn.
pub fn subs_zero(arena: &mut Arena, p: PolyRef, vars: &[u32]) -> PolyRef {
    let zero = arena.zero_p();
    vars.iter().fold(p, |acc, &k| subs_var(arena, acc, k, zero))
}

/// Replace `f(·)` application nodes wholesale according to a renaming of
/// the *outer* variable indices (used by preprocessing level 2's
/// permutation pass): applies `perm` to every `Var` index occurring
/// anywhere in `p`, including inside `Fun` arguments.
pub fn rename_vars(arena: &mut Arena, p: PolyRef, perm: &[u32]) -> PolyRef {
    let summands = arena.poly(p).summands.clone();
    let mut out = arena.zero_p();
    for (m, c) in summands {
        let term = rename_vars_mono(arena, m, perm);
        let scaled = scale(arena, &c, term);
        out = add(arena, out, scaled);
    }
    out
}

fn rename_vars_mono(arena: &mut Arena, m: MonoRef, perm: &[u32]) -> PolyRef {
    let factors = arena.mono(m).factors.clone();
    let mut acc = arena.one_p();
    for (n, e) in factors {
        let base = rename_vars_node(arena, n, perm);
        let mut term = arena.one_p();
        for _ in 0..e {
            term = mul(arena, term, base);
        }
        acc = mul(arena, acc, term);
    }
    acc
}

fn rename_vars_node(arena: &mut Arena, n: crate::node::NodeRef, perm: &[u32]) -> PolyRef {
    match *arena.node(n) {
        crate::node::Node::Var(i) => {
            let j = perm_lookup(perm, i);
            let m = arena.mononode(vec![(arena.node_var(j), 1)]);
            arena.polynode(vec![(m, Q::one())])
        }
        crate::node::Node::Fun(inner) => {
            let renamed = rename_vars(arena, inner, perm);
            let node = arena.node_fun(renamed);
            let m = arena.mononode(vec![(node, 1)]);
            arena.polynode(vec![(m, Q::one())])
        }
    }
}

/// `perm` is a list of `(from, to)` pairs; indices absent from the list are
/// left unchanged.
fn perm_lookup(perm: &[u32], i: u32) -> u32 {
    // perm is laid out as pairs flattened: [from0, to0, from1, to1, ...]
    let mut k = 0;
    while k + 1 < perm.len() {
        if perm[k] == i {
            return perm[k + 1];
        }
        k += 2;
    }
    i
}

/// Collect every `Var` index occurring anywhere in `p`, including inside
/// nested `Fun` arguments, sorted ascending and deduplicated.
pub fn occurring_vars(arena: &Arena, p: PolyRef) -> Vec<u32> {
    let mut out = Vec::new();
    collect_vars_poly(arena, p, &mut out);
    out.sort_unstable();
    out.dedup();
    out
}

fn collect_vars_poly(arena: &Arena, p: PolyRef, out: &mut Vec<u32>) {
    for (m, _) in &arena.poly(p).summands {
        for (n, _) in &arena.mono(*m).factors {
            match *arena.node(*n) {
                crate::node::Node::Var(i) => out.push(i),
                crate::node::Node::Fun(inner) => collect_vars_poly(arena, inner, out),
            }
        }
    }
}

/// Lexicographic comparison on the pair `(lm, lc)`, used by preprocessing's
/// "keep the simplest representative" dedup rule when two Polynodes are
/// otherwise interchangeable after variable substitution.
pub fn compare_by_complexity(arena: &Arena, a: PolyRef, b: PolyRef) -> Ordering {
    let sa = arena.poly_derived(a).stats;
    let sb = arena.poly_derived(b).stats;
    sa.approx_length
        .cmp(&sb.approx_length)
        .then(sa.weight.cmp(&sb.weight))
        .then(a.cmp(&b))
}

/// A read-only display wrapper: renders a Polynode as `c1*m1 + c2*m2 + ...`
/// using the arena's current interning, without mutating it. CLI-facing
/// pretty-printing (scrambled variable names, parentheses) lives in the
/// `fideal-cli` crate; this is the unscrambled canonical form used for
/// debugging and the deterministic golden-output tests (P10).
pub struct DisplayPolynode<'a> {
    pub arena: &'a Arena,
    pub poly: PolyRef,
}

impl<'a> fmt::Display for DisplayPolynode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summands = &self.arena.poly(self.poly).summands;
        if summands.is_empty() {
            return write!(f, "0");
        }
        for (i, (m, c)) in summands.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "({})", c)?;
            for (n, e) in &self.arena.mono(*m).factors {
                write!(f, "*{}", DisplayNode { arena: self.arena, node: *n })?;
                if *e != 1 {
                    write!(f, "^{}", e)?;
                }
            }
        }
        Ok(())
    }
}

struct DisplayNode<'a> {
    arena: &'a Arena,
    node: crate::node::NodeRef,
}

impl<'a> fmt::Display for DisplayNode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.arena.node(self.node) {
            crate::node::Node::Var(i) => write!(f, "x{}", i),
            crate::node::Node::Fun(p) => write!(
                f,
                "f({})",
                DisplayPolynode {
                    arena: self.arena,
                    poly: p
                }
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly_x(arena: &mut Arena, i: u32) -> PolyRef {
        let n = arena.node_var(i);
        let m = arena.mononode(vec![(n, 1)]);
        arena.polynode(vec![(m, Q::one())])
    }

    #[test]
    fn add_is_commutative() {
        let mut arena = Arena::new();
        let x1 = poly_x(&mut arena, 1);
        let x2 = poly_x(&mut arena, 2);
        assert_eq!(add(&mut arena, x1, x2), add(&mut arena, x2, x1));
    }

    #[test]
    fn mul_distributes_over_add() {
        let mut arena = Arena::new();
        let a = poly_x(&mut arena, 1);
        let b = poly_x(&mut arena, 2);
        let c = poly_x(&mut arena, 3);
        let lhs_inner = add(&mut arena, b, c);
        let lhs = mul(&mut arena, a, lhs_inner);
        let ab = mul(&mut arena, a, b);
        let ac = mul(&mut arena, a, c);
        let rhs = add(&mut arena, ab, ac);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn neg_is_additive_inverse() {
        let mut arena = Arena::new();
        let a = poly_x(&mut arena, 1);
        let na = neg(&mut arena, a);
        let sum = add(&mut arena, a, na);
        assert_eq!(sum, arena.zero_p());
    }

    #[test]
    fn subs_var_replaces_bare_occurrence() {
        let mut arena = Arena::new();
        let x1 = poly_x(&mut arena, 1);
        let x2 = poly_x(&mut arena, 2);
        let result = subs_var(&mut arena, x1, 1, x2);
        assert_eq!(result, x2);
    }

    #[test]
    fn subs_zero_is_hereditary_through_fun() {
        let mut arena = Arena::new();
        let x1 = poly_x(&mut arena, 1);
        let fn_node = arena.node_fun(x1);
        let m = arena.mononode(vec![(fn_node, 1)]);
        let p = arena.polynode(vec![(m, Q::one())]);
        let zeroed = subs_zero(&mut arena, p, &[1]);
        // f(x1) with x1 -> 0 becomes f(0), not left as f(x1).
        let zero = arena.zero_p();
        let fn_zero = arena.node_fun(zero);
        let m2 = arena.mononode(vec![(fn_zero, 1)]);
        let expected = arena.polynode(vec![(m2, Q::one())]);
        assert_eq!(zeroed, expected);
    }

    #[test]
    fn mono_divides_and_quotient_round_trip() {
        let mut arena = Arena::new();
        let x1 = arena.node_var(1);
        let x2 = arena.node_var(2);
        let a = arena.mononode(vec![(x1, 2), (x2, 1)]);
        let b = arena.mononode(vec![(x1, 1)]);
        assert!(mono_divides(&arena, b, a));
        let q = mono_quotient(&mut arena, a, b);
        assert_eq!(arena.mono(q).factors, vec![(x1, 1), (x2, 1)]);
    }

    #[test]
    fn symmetric_quotient_complements_multiply_back_to_the_lcm() {
        let mut arena = Arena::new();
        let x1 = arena.node_var(1);
        let x2 = arena.node_var(2);
        let a = arena.mononode(vec![(x1, 2)]);
        let b = arena.mononode(vec![(x1, 1), (x2, 1)]);
        let (comp_a, comp_b) = symmetric_quotient(&mut arena, a, b);
        let lcm = mono_lcm(&mut arena, a, b);
        assert_eq!(mono_quotient(&mut arena, lcm, comp_a), a);
        assert_eq!(mono_quotient(&mut arena, lcm, comp_b), b);
        assert_eq!(arena.mono(comp_a).factors, vec![(x2, 1)]);
        assert_eq!(arena.mono(comp_b).factors, vec![(x1, 1)]);
    }

    #[test]
    fn occurring_vars_looks_inside_fun() {
        let mut arena = Arena::new();
        let x1 = poly_x(&mut arena, 1);
        let fn_node = arena.node_fun(x1);
        let x2 = arena.node_var(2);
        let m = arena.mononode(vec![(fn_node, 1), (x2, 1)]);
        let p = arena.polynode(vec![(m, Q::one())]);
        assert_eq!(occurring_vars(&arena, p), vec![1, 2]);
    }

    #[test]
    fn apply_func_matches_its_definition() {
        let mut arena = Arena::new();
        let p = poly_x(&mut arena, 1);
        let q = poly_x(&mut arena, 2);
        let result = apply_func(&mut arena, p, q);

        let sum = add(&mut arena, p, q);
        let f_sum = arena.node_fun(sum);
        let f_q = arena.node_fun(q);
        let m_sum = arena.mononode(vec![(f_sum, 1)]);
        let m_q = arena.mononode(vec![(f_q, 1)]);
        let expected = arena.polynode(vec![(m_sum, Q::one()), (m_q, -Q::one())]);
        assert_eq!(result, expected);
    }
}
