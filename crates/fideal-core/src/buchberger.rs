//! Buchberger's algorithm over the elimination-plus-grevlex order.
//!
//! The critical-pair queue is a `Vec` drained by repeated linear-scan
//! extraction of the pair with the smallest LCM under `order::compare_mono`.
//! A real binary heap would need its comparator to capture `&Arena`, which
//! doesn't fit `Ord`'s signature; for the basis sizes expected here the
//! linear scan is not a bottleneck worth the extra plumbing.

use crate::algebra;
use crate::arena::Arena;
use crate::mono::MonoRef;
use crate::poly::PolyRef;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// A cooperative wall-clock budget. `buchberger` polls this between pairs
/// and returns early (with `finished = false`) once it elapses, rather than
/// running unbounded on a pathological input.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(d: Duration) -> Self {
        Deadline { at: Instant::now() + d }
    }

    pub fn none() -> Self {
        Deadline { at: Instant::now() + Duration::from_secs(60 * 60 * 24 * 365) }
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }
}

struct CriticalPair {
    i: usize,
    j: usize,
    lcm: MonoRef,
}

/// `S(p, q)`: the S-polynomial of two basis elements, normalised so both
/// leading terms cancel exactly.
fn s_poly(arena: &mut Arena, p: PolyRef, q: PolyRef) -> PolyRef {
    let lm_p = arena.poly(p).lm().expect("s_poly: p must be non-zero");
    let lm_q = arena.poly(q).lm().expect("s_poly: q must be non-zero");
    let lc_p = arena.poly(p).lc().unwrap().clone();
    let lc_q = arena.poly(q).lc().unwrap().clone();
    let (comp_p, comp_q) = algebra::symmetric_quotient(arena, lm_p, lm_q);
    let left = algebra::mul_mono(arena, p, comp_p);
    let right = algebra::mul_mono(arena, q, comp_q);
    let left_scaled = algebra::scale(arena, &lc_q, left);
    let right_scaled = algebra::scale(arena, &lc_p, right);
    algebra::sub(arena, left_scaled, right_scaled)
}

/// Reduce `p`'s leading term against `basis` once, repeatedly, until no
/// basis element's leading monomial divides `p`'s leading monomial (or `p`
/// becomes zero). Returns the reduced Polynode.
pub fn lead_reduce(arena: &mut Arena, mut p: PolyRef, basis: &[PolyRef]) -> PolyRef {
    'outer: loop {
        if p == arena.zero_p() {
            return p;
        }
        let lm_p = arena.poly(p).lm().unwrap();
        for &g in basis {
            let lm_g = arena.poly(g).lm().unwrap();
            if algebra::mono_divides(arena, lm_g, lm_p) {
                let quot = algebra::mono_quotient(arena, lm_p, lm_g);
                let lc_p = arena.poly(p).lc().unwrap().clone();
                let lc_g = arena.poly(g).lc().unwrap().clone();
                let scaled_g = algebra::mul_mono(arena, g, quot);
                let scaled_g = algebra::scale(arena, &lc_p, scaled_g);
                let scaled_p = algebra::scale(arena, &lc_g, p);
                p = algebra::sub(arena, scaled_p, scaled_g);
                continue 'outer;
            }
        }
        return p;
    }
}

/// Fully reduce `p` against `basis`: every term, not only the leading one,
/// is reduced against the basis (used for the reduced/monic post-pass and
/// for membership testing).
pub fn full_reduce(arena: &mut Arena, p: PolyRef, basis: &[PolyRef]) -> PolyRef {
    let mut remainder = arena.zero_p();
    let mut current = p;
    while current != arena.zero_p() {
        let lm_c = arena.poly(current).lm().unwrap();
        let mut reduced_this_term = false;
        for &g in basis {
            let lm_g = arena.poly(g).lm().unwrap();
            if algebra::mono_divides(arena, lm_g, lm_c) {
                let quot = algebra::mono_quotient(arena, lm_c, lm_g);
                let lc_c = arena.poly(current).lc().unwrap().clone();
                let lc_g = arena.poly(g).lc().unwrap().clone();
                let scaled_g = algebra::mul_mono(arena, g, quot);
                let scaled_g = algebra::scale(arena, &lc_c, scaled_g);
                let scaled_c = algebra::scale(arena, &lc_g, current);
                current = algebra::sub(arena, scaled_c, scaled_g);
                reduced_this_term = true;
                break;
            }
        }
        if !reduced_this_term {
            let lc_c = arena.poly(current).lc().unwrap().clone();
            let lead_term = arena.polynode(vec![(lm_c, lc_c)]);
            remainder = algebra::add(arena, remainder, lead_term);
            current = algebra::sub(arena, current, lead_term);
        }
    }
    remainder
}

fn compare_mono_lt(arena: &Arena, a: MonoRef, b: MonoRef) -> bool {
    crate::order::compare_mono(arena, a, b) == std::cmp::Ordering::Less
}

/// Run Buchberger's algorithm to (try to) compute a Groebner basis for the
/// ideal generated by `generators`, under `deadline`. Returns the basis
/// computed so far and whether it is complete (`finished`): a `false`
/// second element means the deadline elapsed before the pair queue drained,
/// and the returned basis is sound (every element is really in the ideal)
/// but not necessarily a full Groebner basis.
pub fn buchberger(
    arena: &mut Arena,
    generators: &[PolyRef],
    deadline: Deadline,
) -> (Vec<PolyRef>, bool) {
    let span = tracing::info_span!("buchberger", generators = generators.len());
    let _enter = span.enter();

    let mut basis: Vec<PolyRef> = generators
        .iter()
        .copied()
        .filter(|&p| p != arena.zero_p())
        .collect();
    let mut pairs: Vec<CriticalPair> = Vec::new();
    for i in 0..basis.len() {
        for j in (i + 1)..basis.len() {
            push_pair(arena, &basis, &mut pairs, i, j);
        }
    }

    let mut finished = true;
    while let Some(idx) = select_min_pair(arena, &pairs) {
        if deadline.expired() {
            warn!("buchberger deadline elapsed with {} pairs remaining", pairs.len());
            finished = false;
            break;
        }
        let pair = pairs.remove(idx);

        if criterion2(arena, &basis, &pairs, &pair) {
            trace!(i = pair.i, j = pair.j, "chain criterion skip");
            continue;
        }

        let s = s_poly(arena, basis[pair.i], basis[pair.j]);
        let reduced = lead_reduce(arena, s, &basis);
        if reduced == arena.zero_p() {
            continue;
        }
        debug!(new_index = basis.len(), "adding new basis element");
        let new_idx = basis.len();
        for k in 0..new_idx {
            push_pair(arena, &basis, &mut pairs, k, new_idx);
        }
        basis.push(reduced);
    }

    let minimal = minimal_basis(arena, &basis);
    let reduced = reduce_basis(arena, &minimal);
    (reduced, finished)
}

fn push_pair(arena: &mut Arena, basis: &[PolyRef], pairs: &mut Vec<CriticalPair>, i: usize, j: usize) {
    let lm_i = arena.poly(basis[i]).lm().unwrap();
    let lm_j = arena.poly(basis[j]).lm().unwrap();
    // Criterion 1: coprime leading monomials S-reduce to zero regardless of
    // the rest of the basis, so skip this pair outright.
    if algebra::mono_coprime(arena, lm_i, lm_j) {
        return;
    }
    let lcm = algebra::mono_lcm(arena, lm_i, lm_j);
    pairs.push(CriticalPair { i, j, lcm });
}

fn select_min_pair(arena: &Arena, pairs: &[CriticalPair]) -> Option<usize> {
    if pairs.is_empty() {
        return None;
    }
    let mut best = 0;
    for k in 1..pairs.len() {
        if compare_mono_lt(arena, pairs[k].lcm, pairs[best].lcm) {
            best = k;
        }
    }
    Some(best)
}

/// Criterion 2 (chain criterion): skip `(i, j)` if some third basis element
/// `k` has a leading monomial dividing `lcm(i, j)` and both `(i, k)` and
/// `(j, k)` have already been processed (are no longer in the pending
/// queue) or are themselves coprime.
fn criterion2(arena: &mut Arena, basis: &[PolyRef], pairs: &[CriticalPair], pair: &CriticalPair) -> bool {
    for k in 0..basis.len() {
        if k == pair.i || k == pair.j {
            continue;
        }
        let lm_k = arena.poly(basis[k]).lm().unwrap();
        if !algebra::mono_divides(arena, lm_k, pair.lcm) {
            continue;
        }
        let ik_pending = pairs.iter().any(|p| pair_matches(p, pair.i, k));
        let jk_pending = pairs.iter().any(|p| pair_matches(p, pair.j, k));
        if !ik_pending && !jk_pending {
            return true;
        }
    }
    false
}

fn pair_matches(p: &CriticalPair, a: usize, b: usize) -> bool {
    (p.i == a && p.j == b) || (p.i == b && p.j == a)
}

/// Drop any basis element whose leading monomial is divisible by another
/// element's leading monomial (keeping one representative of each minimal
/// leading-monomial class).
fn minimal_basis(arena: &mut Arena, basis: &[PolyRef]) -> Vec<PolyRef> {
    let mut keep = vec![true; basis.len()];
    for i in 0..basis.len() {
        if !keep[i] {
            continue;
        }
        let lm_i = arena.poly(basis[i]).lm().unwrap();
        for j in 0..basis.len() {
            if i == j || !keep[j] {
                continue;
            }
            let lm_j = arena.poly(basis[j]).lm().unwrap();
            if lm_j == lm_i {
                // Tied leading monomials: keep the earliest of the group,
                // drop the rest.
                if i > j {
                    keep[i] = false;
                    break;
                }
            } else if algebra::mono_divides(arena, lm_j, lm_i) {
                keep[i] = false;
                break;
            }
        }
    }
    basis
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| if k { Some(p) } else { None })
        .collect()
}

/// Fully reduce every element against the rest of the (minimal) basis and
/// rescale to monic (leading coefficient 1), producing the canonical
/// reduced Groebner basis.
fn reduce_basis(arena: &mut Arena, basis: &[PolyRef]) -> Vec<PolyRef> {
    let mut out = Vec::with_capacity(basis.len());
    for i in 0..basis.len() {
        let mut rest: Vec<PolyRef> = basis.to_vec();
        rest.remove(i);
        let reduced = full_reduce(arena, basis[i], &rest);
        if reduced == arena.zero_p() {
            continue;
        }
        let lc = arena.poly(reduced).lc().unwrap().clone();
        let monic = algebra::scale(arena, &lc.recip(), reduced);
        out.push(monic);
    }
    out.sort_by(|&a, &b| {
        let lm_a = arena.poly(a).lm().unwrap();
        let lm_b = arena.poly(b).lm().unwrap();
        crate::order::compare_mono(arena, lm_a, lm_b)
    });
    out
}

/// `true` iff `p` reduces to zero against `basis`, i.e. `p` lies in the
/// ideal generated by `basis` *when `basis` is a Groebner basis*.
pub fn is_member(arena: &mut Arena, p: PolyRef, basis: &[PolyRef]) -> bool {
    full_reduce(arena, p, basis) == arena.zero_p()
}
