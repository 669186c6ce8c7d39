//! hypothesis preprocessing levels 0/1/2 -- the expansion of a raw
//! hypothesis list into the generator set actually fed to `buchberger`.
//!
//! Level 0 is always applied; levels 1 and 2 are strictly additive (each
//! widens the generator set further) and are gated by the caller's
//! requested preprocessing level.

use crate::algebra;
use crate::arena::Arena;
use crate::poly::PolyRef;

/// Level 0: drop the zero Polynode and deduplicate by `PolyRef` identity
/// (hash-consing already guarantees structurally equal hypotheses share a
/// ref, so this is a plain `dedup` over already-canonical values).
pub fn level0(arena: &Arena, hypotheses: &[PolyRef]) -> Vec<PolyRef> {
    let zero = arena.zero_p();
    let mut out: Vec<PolyRef> = hypotheses.iter().copied().filter(|&p| p != zero).collect();
    out.sort();
    out.dedup();
    out
}

/// Level 1: for every hypothesis and every non-empty subset of its
/// occurring variables, add the hypothesis with that subset substituted to
/// zero. Subsets are enumerated over the hypothesis's *own* variable set,
/// not the global union, so this stays linear in the hypothesis count times
/// exponential only in each hypothesis's individual arity.
pub fn level1(arena: &mut Arena, hypotheses: &[PolyRef]) -> Vec<PolyRef> {
    let mut out = hypotheses.to_vec();
    for &h in hypotheses {
        let vars = algebra::occurring_vars(arena, h);
        for subset in non_empty_subsets(&vars) {
            let substituted = algebra::subs_zero(arena, h, &subset);
            out.push(substituted);
        }
    }
    level0(arena, &out)
}

/// Level 2: for every hypothesis surviving level 1 and every permutation of
/// its occurring variables, add the variable-renamed hypothesis.
pub fn level2(arena: &mut Arena, hypotheses: &[PolyRef]) -> Vec<PolyRef> {
    let base = level1(arena, hypotheses);
    let mut out = base.clone();
    for &h in &base {
        let vars = algebra::occurring_vars(arena, h);
        for perm in permutations(&vars) {
            let renamed = algebra::rename_vars(arena, h, &perm);
            out.push(renamed);
        }
    }
    level0(arena, &out)
}

/// Apply the preprocessing pipeline up to and including `level`.
pub fn expand(arena: &mut Arena, hypotheses: &[PolyRef], level: u8) -> Vec<PolyRef> {
    match level {
        0 => level0(arena, hypotheses),
        1 => level1(arena, hypotheses),
        _ => level2(arena, hypotheses),
    }
}

fn non_empty_subsets(vars: &[u32]) -> Vec<Vec<u32>> {
    let n = vars.len();
    if n == 0 || n > 20 {
        // Hypotheses with more than 20 distinct variables would blow the
        // 2^n subset enumeration well past any realistic budget; level 1
        // simply has no effect on such a hypothesis.
        return Vec::new();
    }
    let mut out = Vec::with_capacity((1usize << n) - 1);
    for mask in 1..(1u32 << n) {
        let mut subset = Vec::new();
        for (i, &v) in vars.iter().enumerate() {
            if mask & (1 << i) != 0 {
                subset.push(v);
            }
        }
        out.push(subset);
    }
    out
}

/// All permutations of `vars` expressed as flattened `(from, to)` pairs
/// suitable for `algebra::rename_vars`, excluding the identity permutation.
fn permutations(vars: &[u32]) -> Vec<Vec<u32>> {
    if vars.is_empty() || vars.len() > 8 {
        // 8! = 40320; beyond that the permutation blow-up is not worth
        // paying for inside preprocessing.
        return Vec::new();
    }
    let mut indices: Vec<usize> = (0..vars.len()).collect();
    let mut results = Vec::new();
    permute(&mut indices, 0, &mut |perm| {
        if perm.iter().enumerate().all(|(i, &p)| i == p) {
            return;
        }
        let mut flat = Vec::with_capacity(vars.len() * 2);
        for (i, &p) in perm.iter().enumerate() {
            flat.push(vars[i]);
            flat.push(vars[p]);
        }
        results.push(flat);
    });
    results
}

fn permute(indices: &mut Vec<usize>, k: usize, visit: &mut impl FnMut(&[usize])) {
    if k == indices.len() {
        visit(indices);
        return;
    }
    for i in k..indices.len() {
        indices.swap(k, i);
        permute(indices, k + 1, visit);
        indices.swap(k, i);
    }
}
