//! Hash-consed storage for Nodes, Mononodes, and Polynodes.
//!
//! Guarantees:
//! - Structurally identical entities get the same ref.
//! - Ref comparison is O(1) structural equality.
//! - Append-only: entities are never removed or mutated.
//! - `Fun(P)` only ever references a Polynode already present in this arena.

use crate::error::AlgebraError;
use crate::mono::{MonoDerived, MonoRef, Mononode};
use crate::node::{Node, NodeRef, Stats};
use crate::number::Q;
use crate::poly::{PolyDerived, PolyRef, Polynode};
use rustc_hash::FxHashMap;

/// Process-wide seed mixed into every content hash. Fixed so that the
/// same input stream produces byte-identical output across runs (P10);
/// `Arena::with_seed` exists for tests that want a different constant.
const CONJ_SEED: u64 = 0x9E3779B97F4A7C15;

/// splitmix64 finalizer: cheap, well-mixed 64-bit avalanche.
fn finalize(seed: u64, x: u64) -> u64 {
    let mut z = x.wrapping_add(seed).wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

struct NodeData {
    node: Node,
    hash: u64,
    stats: Stats,
}

struct MonoData {
    mono: Mononode,
    hash: u64,
    derived: MonoDerived,
}

struct PolyData {
    poly: Polynode,
    hash: u64,
    derived: PolyDerived,
}

/// The single owner of all Node/Mononode/Polynode storage for one computation
/// session. Not `Sync`/thread-shared: each batch id owns its own arena.
pub struct Arena {
    seed: u64,

    nodes: Vec<NodeData>,
    node_dedup: FxHashMap<Node, NodeRef>,

    mononodes: Vec<MonoData>,
    mono_dedup: FxHashMap<Vec<(NodeRef, u32)>, MonoRef>,
    mono_product_cache: FxHashMap<(MonoRef, MonoRef), MonoRef>,

    polynodes: Vec<PolyData>,
    poly_dedup: FxHashMap<Vec<(MonoRef, Q)>, PolyRef>,

    one_m: MonoRef,
    zero_p: PolyRef,
    one_p: PolyRef,
}

impl Arena {
    pub fn new() -> Self {
        Self::with_seed(CONJ_SEED)
    }

    /// Construct an arena with an explicit seed (tests that want a second,
    /// independently-seeded arena to cross-check hash-based fast paths).
    pub fn with_seed(seed: u64) -> Self {
        let mut arena = Self {
            seed,
            nodes: Vec::new(),
            node_dedup: FxHashMap::default(),
            mononodes: Vec::new(),
            mono_dedup: FxHashMap::default(),
            mono_product_cache: FxHashMap::default(),
            polynodes: Vec::new(),
            poly_dedup: FxHashMap::default(),
            one_m: MonoRef(0),
            zero_p: PolyRef(0),
            one_p: PolyRef(0),
        };
        arena.one_m = arena.mononode(Vec::new());
        arena.zero_p = arena.polynode(Vec::new());
        let one_ref = arena.polynode(vec![(arena.one_m, Q::one())]);
        arena.one_p = one_ref;
        arena
    }

    // ---- constants ----

    pub fn one_m(&self) -> MonoRef {
        self.one_m
    }

    pub fn zero_p(&self) -> PolyRef {
        self.zero_p
    }

    pub fn one_p(&self) -> PolyRef {
        self.one_p
    }

    // ---- accessors ----

    pub fn node(&self, r: NodeRef) -> &Node {
        &self.nodes[r.0 as usize].node
    }

    pub fn node_hash(&self, r: NodeRef) -> u64 {
        self.nodes[r.0 as usize].hash
    }

    pub fn node_stats(&self, r: NodeRef) -> Stats {
        self.nodes[r.0 as usize].stats
    }

    pub fn mono(&self, r: MonoRef) -> &Mononode {
        &self.mononodes[r.0 as usize].mono
    }

    pub fn mono_hash(&self, r: MonoRef) -> u64 {
        self.mononodes[r.0 as usize].hash
    }

    pub fn mono_derived(&self, r: MonoRef) -> MonoDerived {
        self.mononodes[r.0 as usize].derived
    }

    pub fn poly(&self, r: PolyRef) -> &Polynode {
        &self.polynodes[r.0 as usize].poly
    }

    pub fn poly_hash(&self, r: PolyRef) -> u64 {
        self.polynodes[r.0 as usize].hash
    }

    pub fn poly_derived(&self, r: PolyRef) -> PolyDerived {
        self.polynodes[r.0 as usize].derived
    }

    pub fn len_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn len_mononodes(&self) -> usize {
        self.mononodes.len()
    }

    pub fn len_polynodes(&self) -> usize {
        self.polynodes.len()
    }

    // ---- constructors ----

    /// Arena-unique Node for `Var(i)`.
    pub fn node_var(&mut self, i: u32) -> NodeRef {
        self.intern_node(Node::Var(i))
    }

    /// Arena-unique Node for `Fun(p)`. `p` must already be a Polynode in
    /// *this* arena -- violating that is a programming-contract bug, so
    /// this panics rather than returning a recoverable error.
    pub fn node_fun(&mut self, p: PolyRef) -> NodeRef {
        assert!(
            (p.0 as usize) < self.polynodes.len(),
            "{}",
            AlgebraError::DanglingPolyRef(p)
        );
        self.intern_node(Node::Fun(p))
    }

    fn intern_node(&mut self, node: Node) -> NodeRef {
        if let Some(&r) = self.node_dedup.get(&node) {
            return r;
        }
        let fun_arg_stats = match node {
            Node::Fun(p) => Some(self.poly_derived(p).stats),
            Node::Var(_) => None,
        };
        let stats = Node::stats_for(&node, fun_arg_stats);
        let hash = match node {
            Node::Var(i) => finalize(self.seed, i as u64),
            Node::Fun(p) => finalize(self.seed, self.poly_hash(p)),
        };
        let r = NodeRef(self.nodes.len() as u32);
        self.nodes.push(NodeData { node, hash, stats });
        self.node_dedup.insert(node, r);
        r
    }

    /// Normalise (merge duplicate nodes, drop zero exponents, sort by node
    /// order) and intern a Mononode.
    pub fn mononode(&mut self, factors: Vec<(NodeRef, u32)>) -> MonoRef {
        let normalized = self.normalize_factors(factors);
        if let Some(&r) = self.mono_dedup.get(&normalized) {
            return r;
        }
        let (var_degree, pol_degree) = normalized.iter().fold((0u64, 0u64), |(v, p), (n, e)| {
            match self.node(*n) {
                Node::Var(_) => (v + *e as u64, p),
                Node::Fun(_) => (v, p + *e as u64),
            }
        });
        let stats = normalized.iter().fold(Stats::default(), |acc, (n, e)| {
            let s = self.node_stats(*n);
            Stats {
                weight: acc.weight + s.weight * (*e as u64),
                nested_weight: acc.nested_weight + s.nested_weight * (*e as u64),
                depth: acc.depth.max(s.depth),
                approx_length: acc.approx_length + s.approx_length * e,
            }
        });
        let hash = normalized
            .iter()
            .fold(1u64, |acc, (n, e)| acc.wrapping_mul(node_exp_hash(self.node_hash(*n), *e)));
        let r = MonoRef(self.mononodes.len() as u32);
        self.mononodes.push(MonoData {
            mono: Mononode {
                factors: normalized.clone(),
            },
            hash,
            derived: MonoDerived {
                var_degree,
                pol_degree,
                stats,
            },
        });
        self.mono_dedup.insert(normalized, r);
        r
    }

    fn normalize_factors(&self, mut factors: Vec<(NodeRef, u32)>) -> Vec<(NodeRef, u32)> {
        factors.sort_by(|a, b| crate::order::compare_node(self, a.0, b.0).then(a.0.cmp(&b.0)));
        let mut merged: Vec<(NodeRef, u32)> = Vec::with_capacity(factors.len());
        for (n, e) in factors {
            if e == 0 {
                continue;
            }
            if let Some(last) = merged.last_mut() {
                if last.0 == n {
                    last.1 += e;
                    continue;
                }
            }
            merged.push((n, e));
        }
        merged
    }

    /// Cached Mononode product: the hash of a product is the product of the
    /// factor hashes, so the same pair always recomputes the same result;
    /// we cache by operand pair rather than by raw hash to sidestep any
    /// risk of hash collisions.
    pub fn mono_mul(&mut self, a: MonoRef, b: MonoRef) -> MonoRef {
        if a == self.one_m {
            return b;
        }
        if b == self.one_m {
            return a;
        }
        let key = if a.0 <= b.0 { (a, b) } else { (b, a) };
        if let Some(&r) = self.mono_product_cache.get(&key) {
            return r;
        }
        let mut merged = self.mono(a).factors.clone();
        merged.extend_from_slice(&self.mono(b).factors);
        let r = self.mononode(merged);
        self.mono_product_cache.insert(key, r);
        r
    }

    /// Normalise (combine equal monomials, drop zero coefficients, sort by
    /// monomial order) and intern a Polynode.
    pub fn polynode(&mut self, summands: Vec<(MonoRef, Q)>) -> PolyRef {
        let normalized = self.normalize_summands(summands);
        if let Some(&r) = self.poly_dedup.get(&normalized) {
            return r;
        }
        let stats = normalized.iter().fold(Stats::default(), |acc, (m, _)| {
            let s = self.mono_derived(*m).stats;
            Stats {
                weight: acc.weight + s.weight,
                nested_weight: acc.nested_weight + s.nested_weight,
                depth: acc.depth.max(s.depth),
                approx_length: acc.approx_length + s.approx_length + 2,
            }
        });
        let hash = normalized.iter().fold(0u64, |acc, (m, c)| {
            acc ^ finalize(self.seed, self.mono_hash(*m) ^ coeff_hash(c))
        });
        let r = PolyRef(self.polynodes.len() as u32);
        self.polynodes.push(PolyData {
            poly: Polynode {
                summands: normalized.clone(),
            },
            hash,
            derived: PolyDerived { stats },
        });
        self.poly_dedup.insert(normalized, r);
        r
    }

    fn normalize_summands(&self, summands: Vec<(MonoRef, Q)>) -> Vec<(MonoRef, Q)> {
        let mut merged: FxHashMap<MonoRef, Q> = FxHashMap::default();
        // Deterministic accumulation order: insertion order of first sight,
        // replayed below after sorting -- avoids depending on hash-map order.
        let mut order: Vec<MonoRef> = Vec::new();
        for (m, c) in summands {
            match merged.get_mut(&m) {
                Some(acc) => *acc = &*acc + &c,
                None => {
                    merged.insert(m, c);
                    order.push(m);
                }
            }
        }
        let mut out: Vec<(MonoRef, Q)> = order
            .into_iter()
            .filter_map(|m| {
                let c = merged.remove(&m).unwrap();
                if c.is_zero() {
                    None
                } else {
                    Some((m, c))
                }
            })
            .collect();
        out.sort_by(|a, b| crate::order::compare_mono(self, a.0, b.0).then(a.0.cmp(&b.0)));
        out
    }
}

fn node_exp_hash(node_hash: u64, exp: u32) -> u64 {
    // node_hash^exp under wrapping multiplication -- keeps Mononode hash
    // multiplicative-commutative: product hash == hash of product.
    let mut result = 1u64;
    let mut base = node_hash;
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result = result.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        e >>= 1;
    }
    result
}

fn coeff_hash(c: &Q) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    c.hash(&mut hasher);
    hasher.finish()
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
