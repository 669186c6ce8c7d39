//! Randomised pretty-printer (the `randomize`/`rand` CLI flag): echoes a
//! hypothesis in a visually varied but mathematically identical form --
//! summand and factor order shuffled per call, explicit `*` sometimes
//! inserted, parenthesisation sometimes added around single factors.
//!
//! Each call takes its own `&mut impl Rng` rather than a shared global
//! generator, so concurrent sessions never contend on shared RNG state.

use fideal_core::{Arena, Node, PolyRef};
use rand::Rng;
use std::fmt::Write as _;

pub fn scramble(arena: &Arena, p: PolyRef, rng: &mut impl Rng) -> String {
    let summands = &arena.poly(p).summands;
    if summands.is_empty() {
        return "0".to_string();
    }
    let mut order: Vec<usize> = (0..summands.len()).collect();
    shuffle(&mut order, rng);

    let mut out = String::new();
    for (pos, &idx) in order.iter().enumerate() {
        let (m, c) = &summands[idx];
        if pos > 0 {
            if c.is_negative() {
                out.push_str(" - ");
            } else {
                out.push_str(" + ");
            }
        } else if c.is_negative() {
            out.push('-');
        }
        let coeff_str = format!("{}", if c.is_negative() { -c.clone() } else { c.clone() });
        let mut factors = arena.mono(*m).factors.clone();
        shuffle(&mut factors, rng);
        let has_coeff = coeff_str != "1" || factors.is_empty();
        if has_coeff {
            write!(out, "{}", coeff_str).unwrap();
        }
        let mut first_factor = true;
        for (n, e) in factors.iter() {
            let rendered = scramble_node(arena, *n, rng);
            let parenthesise = *e > 1 && matches!(arena.node(*n), Node::Fun(_));
            for _ in 0..*e {
                if !first_factor || has_coeff {
                    if rng.gen_bool(0.5) {
                        out.push('*');
                    } else {
                        out.push(' ');
                    }
                }
                if parenthesise && rng.gen_bool(0.3) {
                    write!(out, "({})", rendered).unwrap();
                } else {
                    out.push_str(&rendered);
                }
                first_factor = false;
            }
        }
    }
    out
}

fn scramble_node(arena: &Arena, n: fideal_core::NodeRef, rng: &mut impl Rng) -> String {
    match *arena.node(n) {
        Node::Var(i) => format!("x{}", i),
        Node::Fun(p) => format!("f({})", scramble(arena, p, rng)),
    }
}

/// Fisher-Yates shuffle; kept local instead of pulling in `rand::seq` so the
/// dependency surface stays the single `Rng` trait.
fn shuffle<T>(items: &mut [T], rng: &mut impl Rng) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
