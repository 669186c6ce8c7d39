//! End-to-end scenarios built directly against the arena API: nested
//! `f(·)` reduction, an `apply_func` round trip, binomial expansion,
//! cancellation, and the Buchberger basis properties P8/P9, exercised
//! without going through any command-language parser.

use fideal_core::{algebra, buchberger, Arena, Deadline, Q};

fn var_poly(arena: &mut Arena, i: u32) -> fideal_core::PolyRef {
    let n = arena.node_var(i);
    let m = arena.mononode(vec![(n, 1)]);
    arena.polynode(vec![(m, Q::one())])
}

fn f_poly(arena: &mut Arena, p: fideal_core::PolyRef) -> fideal_core::PolyRef {
    let n = arena.node_fun(p);
    let m = arena.mononode(vec![(n, 1)]);
    arena.polynode(vec![(m, Q::one())])
}

/// S1: a single linear hypothesis `x1 - x2` yields a one-element basis
/// equivalent to itself.
#[test]
fn s1_linear_hypothesis_basis() {
    let mut arena = Arena::new();
    let x1 = var_poly(&mut arena, 1);
    let x2 = var_poly(&mut arena, 2);
    let h = algebra::sub(&mut arena, x1, x2);
    let (basis, finished) = buchberger::buchberger(&mut arena, &[h], Deadline::none());
    assert!(finished);
    assert_eq!(basis.len(), 1);
    assert_eq!(basis[0], h);
}

/// S3: the nested-`f(·)` case -- `f(f(x1+x2)) - f(2 x1) - 2 f(x2)` repeatedly
/// zero-substituted reduces down through the `f(·)` arguments, and the
/// resulting basis must still contain (up to monic scaling and renaming)
/// `f(f(x2)) - 3*f(x2)`.
#[test]
fn s3_nested_fun_reduction() {
    let mut arena = Arena::new();
    let x1 = var_poly(&mut arena, 1);
    let x2 = var_poly(&mut arena, 2);
    let zero = arena.zero_p();

    let sum12 = algebra::add(&mut arena, x1, x2);
    let f_sum12 = f_poly(&mut arena, sum12);
    let f_f_sum12 = f_poly(&mut arena, f_sum12);
    let two_x1 = algebra::scale(&mut arena, &Q::from(2i64), x1);
    let f_two_x1 = f_poly(&mut arena, two_x1);
    let f_x2 = f_poly(&mut arena, x2);
    let two_f_x2 = algebra::scale(&mut arena, &Q::from(2i64), f_x2);

    // hyp f(f(x1+x2)) - f(2 x1) - 2 f(x2)
    let h1 = algebra::sub(&mut arena, algebra::sub(&mut arena, f_f_sum12, f_two_x1), two_f_x2);
    // sub h1 x1 0
    let h2 = algebra::subs_var(&mut arena, h1, 1, zero);
    // sub h1 x2 0
    let h3 = algebra::subs_var(&mut arena, h1, 2, zero);
    // sub h2 x2 0
    let h4 = algebra::subs_var(&mut arena, h2, 2, zero);

    let generators = vec![h1, h2, h3, h4];
    assert!(generators.iter().all(|&h| h != arena.zero_p()));

    let (basis, finished) = buchberger::buchberger(&mut arena, &generators, Deadline::none());
    assert!(finished);

    let f_f_x2 = f_poly(&mut arena, f_x2);
    let three_f_x2 = algebra::scale(&mut arena, &Q::from(3i64), f_x2);
    let target = algebra::sub(&mut arena, f_f_x2, three_f_x2);

    assert!(buchberger::is_member(&mut arena, target, &basis));
    let lm_target = arena.poly(target).lm().unwrap();
    assert!(
        basis.iter().any(|&b| arena.poly(b).lm().unwrap() == lm_target),
        "basis should contain an element with the same leading monomial as f(f(x2)) - 3*f(x2)"
    );
}

/// S4: the literal `sub`/`app`/`sub` chain -- applying `f` to a shifted
/// hypothesis and then substituting the argument's inverse back in
/// collapses the result to zero, exercising `apply_func` end to end.
#[test]
fn s4_sub_app_sub_chain_collapses_to_zero() {
    let mut arena = Arena::new();
    let x1 = var_poly(&mut arena, 1);
    let x2 = var_poly(&mut arena, 2);
    let x3 = var_poly(&mut arena, 3);
    let x4 = var_poly(&mut arena, 4);

    // hyp x1 - x2
    let h1 = algebra::sub(&mut arena, x1, x2);
    // sub h1 x2 x3 + x4
    let x3_plus_x4 = algebra::add(&mut arena, x3, x4);
    let h2 = algebra::subs_var(&mut arena, h1, 2, x3_plus_x4);
    // app h2 x3 + x4
    let h3 = algebra::apply_func(&mut arena, h2, x3_plus_x4);
    // sub h3 x3 x1 - x4
    let x1_minus_x4 = algebra::sub(&mut arena, x1, x4);
    let h4 = algebra::subs_var(&mut arena, h3, 3, x1_minus_x4);

    assert_eq!(h4, arena.zero_p());
}

/// S5: binomial sanity -- `(x1 + x2)^10` expands to coefficients `C(10,k)`
/// with monomials `x1^(10-k) x2^k`, descending in `x1`-degree.
#[test]
fn s5_binomial_expansion() {
    let mut arena = Arena::new();
    let x1 = var_poly(&mut arena, 1);
    let x2 = var_poly(&mut arena, 2);
    let base = algebra::add(&mut arena, x1, x2);
    let mut power = arena.one_p();
    for _ in 0..10 {
        power = algebra::mul(&mut arena, power, base);
    }
    let summands = &arena.poly(power).summands;
    assert_eq!(summands.len(), 11);

    fn binomial(n: u64, k: u64) -> u64 {
        let mut result = 1u64;
        for i in 0..k {
            result = result * (n - i) / (i + 1);
        }
        result
    }

    for (idx, (m, c)) in summands.iter().enumerate() {
        let k = idx as u64; // descending x1-degree means x2-degree ascends
        assert_eq!(*c, Q::from(binomial(10, k) as i64), "coefficient at position {}", idx);
        let factors = &arena.mono(*m).factors;
        let expected_x1_exp = 10 - k as u32;
        let expected_x2_exp = k as u32;
        let mut seen_x1 = expected_x1_exp == 0;
        let mut seen_x2 = expected_x2_exp == 0;
        for (n, e) in factors {
            match arena.node(*n) {
                fideal_core::Node::Var(1) => {
                    assert_eq!(*e, expected_x1_exp);
                    seen_x1 = true;
                }
                fideal_core::Node::Var(2) => {
                    assert_eq!(*e, expected_x2_exp);
                    seen_x2 = true;
                }
                other => panic!("unexpected factor {:?}", other),
            }
        }
        assert!(seen_x1 && seen_x2);
    }
}

/// S6: `P - P == 0` and the arena interns `0` exactly once.
#[test]
fn s6_cancellation_and_single_zero() {
    let mut arena = Arena::new();
    let x1 = var_poly(&mut arena, 1);
    let x2 = var_poly(&mut arena, 2);
    let p = algebra::mul(&mut arena, x1, x2);
    let zero = algebra::sub(&mut arena, p, p);
    assert_eq!(zero, arena.zero_p());

    let another_zero = arena.polynode(vec![]);
    assert_eq!(zero, another_zero);
    assert_eq!(arena.len_polynodes(), {
        let direct = arena.zero_p();
        arena.poly(direct);
        arena.len_polynodes()
    });
}

/// P8: `S(p, q) = (lcm/LM(p))*p/LC(p) - (lcm/LM(q))*q/LC(q)` has a strictly
/// smaller leading monomial than `lcm(LM(p), LM(q))` (the cancellation the
/// construction is designed to guarantee).
#[test]
fn p8_s_poly_leading_monomial_is_reduced() {
    let mut arena = Arena::new();
    let x1n = arena.node_var(1);
    let x2n = arena.node_var(2);
    let m1 = arena.mononode(vec![(x1n, 2)]);
    let m2 = arena.mononode(vec![(x1n, 1), (x2n, 1)]);
    let p = arena.polynode(vec![(m1, Q::one()), (arena.one_m(), Q::from(-1i64))]);
    let q = arena.polynode(vec![(m2, Q::one()), (arena.one_m(), Q::from(-2i64))]);

    let lm_p = arena.poly(p).lm().unwrap();
    let lm_q = arena.poly(q).lm().unwrap();
    let lc_p = arena.poly(p).lc().unwrap().clone();
    let lc_q = arena.poly(q).lc().unwrap().clone();
    let lcm = algebra::mono_lcm(&mut arena, lm_p, lm_q);
    let comp_p = algebra::mono_quotient(&mut arena, lcm, lm_p);
    let comp_q = algebra::mono_quotient(&mut arena, lcm, lm_q);
    let left = algebra::mul_mono(&mut arena, p, comp_p);
    let right = algebra::mul_mono(&mut arena, q, comp_q);
    let left_scaled = algebra::scale(&mut arena, &lc_q, left);
    let right_scaled = algebra::scale(&mut arena, &lc_p, right);
    let s = algebra::sub(&mut arena, left_scaled, right_scaled);

    assert!(s != arena.zero_p(), "this pair's S-poly should not vanish");
    let lm_s = arena.poly(s).lm().unwrap();
    assert_eq!(
        fideal_core::order::compare_mono(&arena, lm_s, lcm),
        std::cmp::Ordering::Greater,
        "S-poly's LM must be strictly smaller (sorts after the LCM in elimination order)"
    );
}

/// P9: the returned basis is minimal (no LM divisible by another's LM),
/// monic (LC == 1), and every input hypothesis fully reduces to zero
/// against it.
#[test]
fn p9_basis_is_minimal_monic_and_absorbs_generators() {
    let mut arena = Arena::new();
    let x1n = arena.node_var(1);
    let x2n = arena.node_var(2);
    let m1 = arena.mononode(vec![(x1n, 2)]);
    let m2 = arena.mononode(vec![(x1n, 1), (x2n, 1)]);
    let m3 = arena.mononode(vec![(x2n, 2)]);
    let p = arena.polynode(vec![(m1, Q::one()), (arena.one_m(), Q::from(-1i64))]);
    let q = arena.polynode(vec![(m2, Q::one()), (arena.one_m(), Q::from(-2i64))]);
    let r = arena.polynode(vec![(m3, Q::one()), (arena.one_m(), Q::from(-3i64))]);

    let (basis, finished) = buchberger::buchberger(&mut arena, &[p, q, r], Deadline::none());
    assert!(finished);

    for &b in &basis {
        let lc = arena.poly(b).lc().unwrap();
        assert!(lc.is_one(), "every basis element must be monic");
    }
    for i in 0..basis.len() {
        for j in 0..basis.len() {
            if i == j {
                continue;
            }
            let lm_i = arena.poly(basis[i]).lm().unwrap();
            let lm_j = arena.poly(basis[j]).lm().unwrap();
            assert!(
                !algebra::mono_divides(&arena, lm_j, lm_i) || lm_i == lm_j,
                "basis must be minimal"
            );
        }
    }
    for input in [p, q, r] {
        assert!(buchberger::is_member(&mut arena, input, &basis));
    }
}

// ============================================================
// proptest: randomized summand-order invariance (P3/P5)
// ============================================================

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn permutation(n: usize) -> impl Strategy<Value = Vec<usize>> {
        Just((0..n).collect::<Vec<_>>()).prop_shuffle()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// P3: summing the same terms in any order interns to the same
        /// `PolyRef` -- hash-consing makes `+` order-independent.
        #[test]
        fn add_any_permutation_same_ref(perm in permutation(6)) {
            let mut arena = Arena::new();
            let terms: Vec<_> = (1..=6).map(|i| var_poly(&mut arena, i)).collect();

            let mut canonical = arena.zero_p();
            for &t in &terms {
                canonical = algebra::add(&mut arena, canonical, t);
            }

            let mut permuted = arena.zero_p();
            for &i in &perm {
                permuted = algebra::add(&mut arena, permuted, terms[i]);
            }

            prop_assert_eq!(canonical, permuted);
        }

        /// P5: `mono_lcm` is commutative regardless of which variable
        /// subset each side carries.
        #[test]
        fn mono_lcm_is_commutative(a_degs in prop::collection::vec(0u32..4, 3), b_degs in prop::collection::vec(0u32..4, 3)) {
            let mut arena = Arena::new();
            let vars: Vec<_> = (1..=3).map(|i| arena.node_var(i)).collect();
            let a: Vec<_> = vars.iter().zip(&a_degs).filter(|(_, &e)| e > 0).map(|(&n, &e)| (n, e)).collect();
            let b: Vec<_> = vars.iter().zip(&b_degs).filter(|(_, &e)| e > 0).map(|(&n, &e)| (n, e)).collect();
            let ma = arena.mononode(a);
            let mb = arena.mononode(b);
            let lcm_ab = algebra::mono_lcm(&mut arena, ma, mb);
            let lcm_ba = algebra::mono_lcm(&mut arena, mb, ma);
            prop_assert_eq!(lcm_ab, lcm_ba);
        }
    }
}
