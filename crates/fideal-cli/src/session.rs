//! One hypothesis session: owns an `Arena`, the running hypothesis list,
//! and drives parsing, preprocessing, and Buchberger for a single batch id
//! (one arena per id, never shared across threads).

use crate::args::Config;
use crate::error::ParseError;
use crate::format;
use crate::parser::{self, Command};
use crate::scramble;
use fideal_core::{algebra, buchberger, preprocess, Arena, Deadline, PolyRef};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

pub struct Session {
    pub arena: Arena,
    pub hypotheses: Vec<PolyRef>,
    pub output: Vec<String>,
    pub errors: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            arena: Arena::new(),
            hypotheses: Vec::new(),
            output: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Feed one line of the command language. Returns `true` once `end`/`e`
    /// has been consumed (the caller should stop feeding this session).
    pub fn feed_line(&mut self, line: &str, cfg: &Config, rng: &mut StdRng) -> bool {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return false;
        }
        match parser::parse_command(&mut self.arena, trimmed) {
            Ok(Command::End) => true,
            Ok(Command::Hyp(sides)) => {
                self.add_hypothesis(sides, cfg, rng);
                false
            }
            Ok(Command::Sub { hyp_index, var, expr }) => {
                match self.hypothesis_at(hyp_index) {
                    Some(h) => {
                        let result = algebra::subs_var(&mut self.arena, h, var, expr);
                        self.push_taken(result, cfg, rng);
                    }
                    None => self.report_missing_hyp(hyp_index),
                }
                false
            }
            Ok(Command::App { hyp_index, expr }) => {
                match self.hypothesis_at(hyp_index) {
                    Some(h) => {
                        let result = algebra::apply_func(&mut self.arena, h, expr);
                        self.push_taken(result, cfg, rng);
                    }
                    None => self.report_missing_hyp(hyp_index),
                }
                false
            }
            Err(e) => {
                self.errors.push(e.render(trimmed));
                false
            }
        }
    }

    fn hypothesis_at(&self, one_based: u32) -> Option<PolyRef> {
        let idx = one_based.checked_sub(1)? as usize;
        self.hypotheses.get(idx).copied()
    }

    fn report_missing_hyp(&mut self, idx: u32) {
        let e = ParseError::new(
            format!("no hypothesis h{} (only {} taken)", idx, self.hypotheses.len()),
            crate::token::Span::new(0, 0),
        );
        self.errors.push(e.render(""));
    }

    /// `hyp` command: for `expr_0 = expr_1 = ...`, add `expr_k - expr_0` for
    /// each `k >= 1`; for a single expression, add it as-is.
    fn add_hypothesis(&mut self, sides: Vec<PolyRef>, cfg: &Config, rng: &mut StdRng) {
        if sides.len() == 1 {
            self.push_taken(sides[0], cfg, rng);
            return;
        }
        for k in 1..sides.len() {
            let diff = algebra::sub(&mut self.arena, sides[k], sides[0]);
            self.push_taken(diff, cfg, rng);
        }
    }

    fn push_taken(&mut self, h: PolyRef, cfg: &Config, rng: &mut StdRng) {
        let index = self.hypotheses.len() + 1;
        self.hypotheses.push(h);
        if cfg.pretty {
            self.output.push(format!("h{}: {}", index, format::format_polynode(&self.arena, h)));
        }
        if cfg.randomize {
            self.output.push(format!(
                "h{}: {}",
                index,
                scramble::scramble(&self.arena, h, rng)
            ));
        }
    }

    /// Run preprocessing (if `cfg.simplify >= 1`) and Buchberger (if
    /// `cfg.groebner`), appending their output lines.
    pub fn finish(&mut self, cfg: &Config) {
        let mut generators = self.hypotheses.clone();
        if cfg.simplify > 0 {
            generators = preprocess::expand(&mut self.arena, &self.hypotheses, cfg.simplify);
            self.output.push(format!("Expanded to {} hypotheses (level {}).", generators.len(), cfg.simplify));
            for (i, h) in generators.iter().enumerate() {
                self.output.push(format!("s{}: {}", i + 1, format::format_polynode(&self.arena, *h)));
            }
        }

        if !cfg.groebner {
            return;
        }

        let start = Instant::now();
        let deadline = Deadline::after(Duration::from_millis(cfg.simplify_timeout_ms));
        let (mut basis, finished) = buchberger::buchberger(&mut self.arena, &generators, deadline);
        let elapsed = start.elapsed();

        if finished {
            self.output.push("Finished.".to_string());
        } else {
            self.output.push(format!("Terminated after {}ms.", elapsed.as_millis()));
        }

        basis.sort_by_key(|&p| self.arena.poly_derived(p).stats.weight);
        for (i, p) in basis.iter().enumerate() {
            self.output.push(format::format_basis_line(&self.arena, i, *p));
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_cfg() -> Config {
        Config {
            groebner: true,
            pretty: true,
            randomize: false,
            simplify: 0,
            simplify_timeout_ms: 5_000,
            batch_size: 1,
            threads: 1,
        }
    }

    #[test]
    fn s1_single_linear_hypothesis() {
        let mut session = Session::new();
        let cfg = new_cfg();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(!session.feed_line("hyp x1 - x2", &cfg, &mut rng));
        assert!(session.feed_line("end", &cfg, &mut rng));
        session.finish(&cfg);
        assert!(session.output.iter().any(|l| l.starts_with("b1")));
        assert_eq!(session.hypotheses.len(), 1);
    }

    #[test]
    fn sub_zero_collapses_the_factor_it_annihilates() {
        // hyp x1 + f(x2*x1 + x3) - f(2*x1)*f(x3)*x2, then x2 -> 0: the
        // x2-carrying summand vanishes and x2*x1 inside the f(...) argument
        // drops out, leaving x1 + f(x3).
        let mut session = Session::new();
        let cfg = new_cfg();
        let mut rng = StdRng::seed_from_u64(0);
        session.feed_line(
            "hyp x1 + f(x2 x1 + x3) - f(2 x1) f(x3) x2",
            &cfg,
            &mut rng,
        );
        session.feed_line("sub h1 x2 0", &cfg, &mut rng);
        session.feed_line("end", &cfg, &mut rng);
        assert_eq!(session.hypotheses.len(), 2);

        let x1 = {
            let n = session.arena.node_var(1);
            let m = session.arena.mononode(vec![(n, 1)]);
            session.arena.polynode(vec![(m, fideal_core::Q::one())])
        };
        let x3 = {
            let n = session.arena.node_var(3);
            let m = session.arena.mononode(vec![(n, 1)]);
            session.arena.polynode(vec![(m, fideal_core::Q::one())])
        };
        let f_x3_node = session.arena.node_fun(x3);
        let f_x3_m = session.arena.mononode(vec![(f_x3_node, 1)]);
        let f_x3 = session.arena.polynode(vec![(f_x3_m, fideal_core::Q::one())]);
        let expected = algebra::add(&mut session.arena, x1, f_x3);
        assert_eq!(session.hypotheses[1], expected);
    }

    #[test]
    fn sub_on_missing_hypothesis_is_reported_as_error() {
        let mut session = Session::new();
        let cfg = new_cfg();
        let mut rng = StdRng::seed_from_u64(0);
        session.feed_line("sub h7 x1 0", &cfg, &mut rng);
        assert_eq!(session.hypotheses.len(), 0);
        assert!(!session.errors.is_empty());
    }

    #[test]
    fn app_uses_apply_func_definition() {
        let mut session = Session::new();
        let cfg = new_cfg();
        let mut rng = StdRng::seed_from_u64(0);
        session.feed_line("hyp x1 - x2", &cfg, &mut rng);
        session.feed_line("app h1 x3", &cfg, &mut rng);
        assert_eq!(session.hypotheses.len(), 2);
        let expected = algebra::apply_func(&mut session.arena, session.hypotheses[0], {
            let n = session.arena.node_var(3);
            let m = session.arena.mononode(vec![(n, 1)]);
            session.arena.polynode(vec![(m, fideal_core::Q::one())])
        });
        assert_eq!(session.hypotheses[1], expected);
    }
}
