//! Batch fan-out: split stdin into independent problems, each
//! terminated by its own `end`/`e`, and run up to `cfg.threads` of them
//! concurrently -- one `Session` (and so one `Arena`) per id, never shared
//! across threads. Output is flushed in ascending id order regardless of
//! completion order.

use crate::args::Config;
use crate::session::Session;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

pub struct IdResult {
    pub id: usize,
    pub output: Vec<String>,
    pub errors: Vec<String>,
}

/// Split `input` into up to `cfg.batch_size` chunks, each chunk's lines
/// running until (and including) its own terminating `end`/`e` line.
pub fn split_batches(input: &str, batch_size: u32) -> Vec<Vec<String>> {
    let mut batches = Vec::new();
    let mut current = Vec::new();
    for line in input.lines() {
        let is_terminator = {
            let t = line.trim().to_lowercase();
            t == "end" || t == "e"
        };
        current.push(line.to_string());
        if is_terminator {
            batches.push(std::mem::take(&mut current));
            if batches.len() as u32 >= batch_size.max(1) {
                break;
            }
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

pub fn run(input: &str, cfg: &Config) -> Vec<IdResult> {
    let batches = split_batches(input, cfg.batch_size);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.threads as usize)
        .build()
        .expect("failed to build worker thread pool");

    pool.install(|| {
        batches
            .into_par_iter()
            .enumerate()
            .map(|(id, lines)| {
                let mut session = Session::new();
                let mut rng = StdRng::seed_from_u64(id as u64);
                for line in &lines {
                    if session.feed_line(line, cfg, &mut rng) {
                        break;
                    }
                }
                session.finish(cfg);
                IdResult {
                    id,
                    output: session.output,
                    errors: session.errors,
                }
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_end_terminator() {
        let input = "hyp x1 - x2\nend\nhyp x3\ne\n";
        let batches = split_batches(input, 2);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0], vec!["hyp x1 - x2", "end"]);
        assert_eq!(batches[1], vec!["hyp x3", "e"]);
    }

    #[test]
    fn respects_batch_size_cap() {
        let input = "hyp x1\nend\nhyp x2\nend\nhyp x3\nend\n";
        let batches = split_batches(input, 1);
        assert_eq!(batches.len(), 1);
    }

    #[test]
    fn run_preserves_ascending_id_order() {
        let input = "hyp x1\nend\nhyp x2\nend\n";
        let cfg = Config {
            threads: 2,
            batch_size: 2,
            ..Config::default()
        };
        let results = run(input, &cfg);
        let ids: Vec<usize> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
