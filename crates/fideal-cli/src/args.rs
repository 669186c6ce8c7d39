//! Hand-rolled `--key=value` CLI surface.
//!
//! Not `clap`: unknown keys must warn and continue rather than abort, which
//! doesn't fit `clap`'s derive model cleanly, and the grammar is small
//! enough that a direct parser is the more honest representation of it.

use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub groebner: bool,
    pub pretty: bool,
    pub randomize: bool,
    pub simplify: u8,
    pub simplify_timeout_ms: u64,
    pub batch_size: u32,
    pub threads: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            groebner: true,
            pretty: true,
            randomize: false,
            simplify: 0,
            simplify_timeout_ms: 60_000,
            batch_size: 1,
            threads: 1,
        }
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(v.to_lowercase().as_str(), "true" | "1" | "yes")
}

impl Config {
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Config {
        let mut cfg = Config::default();
        for arg in args {
            let Some(rest) = arg.strip_prefix("--") else {
                warn!(arg = %arg, "ignoring argument without a -- prefix");
                continue;
            };
            let Some((key, value)) = rest.split_once('=') else {
                warn!(arg = %arg, "ignoring argument without a key=value form");
                continue;
            };
            match key {
                "groebner" => cfg.groebner = is_truthy(value),
                "pretty" => cfg.pretty = is_truthy(value),
                "randomize" | "rand" => cfg.randomize = is_truthy(value),
                "simplify" | "simp" => cfg.simplify = value.parse().unwrap_or(0).min(2),
                "simplify_timeout" | "simp_timeout" => {
                    cfg.simplify_timeout_ms = value.parse().unwrap_or(60_000)
                }
                "batch_size" => cfg.batch_size = value.parse().unwrap_or(1),
                "threads" => cfg.threads = value.parse::<u32>().unwrap_or(1).max(1),
                other => warn!(key = %other, "unrecognised option, ignoring"),
            }
        }
        cfg
    }
}
