//! `fideal`: reads a hypothesis command-language program from stdin, runs
//! it through preprocessing and Buchberger per the `--key=value` flags,
//! and prints the result.

use fideal_cli::args::Config;
use fideal_cli::batch;
use std::io::Read;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cfg = Config::from_args(std::env::args().skip(1));

    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        eprintln!(" Error: failed to read stdin");
        std::process::exit(1);
    }

    let mut results = batch::run(&input, &cfg);
    results.sort_by_key(|r| r.id);

    let mut had_output = false;
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            println!();
        }
        for line in &result.output {
            println!("{}", line);
            had_output = true;
        }
        for line in &result.errors {
            eprintln!("{}", line);
        }
    }

    if !had_output && results.iter().all(|r| r.output.is_empty()) {
        tracing::debug!("no output produced");
    }
}
