//! Count the primes below a bound and report how long it took.
//!
//! Usage: bitsieve [BOUND] [--workers N] [--sqrt-cutoff]

use bitsieve::config::{Cli, SieveConfig};
use bitsieve::report::{self, RunReport};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    bitsieve::init_tracing();

    let cli = Cli::parse();
    let config = SieveConfig::from(&cli);

    println!("{}", RunReport::startup_line(config.bound));
    let report = report::timed_run(&config)?;
    println!("{}", report.elapsed_line());
    println!("{}", report.count_line());

    Ok(())
}
