//! Prime Sieve Benchmark Harness
//! Compares: bit sieve (full, √n cutoff, parallel) vs `primal` vs `primes`
//!
//! Usage: cargo run --release --bin sieve-bench -- [SIZES...] [--iterations N]

use anyhow::bail;
use bitsieve::bench::{self, BenchResult};
use bitsieve::report::{format_bytes, format_with_commas};
use clap::Parser;

#[derive(Debug, Parser)]
#[clap(version, about = "Benchmark the bit sieve against the primal and primes crates")]
struct Args {
    /// Bounds to benchmark
    #[arg(value_name = "SIZES", default_values_t = [10_000, 100_000, 1_000_000, 10_000_000])]
    sizes: Vec<usize>,

    /// Timed runs per implementation and size
    #[arg(long, short = 'i', default_value_t = 25)]
    iterations: usize,

    /// Workers for the parallel bit sieve
    #[arg(long, short = 'w', default_value_t = 4)]
    workers: usize,
}

fn main() -> anyhow::Result<()> {
    bitsieve::init_tracing();
    let args = Args::parse();
    if args.iterations == 0 || args.workers == 0 {
        bail!("iterations and workers must both be at least 1");
    }

    println!("🦀 Prime Sieve Benchmark 🦀");
    println!("{}", "━".repeat(100));
    println!();

    for &n in &args.sizes {
        if n < 2 {
            bail!("size must be greater than 1, got {}", n);
        }
        let iterations = args.iterations;
        let workers = args.workers;
        let bit_bytes = bench::bitsieve_bytes(n);

        println!(
            "┌─ n = {} ({} iterations) ─────────────────────────────────────────",
            format_with_commas(n as u64),
            iterations
        );
        println!("│");
        println!("{}", bench::header());

        let results = vec![
            bench::bench("bitsieve (full)", n, iterations, bit_bytes, bench::bitsieve_count)?,
            bench::bench("bitsieve (√n cutoff)", n, iterations, bit_bytes, bench::bitsieve_sqrt_count)?,
            bench::bench(
                &format!("bitsieve ({} workers)", workers),
                n,
                iterations,
                bit_bytes,
                |n| bench::bitsieve_parallel_count(n, workers),
            )?,
            bench::bench("primal (Sieve::new)", n, iterations, n / 8, bench::primal_count)?,
            bench::bench("primes crate (iter)", n, iterations, 0, bench::primes_crate_count)?,
        ];
        for result in &results {
            println!("{}", result);
        }

        if let Some((a, b)) = bench::find_mismatch(&results) {
            bail!(
                "MISMATCH at n={}: {}={} vs {}={}",
                n,
                a.name,
                a.prime_count,
                b.name,
                b.prime_count
            );
        }

        println!("│");
        println!(
            "│  π({}) = {}   │  All implementations agree ✓",
            format_with_commas(n as u64 - 1),
            format_with_commas(results[0].prime_count as u64)
        );
        print_speedups(&results);
        println!("│");
        println!("└──────────────────────────────────────────────────────────────────");
        println!();
    }

    if let Some(&n) = args.sizes.iter().max() {
        println!("📊 Memory @ n={}", format_with_commas(n as u64));
        let bytes = bench::bitsieve_bytes(n);
        println!("  bit array:          {:>10}", format_bytes(bytes));
        println!("  naive bool array:   {:>10} (comparison)", format_bytes(n));
        println!("  compression ratio:  {:>10.0}x vs naive", n as f64 / bytes as f64);
        println!();
    }

    println!("✓ Benchmark complete!");
    Ok(())
}

fn print_speedups(results: &[BenchResult]) {
    let Some(fastest) = results.iter().map(BenchResult::median).min() else {
        return;
    };
    for result in results {
        let ratio = result.median().as_nanos() as f64 / fastest.as_nanos().max(1) as f64;
        if ratio <= 1.01 {
            println!("│  {} : fastest 🏆", result.name);
        } else {
            println!("│  {} : {:.2}x slower", result.name, ratio);
        }
    }
}
