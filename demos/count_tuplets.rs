//! Count primes and prime k-tuplets over a range.
//!
//! ```text
//! cargo run --release --example count_tuplets -- [START] STOP [THREADS]
//! RUST_LOG=primecraft=debug cargo run --example count_tuplets -- 1e9
//! ```

use primecraft::{PrimeSieveBuilder, TupletKind};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn setup_logging(directives: &str) {
    let main_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives)))
        .with(main_layer)
        .init()
}

/// Accepts plain integers and `1e9`-style powers of ten.
fn parse_number(arg: &str) -> Option<u64> {
    match arg.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => {
            let mantissa: u64 = mantissa.parse().ok()?;
            let exponent: u32 = exponent.parse().ok()?;
            mantissa.checked_mul(10u64.checked_pow(exponent)?)
        }
        None => arg.replace('_', "").parse().ok(),
    }
}

fn main() -> ExitCode {
    setup_logging("primecraft=info");

    let args: Vec<u64> = match std::env::args().skip(1).map(|a| parse_number(&a)).collect() {
        Some(args) => args,
        None => {
            eprintln!("usage: count_tuplets [START] STOP [THREADS]");
            return ExitCode::FAILURE;
        }
    };
    let (start, stop, threads) = match args.as_slice() {
        [] => (0, 1_000_000_000, None),
        [stop] => (0, *stop, None),
        [start, stop] => (*start, *stop, None),
        [start, stop, threads, ..] => (*start, *stop, Some(*threads as usize)),
    };

    let mut builder = PrimeSieveBuilder::new().range(start, stop).count_all().status(true);
    if let Some(threads) = threads {
        builder = builder.threads(threads);
    }

    let summary = match builder.build().and_then(|sieve| sieve.run()) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    for kind in TupletKind::ALL {
        println!("{:<18} {}", format!("{}:", kind.name()), summary.counts[kind]);
    }
    println!("{:<18} {:.3} s", "seconds:", summary.seconds);
    ExitCode::SUCCESS
}
