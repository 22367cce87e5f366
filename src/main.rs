use std::process::ExitCode;

use clap::Parser;
use lingo::cli::{Arguments, ExitStatus};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter for `-v` runs.
const LOG_ENV: &str = "LINGO_LOG";

fn main() -> ExitCode {
    let args = Arguments::parse();

    // Library warnings (unparsable files) always reach stderr; `-v` opens up
    // debug events, narrowed by LINGO_LOG when set.
    let filter = if args.verbose() {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("lingo=debug"))
    } else {
        EnvFilter::new("lingo=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match lingo::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
