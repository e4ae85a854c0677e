//! physverse CLI - headless simulation runner.

use std::process::ExitCode;

use physverse::cli::{run_cli, Args};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("physverse=warn"))
        .init();
    run_cli(Args::parse())
}
