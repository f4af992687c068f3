//! # elc — local development environment orchestrator
//!
//! Resolves workspace declarations into per-service variables and drives
//! `docker compose` to start, stop, and exec into services.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod commands;

use std::process::ExitCode;

use clap::Parser;
use elc_common::error::ElcError;

use crate::commands::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match commands::execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<ElcError>().map_or(1, ElcError::exit_code);
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Error: {err:#}");
            }
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
