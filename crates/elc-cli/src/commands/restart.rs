//! `elc restart` — Tear services down and start them again.

use clap::Args;
use elc_runtime::actions;
use elc_runtime::context::Context;

/// Arguments for the `restart` command.
#[derive(Args, Debug)]
pub struct RestartArgs {
    /// Services or aliases to restart. Defaults to the current directory's service.
    pub services: Vec<String>,

    /// Destroy containers instead of stopping them.
    #[arg(long)]
    pub hard: bool,
}

/// Executes the `restart` command.
///
/// # Errors
///
/// Returns an error if resolution fails or a compose command exits non-zero.
pub fn execute(ctx: &Context<'_>, args: &RestartArgs) -> anyhow::Result<()> {
    actions::restart_services(ctx, &args.services, args.hard)?;
    Ok(())
}
