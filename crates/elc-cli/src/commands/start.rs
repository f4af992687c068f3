//! `elc start` — Start services along with their mode dependencies.

use clap::Args;
use elc_runtime::actions;
use elc_runtime::context::Context;

/// Arguments for the `start` command.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Services or aliases to start. Defaults to the current directory's service.
    pub services: Vec<String>,
}

/// Executes the `start` command.
///
/// # Errors
///
/// Returns an error if resolution fails or a compose command exits non-zero.
pub fn execute(ctx: &Context<'_>, args: &StartArgs) -> anyhow::Result<()> {
    actions::start_services(ctx, &args.services)?;
    Ok(())
}
