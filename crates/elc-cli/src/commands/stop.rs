//! `elc stop` / `elc destroy` — Tear services down.

use clap::Args;
use elc_runtime::actions::{self, Teardown};
use elc_runtime::context::Context;

/// Arguments for the `stop` command.
#[derive(Args, Debug)]
pub struct StopArgs {
    /// Services or aliases to stop. Defaults to the current directory's service.
    pub services: Vec<String>,

    /// Stop every service of the workspace.
    #[arg(long)]
    pub all: bool,

    /// Remove containers instead of stopping them.
    #[arg(long)]
    pub destroy: bool,
}

/// Arguments for the `destroy` command.
#[derive(Args, Debug)]
pub struct DestroyArgs {
    /// Services or aliases to destroy. Defaults to the current directory's service.
    pub services: Vec<String>,

    /// Destroy every service of the workspace.
    #[arg(long)]
    pub all: bool,
}

/// Executes the `stop` command.
///
/// # Errors
///
/// Returns an error if resolution fails or a compose command exits non-zero.
pub fn execute(ctx: &Context<'_>, args: &StopArgs) -> anyhow::Result<()> {
    let teardown = if args.destroy {
        Teardown::Destroy
    } else {
        Teardown::Stop
    };
    actions::stop_services(ctx, &args.services, args.all, teardown)?;
    Ok(())
}

/// Executes the `destroy` command.
///
/// # Errors
///
/// Returns an error if resolution fails or a compose command exits non-zero.
pub fn destroy(ctx: &Context<'_>, args: &DestroyArgs) -> anyhow::Result<()> {
    actions::stop_services(ctx, &args.services, args.all, Teardown::Destroy)?;
    Ok(())
}
