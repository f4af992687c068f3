//! `elc vars` — Print resolved service variables.

use clap::Args;
use elc_runtime::actions;
use elc_runtime::context::Context;

/// Arguments for the `vars` command.
#[derive(Args, Debug)]
pub struct VarsArgs {
    /// Services or aliases to print. Defaults to the current directory's service.
    pub services: Vec<String>,
}

/// Executes the `vars` command.
///
/// # Errors
///
/// Returns an error if resolution fails.
pub fn execute(ctx: &Context<'_>, args: &VarsArgs) -> anyhow::Result<()> {
    actions::print_vars(ctx, &args.services)?;
    Ok(())
}
