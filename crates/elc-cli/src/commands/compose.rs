//! `elc compose` — Pass arguments through to `docker compose`.

use clap::Args;
use elc_runtime::actions;
use elc_runtime::context::Context;

/// Arguments for the `compose` command.
#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// Run for every service of the workspace.
    #[arg(long)]
    pub all: bool,

    /// Arguments forwarded to `docker compose -f <file>`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub args: Vec<String>,
}

/// Executes the `compose` command.
///
/// # Errors
///
/// Returns an error if resolution fails or `docker compose` exits non-zero.
pub fn execute(ctx: &Context<'_>, args: &ComposeArgs) -> anyhow::Result<()> {
    actions::compose_command(ctx, &args.args, args.all)?;
    Ok(())
}
