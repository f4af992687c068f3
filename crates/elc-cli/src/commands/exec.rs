//! `elc exec` — Execute a command inside a service's `app` container.

use clap::Args;
use elc_runtime::actions::{self, ExecOptions};
use elc_runtime::context::Context;

/// Arguments for the `exec` command.
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// User id to run the command as.
    #[arg(long)]
    pub uid: Option<u32>,

    /// Group id to run the command as.
    #[arg(long)]
    pub gid: Option<u32>,

    /// Command to execute.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub command: Vec<String>,
}

/// Executes the `exec` command.
///
/// Starts the target service first, then runs the command, forwarding the
/// caller's terminal.
///
/// # Errors
///
/// Returns an error if resolution fails or the command exits non-zero; the
/// command's exit code becomes the process exit code.
pub fn execute(ctx: &Context<'_>, args: ExecArgs) -> anyhow::Result<()> {
    let options = ExecOptions {
        command: args.command,
        uid: args.uid,
        gid: args.gid,
    };
    actions::exec_command(ctx, &options)?;
    Ok(())
}
