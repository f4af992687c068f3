//! CLI command definitions and dispatch.

pub mod compose;
pub mod exec;
pub mod restart;
pub mod start;
pub mod stop;
pub mod update;
pub mod vars;
pub mod workspace;

use clap::{Parser, Subcommand};
use elc_common::constants::{BIN_NAME, ENV_MODE, ENV_WORKSPACE};
use elc_common::types::Mode;
use elc_runtime::context::{Context, GlobalOptions};
use elc_runtime::system::HostSystem;

/// elc — orchestrates docker compose services of a local workspace.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Dependency mode used when starting services.
    #[arg(long, global = true, env = ENV_MODE)]
    pub mode: Option<String>,

    /// Target service for `exec` and `compose`.
    #[arg(long = "svc", global = true)]
    pub svc: Option<String>,

    /// Workspace to use instead of the registry's current one.
    #[arg(long, global = true, env = ENV_WORKSPACE)]
    pub workspace: Option<String>,
}

impl Cli {
    fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            mode: Mode::from(self.mode.clone()),
            service: self.svc.clone(),
            workspace: self.workspace.clone(),
        }
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start services and the dependencies selected by `--mode`.
    Start(start::StartArgs),
    /// Stop services.
    Stop(stop::StopArgs),
    /// Stop services and remove their containers.
    Destroy(stop::DestroyArgs),
    /// Stop, then start services again.
    Restart(restart::RestartArgs),
    /// Run a command in the service's `app` container.
    Exec(exec::ExecArgs),
    /// Pass arguments through to `docker compose`.
    Compose(compose::ComposeArgs),
    /// Print the resolved variables of services.
    Vars(vars::VarsArgs),
    /// Manage registered workspaces.
    #[command(subcommand)]
    Workspace(workspace::WorkspaceCommand),
    /// Run the registry's update command.
    Update,
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!(command = ?cli.command, "dispatching");
    let system = HostSystem::new();
    let options = cli.global_options();
    match cli.command {
        Command::Start(args) => start::execute(&Context::load(&system, options)?, &args),
        Command::Stop(args) => stop::execute(&Context::load(&system, options)?, &args),
        Command::Destroy(args) => stop::destroy(&Context::load(&system, options)?, &args),
        Command::Restart(args) => restart::execute(&Context::load(&system, options)?, &args),
        Command::Exec(args) => exec::execute(&Context::load(&system, options)?, args),
        Command::Compose(args) => compose::execute(&Context::load(&system, options)?, &args),
        Command::Vars(args) => vars::execute(&Context::load(&system, options)?, &args),
        Command::Workspace(cmd) => workspace::execute(&system, &options, cmd),
        Command::Update => update::execute(&system),
    }
}
