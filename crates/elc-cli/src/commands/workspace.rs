//! `elc workspace` — Manage the home registry of workspaces.

use clap::Subcommand;
use elc_runtime::context::GlobalOptions;
use elc_runtime::registry;
use elc_runtime::system::System;

/// Registry subcommands.
#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    /// List registered workspaces.
    #[command(alias = "ls")]
    List,
    /// Register a workspace.
    Add {
        /// Unique workspace name.
        name: String,
        /// Directory containing `workspace.yaml`.
        path: String,
        /// Overrides `WORKSPACE_PATH` for this workspace.
        #[arg(long)]
        root_path: Option<String>,
    },
    /// Make a workspace the active one.
    Select {
        /// Registered workspace name.
        name: String,
    },
    /// Print the active workspace.
    Show,
}

/// Executes a `workspace` subcommand.
///
/// # Errors
///
/// Returns an error if the registry cannot be read or written, or the
/// requested change is invalid.
pub fn execute(
    system: &dyn System,
    options: &GlobalOptions,
    command: WorkspaceCommand,
) -> anyhow::Result<()> {
    match command {
        WorkspaceCommand::List => registry::list_workspaces(system)?,
        WorkspaceCommand::Add {
            name,
            path,
            root_path,
        } => registry::add_workspace(system, &name, &path, root_path.as_deref())?,
        WorkspaceCommand::Select { name } => registry::select_workspace(system, &name)?,
        WorkspaceCommand::Show => {
            registry::show_current_workspace(system, options.workspace.as_deref())?;
        }
    }
    Ok(())
}
