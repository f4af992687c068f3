//! `elc update` — Run the registry's update command.

use elc_runtime::registry;
use elc_runtime::system::System;

/// Executes the `update` command.
///
/// # Errors
///
/// Returns an error if no update command is configured or it exits non-zero.
pub fn execute(system: &dyn System) -> anyhow::Result<()> {
    registry::run_update(system)?;
    Ok(())
}
