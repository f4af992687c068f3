//! Home registry persistence and the `workspace` / `update` actions.

use std::path::PathBuf;

use elc_common::config::{HomeRegistry, WorkspaceEntry};
use elc_common::constants::HOME_CONFIG_FILE;
use elc_common::error::{ElcError, Result};
use elc_compose::vars::VarMap;

use crate::system::System;

/// A loaded registry together with the file it came from.
#[derive(Debug, Clone)]
pub struct RegistryFile {
    /// Location of `.elc.yaml`.
    pub path: PathBuf,
    /// Parsed contents; empty when the file does not exist yet.
    pub registry: HomeRegistry,
}

impl RegistryFile {
    /// Reads `<home>/.elc.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an I/O or parse error.
    pub fn load(system: &dyn System) -> Result<Self> {
        let path = system.home_dir()?.join(HOME_CONFIG_FILE);
        let registry = if system.file_exists(&path) {
            let bytes = system.read_file(&path)?;
            HomeRegistry::from_yaml(&String::from_utf8_lossy(&bytes), &path)?
        } else {
            tracing::debug!(path = %path.display(), "home registry not found, starting empty");
            HomeRegistry::default()
        };
        Ok(Self { path, registry })
    }

    /// Rewrites the registry file.
    ///
    /// # Errors
    ///
    /// Returns a serialization or I/O error.
    pub fn save(&self, system: &dyn System) -> Result<()> {
        tracing::debug!(path = %self.path.display(), "writing home registry");
        system.write_file(&self.path, self.registry.to_yaml()?.as_bytes())
    }
}

/// Prints every registered workspace as `<name padded to 10> <path>`.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded.
pub fn list_workspaces(system: &dyn System) -> Result<()> {
    let file = RegistryFile::load(system)?;
    for ws in &file.registry.workspaces {
        system.println(&format!("{:<10} {}", ws.name, ws.path));
    }
    Ok(())
}

/// Prints the name of the active workspace.
///
/// `override_name` (from `--workspace`) takes precedence over the registry.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded.
pub fn show_current_workspace(system: &dyn System, override_name: Option<&str>) -> Result<()> {
    let file = RegistryFile::load(system)?;
    system.println(override_name.unwrap_or(&file.registry.current_workspace));
    Ok(())
}

/// Registers a workspace and rewrites the registry.
///
/// # Errors
///
/// Returns [`ElcError::Config`] if the name is taken, or an I/O error.
pub fn add_workspace(
    system: &dyn System,
    name: &str,
    path: &str,
    root_path: Option<&str>,
) -> Result<()> {
    let mut file = RegistryFile::load(system)?;
    let mut entry = WorkspaceEntry::new(name, path);
    if let Some(root) = root_path {
        entry.root_path = root.to_string();
    }
    file.registry.add(entry)?;
    file.save(system)?;
    tracing::info!(workspace = name, path, "workspace added");
    system.println(&format!("workspace '{name}' is added"));
    Ok(())
}

/// Makes `name` the active workspace and rewrites the registry.
///
/// # Errors
///
/// Returns [`ElcError::UnknownWorkspace`] or an I/O error.
pub fn select_workspace(system: &dyn System, name: &str) -> Result<()> {
    let mut file = RegistryFile::load(system)?;
    file.registry.select(name)?;
    file.save(system)?;
    tracing::info!(workspace = name, "workspace selected");
    system.println(&format!("active workspace changed to '{name}'"));
    Ok(())
}

/// Runs the registry's `update_command` through `sh -c`.
///
/// # Errors
///
/// Returns [`ElcError::Config`] when no command is configured and
/// [`ElcError::ExternalCommandFailed`] when it exits non-zero.
pub fn run_update(system: &dyn System) -> Result<()> {
    let file = RegistryFile::load(system)?;
    let command = file.registry.update_command.trim();
    if command.is_empty() {
        return Err(ElcError::Config {
            message: format!("no update_command set in {}", file.path.display()),
        });
    }
    let argv = vec!["sh".to_string(), "-c".to_string(), command.to_string()];
    tracing::info!(command, "running update command");
    let code = system.run_interactive(&argv, &VarMap::new())?;
    if code != 0 {
        return Err(ElcError::ExternalCommandFailed {
            command: command.to_string(),
            code,
        });
    }
    Ok(())
}
