//! Per-invocation context: the active workspace and global options.
//!
//! All configuration files are read exactly once, up front, before any
//! service is resolved or any external process is issued.

use std::path::{Path, PathBuf};

use elc_common::constants::{ENV_OVERLAY_FILE, WORKSPACE_CONFIG_FILE};
use elc_common::error::Result;
use elc_common::types::Mode;
use elc_compose::config::{self, EnvOverlay};
use elc_compose::resolver::Workspace;

use crate::registry::RegistryFile;
use crate::system::System;

/// Options shared by every service action.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Dependency mode filtering start cascades.
    pub mode: Mode,
    /// Explicit target for single-service actions (`exec`, `compose`).
    pub service: Option<String>,
    /// Workspace to use instead of the registry's current one.
    pub workspace: Option<String>,
}

/// Everything a service action needs, loaded once per invocation.
pub struct Context<'a> {
    system: &'a dyn System,
    options: GlobalOptions,
    workspace: Workspace,
    cwd: PathBuf,
}

impl<'a> Context<'a> {
    /// Loads the home registry, the active workspace's `workspace.yaml`, and
    /// its optional `env.yaml` overlay.
    ///
    /// # Errors
    ///
    /// Returns an I/O, parse, or resolution error from any of those files.
    pub fn load(system: &'a dyn System, options: GlobalOptions) -> Result<Self> {
        let registry = RegistryFile::load(system)?;
        let entry = registry.registry.workspace(options.workspace.as_deref())?;
        let cwd = system.current_dir()?;

        let root = Path::new(&entry.path);
        let config_path = root.join(WORKSPACE_CONFIG_FILE);
        let text = read_text(system, &config_path)?;
        let config = config::parse_workspace(&text, &config_path)?;

        let overlay_path = root.join(ENV_OVERLAY_FILE);
        let overlay = if system.file_exists(&overlay_path) {
            config::parse_overlay(&read_text(system, &overlay_path)?, &overlay_path)?
        } else {
            EnvOverlay::default()
        };

        tracing::info!(
            workspace = %entry.name,
            path = %entry.path,
            mode = %options.mode,
            "loaded workspace"
        );
        let workspace = Workspace::new(config, overlay, entry.root())?;
        Ok(Self {
            system,
            options,
            workspace,
            cwd,
        })
    }

    /// The collaborator used for all side effects.
    #[must_use]
    pub fn system(&self) -> &'a dyn System {
        self.system
    }

    /// Global options for this invocation.
    #[must_use]
    pub const fn options(&self) -> &GlobalOptions {
        &self.options
    }

    /// The resolved workspace.
    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Canonical targets for `names`; with no names, the service containing
    /// the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`elc_common::error::ElcError::UnknownService`] for unknown
    /// names or when no service contains the current directory.
    pub fn targets(&self, names: &[String]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Ok(vec![self.workspace.service_for_dir(&self.cwd)?]);
        }
        names
            .iter()
            .map(|name| self.workspace.canonical_name(name).map(str::to_string))
            .collect()
    }

    /// Single target for `exec` and `compose`: `--svc` or the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::targets`].
    pub fn single_target(&self) -> Result<String> {
        match self.options.service.as_deref() {
            Some(name) => self.workspace.canonical_name(name).map(str::to_string),
            None => self.workspace.service_for_dir(&self.cwd),
        }
    }

    /// Every declared service, sorted by name.
    #[must_use]
    pub fn all_services(&self) -> Vec<String> {
        self.workspace.service_names().map(str::to_string).collect()
    }
}

fn read_text(system: &dyn System, path: &Path) -> Result<String> {
    let bytes = system.read_file(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
