//! Home registry model: the list of known workspaces and the active one.
//!
//! Stored as YAML at `<home>/.elc.yaml` and rewritten wholesale whenever a
//! workspace is added or selected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ElcError, Result};

/// A registered workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceEntry {
    /// Workspace name used by `workspace select`.
    pub name: String,
    /// Directory containing `workspace.yaml`.
    pub path: String,
    /// Optional override for `WORKSPACE_PATH`; empty when unused.
    #[serde(default)]
    pub root_path: String,
}

impl WorkspaceEntry {
    /// Creates an entry without a root path override.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            root_path: String::new(),
        }
    }

    /// The directory exported as `WORKSPACE_PATH`.
    #[must_use]
    pub fn root(&self) -> &str {
        if self.root_path.is_empty() {
            &self.path
        } else {
            &self.root_path
        }
    }
}

/// Root document of the home registry file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeRegistry {
    /// Name of the active workspace.
    #[serde(default)]
    pub current_workspace: String,
    /// Shell command run by `elc update`.
    #[serde(default)]
    pub update_command: String,
    /// Registered workspaces in insertion order.
    #[serde(default)]
    pub workspaces: Vec<WorkspaceEntry>,
}

impl HomeRegistry {
    /// Parses a registry document. Blank input yields an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::ConfigParse`] if the YAML is malformed.
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| ElcError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Renders the registry, keeping declared key order and writing empty
    /// root paths as `root_path: ""`.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::Config`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        let text = serde_yaml::to_string(self).map_err(|e| ElcError::Config {
            message: format!("failed to serialize home registry: {e}"),
        })?;
        let mut out = String::with_capacity(text.len());
        for line in text.lines() {
            if line.trim_start() == "root_path: ''" {
                let indent = line.len() - line.trim_start().len();
                out.push_str(&line[..indent]);
                out.push_str("root_path: \"\"");
            } else {
                out.push_str(line);
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Looks up a workspace by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&WorkspaceEntry> {
        self.workspaces.iter().find(|w| w.name == name)
    }

    /// Returns the workspace named `name`, or the current one when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::UnknownWorkspace`] if no such workspace is registered.
    pub fn workspace(&self, name: Option<&str>) -> Result<&WorkspaceEntry> {
        let name = name.unwrap_or(&self.current_workspace);
        if name.is_empty() {
            return Err(ElcError::Config {
                message: "no workspace selected; run `elc workspace add` first".into(),
            });
        }
        self.find(name).ok_or_else(|| ElcError::UnknownWorkspace {
            name: name.to_string(),
        })
    }

    /// Registers a new workspace. The first workspace added becomes current.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::Config`] if the name is already registered.
    pub fn add(&mut self, entry: WorkspaceEntry) -> Result<()> {
        if self.find(&entry.name).is_some() {
            return Err(ElcError::Config {
                message: format!("workspace '{}' already exists", entry.name),
            });
        }
        if self.current_workspace.is_empty() {
            self.current_workspace.clone_from(&entry.name);
        }
        self.workspaces.push(entry);
        Ok(())
    }

    /// Marks `name` as the active workspace.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::UnknownWorkspace`] if no such workspace is registered.
    pub fn select(&mut self, name: &str) -> Result<()> {
        if self.find(name).is_none() {
            return Err(ElcError::UnknownWorkspace {
                name: name.to_string(),
            });
        }
        self.current_workspace = name.to_string();
        Ok(())
    }
}
