//! Workspace declaration loader.
//!
//! Parses `workspace.yaml` and the optional `env.yaml` overlay into
//! structured declarations, then runs static validation.

pub mod validator;

use std::collections::BTreeMap;
use std::path::Path;

use elc_common::error::{ElcError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::vars::{OrderedEntries, VarMap};

/// Root node of a parsed `workspace.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceConfig {
    /// Workspace name, exported as `WORKSPACE_NAME`.
    #[serde(default)]
    pub name: String,
    /// Global variables in declaration order.
    #[serde(default)]
    pub variables: VarMap,
    /// Names of global variables subject to path cleaning.
    #[serde(default)]
    pub path_variables: Vec<String>,
    /// Services keyed by name.
    #[serde(default)]
    pub services: BTreeMap<String, ServiceSpec>,
    /// Templates keyed by name.
    #[serde(default)]
    pub templates: BTreeMap<String, TemplateSpec>,
    /// Alias to service or template name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// A `services.<name>` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSpec {
    /// Path expression of the service sources.
    #[serde(default)]
    pub path: String,
    /// Service-scope variables.
    #[serde(default)]
    pub variables: VarMap,
    /// Service-scope path variables.
    #[serde(default)]
    pub path_variables: Vec<String>,
    /// Template this service extends.
    #[serde(default)]
    pub extends: Option<String>,
    /// Dependencies in declaration order.
    #[serde(default, deserialize_with = "deserialize_dependencies")]
    pub dependencies: Vec<Dependency>,
}

/// A `templates.<name>` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateSpec {
    /// Path expression of the directory holding the shared compose file.
    #[serde(default)]
    pub path: String,
    /// Template-scope variables.
    #[serde(default)]
    pub variables: VarMap,
    /// Template-scope path variables.
    #[serde(default)]
    pub path_variables: Vec<String>,
}

/// A dependency edge declared by a service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependency {
    /// Service or alias depended upon.
    pub name: String,
    /// Modes under which the edge participates; empty means never.
    pub modes: Vec<String>,
}

/// Contents of the optional `env.yaml` overlay.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvOverlay {
    /// Overlay variables; evaluated after every other scope.
    #[serde(default)]
    pub variables: VarMap,
    /// Overlay path variables.
    #[serde(default)]
    pub path_variables: Vec<String>,
}

fn deserialize_dependencies<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<Dependency>, D::Error> {
    let raw = deserializer.deserialize_any(OrderedEntries::<Option<Vec<String>>>::new())?;
    Ok(raw
        .into_iter()
        .map(|(name, modes)| Dependency {
            name,
            modes: modes.unwrap_or_default(),
        })
        .collect())
}

fn parse_yaml<T: DeserializeOwned + Default>(text: &str, path: &Path) -> Result<T> {
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(text).map_err(|e| ElcError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parses and validates a `workspace.yaml` document.
///
/// `path` is only used for diagnostics.
///
/// # Errors
///
/// Returns [`ElcError::ConfigParse`] on malformed YAML and the validator's
/// error on semantic problems.
pub fn parse_workspace(text: &str, path: &Path) -> Result<WorkspaceConfig> {
    tracing::debug!(path = %path.display(), "parsing workspace config");
    let config: WorkspaceConfig = parse_yaml(text, path)?;
    validator::validate(&config)?;
    Ok(config)
}

/// Parses an `env.yaml` overlay.
///
/// # Errors
///
/// Returns [`ElcError::ConfigParse`] on malformed YAML.
pub fn parse_overlay(text: &str, path: &Path) -> Result<EnvOverlay> {
    tracing::debug!(path = %path.display(), "parsing environment overlay");
    parse_yaml(text, path)
}
