//! Static validation of a parsed workspace declaration.
//!
//! Checks alias targets and name collisions before any resolution happens.
//! Dangling `extends` and dependency references are reported lazily by the
//! resolver, for the services that are actually requested.

use elc_common::error::{ElcError, Result};

use super::WorkspaceConfig;

/// Validates a parsed workspace for semantic correctness.
///
/// # Checks performed
///
/// 1. Every alias targets a declared service or template.
/// 2. No alias shadows a service or template name.
/// 3. No template shares a name with a service.
///
/// # Errors
///
/// Returns an error if any semantic check fails.
pub fn validate(config: &WorkspaceConfig) -> Result<()> {
    check_alias_targets(config)?;
    check_name_collisions(config)?;
    Ok(())
}

fn check_alias_targets(config: &WorkspaceConfig) -> Result<()> {
    for (alias, target) in &config.aliases {
        if !config.services.contains_key(target) && !config.templates.contains_key(target) {
            tracing::debug!(alias, target, "alias points nowhere");
            return Err(ElcError::UnknownService {
                name: target.clone(),
            });
        }
    }
    Ok(())
}

fn check_name_collisions(config: &WorkspaceConfig) -> Result<()> {
    for alias in config.aliases.keys() {
        if config.services.contains_key(alias) || config.templates.contains_key(alias) {
            return Err(ElcError::Config {
                message: format!("alias \"{alias}\" shadows a service or template"),
            });
        }
    }
    if let Some(name) = config
        .templates
        .keys()
        .find(|name| config.services.contains_key(*name))
    {
        return Err(ElcError::Config {
            message: format!("\"{name}\" is declared as both a service and a template"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServiceSpec, TemplateSpec};

    fn workspace() -> WorkspaceConfig {
        let mut config = WorkspaceConfig::default();
        let _ = config.services.insert("api".into(), ServiceSpec::default());
        let _ = config.templates.insert("php".into(), TemplateSpec::default());
        config
    }

    #[test]
    fn valid_aliases_pass() {
        let mut config = workspace();
        let _ = config.aliases.insert("a".into(), "api".into());
        let _ = config.aliases.insert("p".into(), "php".into());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn dangling_alias_is_unknown_service() {
        let mut config = workspace();
        let _ = config.aliases.insert("a".into(), "missing".into());
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ElcError::UnknownService { ref name } if name == "missing"));
    }

    #[test]
    fn alias_shadowing_service_rejected() {
        let mut config = workspace();
        let _ = config.aliases.insert("api".into(), "php".into());
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("shadows"), "got: {err}");
    }

    #[test]
    fn template_service_collision_rejected() {
        let mut config = workspace();
        let _ = config.templates.insert("api".into(), TemplateSpec::default());
        assert!(validate(&config).is_err());
    }
}
