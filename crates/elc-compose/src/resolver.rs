//! Template merge and per-service resolution.
//!
//! A [`Workspace`] wraps a parsed declaration together with its resolved
//! global scope and produces one [`ResolvedService`] per requested service.
//! Resolution is a pure function of the declarations: resolving the same
//! service twice yields identical output.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use elc_common::constants::{
    COMPOSE_FILE_NAME, VAR_APP_NAME, VAR_COMPOSE_FILE, VAR_COMPOSE_PROJECT_NAME, VAR_SVC_PATH,
    VAR_TPL_PATH, VAR_WORKSPACE_NAME, VAR_WORKSPACE_PATH,
};
use elc_common::error::{ElcError, Result};

use crate::config::{EnvOverlay, ServiceSpec, TemplateSpec, WorkspaceConfig};
use crate::graph::DependencyGraph;
use crate::interpolate::{interpolate, resolve_into};
use crate::path::{clean_path, normalize_path_vars};
use crate::vars::VarMap;

/// A service with every variable and path resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedService {
    name: String,
    path: PathBuf,
    compose_file: PathBuf,
    vars: VarMap,
}

impl ResolvedService {
    /// Canonical service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding the service sources (`SVC_PATH`).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Effective compose file (`COMPOSE_FILE`).
    #[must_use]
    pub fn compose_file(&self) -> &Path {
        &self.compose_file
    }

    /// Resolved variables in emission order.
    #[must_use]
    pub const fn vars(&self) -> &VarMap {
        &self.vars
    }

    /// Looks up a single resolved variable.
    #[must_use]
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name)
    }
}

/// A loaded workspace ready to resolve services.
#[derive(Debug, Clone)]
pub struct Workspace {
    config: WorkspaceConfig,
    overlay: EnvOverlay,
    globals: VarMap,
}

impl Workspace {
    /// Resolves the global scope of `config`.
    ///
    /// `root` becomes `WORKSPACE_PATH`; the config's `name` becomes
    /// `WORKSPACE_NAME`.
    ///
    /// # Errors
    ///
    /// Returns an interpolation error if a global variable cannot be resolved.
    pub fn new(config: WorkspaceConfig, overlay: EnvOverlay, root: &str) -> Result<Self> {
        let mut globals = VarMap::new();
        globals.insert(VAR_WORKSPACE_PATH, clean_path(root));
        globals.insert(VAR_WORKSPACE_NAME, config.name.as_str());
        resolve_into(&config.variables, &mut globals)?;
        tracing::debug!(workspace = %config.name, globals = globals.len(), "resolved global scope");
        Ok(Self {
            config,
            overlay,
            globals,
        })
    }

    /// Workspace name from the declaration.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The cleaned `WORKSPACE_PATH`.
    #[must_use]
    pub fn root(&self) -> &str {
        self.globals.get(VAR_WORKSPACE_PATH).unwrap_or(".")
    }

    /// The parsed declaration.
    #[must_use]
    pub const fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Every declared service name, sorted.
    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.config.services.keys().map(String::as_str)
    }

    /// Maps a service name or alias to the canonical service name.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::UnknownService`] if `name` is neither a service
    /// nor an alias of one. Aliases of templates are not services.
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> Result<&'a str> {
        if self.config.services.contains_key(name) {
            return Ok(name);
        }
        match self.config.aliases.get(name) {
            Some(target) if self.config.services.contains_key(target) => Ok(target),
            _ => Err(ElcError::UnknownService {
                name: name.to_string(),
            }),
        }
    }

    fn service_spec<'a>(&'a self, name: &'a str) -> Result<(&'a str, &'a ServiceSpec)> {
        let canonical = self.canonical_name(name)?;
        self.config
            .services
            .get(canonical)
            .map(|spec| (canonical, spec))
            .ok_or_else(|| ElcError::UnknownService {
                name: name.to_string(),
            })
    }

    /// The template named by `extends`, which may be a template alias.
    fn template_spec(&self, spec: &ServiceSpec) -> Result<Option<&TemplateSpec>> {
        spec.extends
            .as_deref()
            .map(|name| {
                let canonical = if self.config.templates.contains_key(name) {
                    name
                } else {
                    self.config.aliases.get(name).map_or(name, String::as_str)
                };
                self.config
                    .templates
                    .get(canonical)
                    .ok_or_else(|| ElcError::UnknownTemplate {
                        name: name.to_string(),
                    })
            })
            .transpose()
    }

    /// Interpolates a path expression against the global scope, anchors it
    /// at the workspace root when relative, and cleans it.
    fn resolve_path(&self, expression: &str) -> Result<String> {
        let value = interpolate(expression, &self.globals)?;
        if Path::new(&value).is_absolute() {
            Ok(clean_path(&value))
        } else {
            Ok(clean_path(&format!("{}/{value}", self.root())))
        }
    }

    /// Resolved source directory of a service.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::UnknownService`] or an interpolation error.
    pub fn service_path(&self, name: &str) -> Result<PathBuf> {
        let (_, spec) = self.service_spec(name)?;
        self.resolve_path(&spec.path).map(PathBuf::from)
    }

    /// Finds the service whose directory contains `dir`; the deepest match wins.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::UnknownService`] if no service contains `dir`.
    pub fn service_for_dir(&self, dir: &Path) -> Result<String> {
        let dir = PathBuf::from(clean_path(&dir.to_string_lossy()));
        let mut best: Option<(usize, &str)> = None;
        for name in self.service_names() {
            let path = self.service_path(name)?;
            if !dir.starts_with(&path) {
                continue;
            }
            let depth = path.components().count();
            if best.is_none_or(|(best_depth, _)| depth > best_depth) {
                best = Some((depth, name));
            }
        }
        best.map(|(_, name)| name.to_string())
            .ok_or_else(|| ElcError::UnknownService {
                name: dir.display().to_string(),
            })
    }

    /// Resolves a service (or alias) into its final variables and paths.
    ///
    /// Emission order: ambient and global variables, `APP_NAME`,
    /// `COMPOSE_PROJECT_NAME`, `SVC_PATH`, `TPL_PATH` (when extending),
    /// `COMPOSE_FILE`, then template, service, and overlay variables.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::UnknownService`], [`ElcError::UnknownTemplate`],
    /// or an interpolation error.
    pub fn resolve(&self, name: &str) -> Result<ResolvedService> {
        let (name, spec) = self.service_spec(name)?;
        let template = self.template_spec(spec)?;

        let mut vars = self.globals.clone();
        vars.insert(VAR_APP_NAME, name);
        vars.insert(VAR_COMPOSE_PROJECT_NAME, format!("{}-{name}", self.name()));

        let svc_path = self.resolve_path(&spec.path)?;
        vars.insert(VAR_SVC_PATH, svc_path.as_str());

        let compose_dir = match template {
            Some(tpl) => {
                let tpl_path = self.resolve_path(&tpl.path)?;
                vars.insert(VAR_TPL_PATH, tpl_path.as_str());
                tpl_path
            }
            None => svc_path.clone(),
        };
        let compose_file = Path::new(&compose_dir).join(COMPOSE_FILE_NAME);
        vars.insert(VAR_COMPOSE_FILE, compose_file.display().to_string());

        let mut path_vars: BTreeSet<String> =
            self.config.path_variables.iter().cloned().collect();
        if let Some(tpl) = template {
            resolve_into(&tpl.variables, &mut vars)?;
            path_vars.extend(tpl.path_variables.iter().cloned());
        }
        resolve_into(&spec.variables, &mut vars)?;
        path_vars.extend(spec.path_variables.iter().cloned());
        resolve_into(&self.overlay.variables, &mut vars)?;
        path_vars.extend(self.overlay.path_variables.iter().cloned());

        normalize_path_vars(&mut vars, &path_vars);

        tracing::debug!(
            service = name,
            template = spec.extends.as_deref().unwrap_or("-"),
            compose_file = %compose_file.display(),
            "resolved service"
        );
        Ok(ResolvedService {
            name: name.to_string(),
            path: PathBuf::from(svc_path),
            compose_file,
            vars,
        })
    }

    /// Builds the dependency graph over every declared service.
    ///
    /// Dependency names may be aliases; they are canonicalized here.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::UnknownService`] if a dependency names no service.
    pub fn dependency_graph(&self) -> Result<DependencyGraph> {
        let mut graph = DependencyGraph::new();
        for name in self.service_names() {
            let _ = graph.add_service(name);
        }
        for (name, spec) in &self.config.services {
            let dependent = graph.add_service(name.as_str());
            for dependency in &spec.dependencies {
                let target = self.canonical_name(&dependency.name)?;
                let dependency_node = graph.add_service(target);
                graph.add_dependency(dependent, dependency_node, dependency.modes.clone());
            }
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use std::path::MAIN_SEPARATOR;

    use elc_common::types::Mode;

    use super::*;
    use crate::config::{parse_overlay, parse_workspace};

    const VARS_CONFIG: &str = r#"
name: ensi
variables:
  V_GL: vglobal
  V_GL_SIMPLE_VAR: ${V_GL}-a
  V_GL_WITH_DEFAULT: ${UNDEFINED:-default}
  V_GL_WITH_DEFAULT_VAR: ${UNDEFINED:-$V_GL}
  V_GL_PATHVAR: ./some_folder
  V_GL_PATHVAR_TWO: some_nested_folder
  V_GL_NOT_PATHVAR: ../some_folder
path_variables:
  - V_GL_PATHVAR
  - V_GL_PATHVAR_TWO
aliases:
  t1: test1
services:
  test:
    path: "${WORKSPACE_PATH}/apps/test"
    variables:
      V_IN_SVC: vinsvc
      V_IN_SVC_PATHVAR: ../some_folder_from_service
    path_variables:
      - V_IN_SVC_PATHVAR
  test1:
    path: "${WORKSPACE_PATH}/apps/test1"
    extends: tpl1
    variables:
      V_IN_SVC: vinsvc
  broken:
    path: apps/broken
    extends: missing
templates:
  tpl1:
    path: "${WORKSPACE_PATH}/templates/tpl1"
    variables:
      V_IN_TPL: vintpl
      V_IN_TPL_PATHVAR: ../some_folder_from_service
    path_variables:
      - V_IN_TPL_PATHVAR
"#;

    fn native(path: &str) -> String {
        path.replace('/', &MAIN_SEPARATOR.to_string())
    }

    fn workspace(text: &str) -> Workspace {
        let config = parse_workspace(text, Path::new("workspace.yaml")).expect("parse");
        Workspace::new(config, EnvOverlay::default(), "/ws/project1").expect("workspace")
    }

    #[test]
    fn resolves_plain_service_in_emission_order() {
        let svc = workspace(VARS_CONFIG).resolve("test").unwrap();
        let expected = [
            format!("WORKSPACE_PATH={}", native("/ws/project1")),
            "WORKSPACE_NAME=ensi".to_string(),
            "V_GL=vglobal".to_string(),
            "V_GL_SIMPLE_VAR=vglobal-a".to_string(),
            "V_GL_WITH_DEFAULT=default".to_string(),
            "V_GL_WITH_DEFAULT_VAR=vglobal".to_string(),
            "V_GL_PATHVAR=some_folder".to_string(),
            "V_GL_PATHVAR_TWO=some_nested_folder".to_string(),
            "V_GL_NOT_PATHVAR=../some_folder".to_string(),
            "APP_NAME=test".to_string(),
            "COMPOSE_PROJECT_NAME=ensi-test".to_string(),
            format!("SVC_PATH={}", native("/ws/project1/apps/test")),
            format!(
                "COMPOSE_FILE={}",
                native("/ws/project1/apps/test/docker-compose.yml")
            ),
            "V_IN_SVC=vinsvc".to_string(),
            format!("V_IN_SVC_PATHVAR={}", native("../some_folder_from_service")),
        ];
        assert_eq!(svc.vars().to_lines().collect::<Vec<_>>(), expected);
        assert_eq!(svc.compose_file(), Path::new("/ws/project1/apps/test/docker-compose.yml"));
        assert_eq!(svc.path(), Path::new("/ws/project1/apps/test"));
    }

    #[test]
    fn template_extension_keeps_service_identity() {
        let svc = workspace(VARS_CONFIG).resolve("test1").unwrap();
        let lines: Vec<_> = svc.vars().to_lines().skip(9).collect();
        assert_eq!(
            lines,
            [
                "APP_NAME=test1".to_string(),
                "COMPOSE_PROJECT_NAME=ensi-test1".to_string(),
                format!("SVC_PATH={}", native("/ws/project1/apps/test1")),
                format!("TPL_PATH={}", native("/ws/project1/templates/tpl1")),
                format!(
                    "COMPOSE_FILE={}",
                    native("/ws/project1/templates/tpl1/docker-compose.yml")
                ),
                "V_IN_TPL=vintpl".to_string(),
                format!("V_IN_TPL_PATHVAR={}", native("../some_folder_from_service")),
                "V_IN_SVC=vinsvc".to_string(),
            ]
        );
        assert_eq!(
            svc.compose_file(),
            Path::new("/ws/project1/templates/tpl1/docker-compose.yml")
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let ws = workspace(VARS_CONFIG);
        assert_eq!(ws.resolve("test1").unwrap(), ws.resolve("test1").unwrap());
    }

    #[test]
    fn alias_resolves_to_target() {
        let ws = workspace(VARS_CONFIG);
        assert_eq!(ws.resolve("t1").unwrap(), ws.resolve("test1").unwrap());
    }

    #[test]
    fn extends_accepts_template_alias() {
        let ws = workspace(
            "name: w\naliases:\n  base: tpl\nservices:\n  api:\n    path: api\n    extends: base\ntemplates:\n  tpl:\n    path: tpl\n",
        );
        let svc = ws.resolve("api").unwrap();
        assert_eq!(svc.var("TPL_PATH"), Some(native("/ws/project1/tpl").as_str()));
    }

    #[test]
    fn template_alias_is_not_a_service() {
        let ws = workspace(
            "name: w\naliases:\n  base: tpl\nservices:\n  api:\n    path: api\ntemplates:\n  tpl:\n    path: tpl\n",
        );
        let err = ws.resolve("base").unwrap_err();
        assert!(matches!(err, ElcError::UnknownService { ref name } if name == "base"));
    }

    #[test]
    fn unknown_template_reported() {
        let err = workspace(VARS_CONFIG).resolve("broken").unwrap_err();
        assert!(matches!(err, ElcError::UnknownTemplate { ref name } if name == "missing"));
    }

    #[test]
    fn unknown_service_reported() {
        let err = workspace(VARS_CONFIG).resolve("nope").unwrap_err();
        assert!(matches!(err, ElcError::UnknownService { .. }));
    }

    #[test]
    fn relative_service_path_is_anchored_at_root() {
        let ws = workspace("name: w\nservices:\n  api:\n    path: ./apps//api\n");
        assert_eq!(
            ws.service_path("api").unwrap(),
            PathBuf::from(native("/ws/project1/apps/api"))
        );
    }

    #[test]
    fn service_scope_overrides_globals() {
        let ws = workspace(
            "name: w\nvariables:\n  PORT: \"80\"\n  HOST: h\nservices:\n  api:\n    path: api\n    variables:\n      PORT: ${PORT}0\n",
        );
        let svc = ws.resolve("api").unwrap();
        assert_eq!(svc.var("PORT"), Some("800"));
        let names: Vec<_> = svc.vars().names().collect();
        assert_eq!(names.last(), Some(&"PORT"));
        assert_eq!(names.iter().filter(|n| **n == "PORT").count(), 1);
    }

    #[test]
    fn service_variables_may_use_computed_values() {
        let ws = workspace(
            "name: w\nservices:\n  api:\n    path: api\n    variables:\n      CONTAINER: ${COMPOSE_PROJECT_NAME}_app\n",
        );
        assert_eq!(ws.resolve("api").unwrap().var("CONTAINER"), Some("w-api_app"));
    }

    #[test]
    fn overlay_wins_over_service_values() {
        let config = parse_workspace(
            "name: w\nvariables:\n  DB: global\nservices:\n  api:\n    path: api\n    variables:\n      DB: service\n",
            Path::new("workspace.yaml"),
        )
        .unwrap();
        let overlay = parse_overlay(
            "variables:\n  DB: overlay-${DB}\n  CACHE: ./tmp/cache\npath_variables: [CACHE]\n",
            Path::new("env.yaml"),
        )
        .unwrap();
        let ws = Workspace::new(config, overlay, "/ws").unwrap();
        let svc = ws.resolve("api").unwrap();
        assert_eq!(svc.var("DB"), Some("overlay-service"));
        assert_eq!(svc.var("CACHE"), Some(native("tmp/cache").as_str()));
    }

    #[test]
    fn undefined_global_fails_workspace_load() {
        let config = parse_workspace("name: w\nvariables:\n  A: ${B}\n", Path::new("workspace.yaml"))
            .unwrap();
        let err = Workspace::new(config, EnvOverlay::default(), "/ws").unwrap_err();
        assert!(matches!(err, ElcError::UndefinedVariable { ref name } if name == "B"));
    }

    #[test]
    fn finds_service_for_directory() {
        let ws = workspace(VARS_CONFIG);
        assert_eq!(
            ws.service_for_dir(Path::new("/ws/project1/apps/test1/src")).unwrap(),
            "test1"
        );
        assert_eq!(
            ws.service_for_dir(Path::new("/ws/project1/apps/test")).unwrap(),
            "test"
        );
        assert!(ws.service_for_dir(Path::new("/elsewhere")).is_err());
    }

    #[test]
    fn deepest_service_directory_wins() {
        let ws = workspace(
            "name: w\nservices:\n  outer:\n    path: apps\n  inner:\n    path: apps/inner\n",
        );
        assert_eq!(
            ws.service_for_dir(Path::new("/ws/project1/apps/inner/x")).unwrap(),
            "inner"
        );
        assert_eq!(
            ws.service_for_dir(Path::new("/ws/project1/apps/other")).unwrap(),
            "outer"
        );
    }

    #[test]
    fn graph_canonicalizes_alias_dependencies() {
        let ws = workspace(
            "name: w\naliases:\n  db: postgres\nservices:\n  postgres:\n    path: pg\n  api:\n    path: api\n    dependencies:\n      db: [default]\n",
        );
        let graph = ws.dependency_graph().unwrap();
        assert_eq!(
            graph.startup_order("api", &Mode::new("default")).unwrap(),
            ["postgres", "api"]
        );
    }

    #[test]
    fn graph_rejects_unknown_dependency() {
        let ws = workspace(
            "name: w\nservices:\n  api:\n    path: api\n    dependencies:\n      ghost: [default]\n",
        );
        assert!(matches!(
            ws.dependency_graph(),
            Err(ElcError::UnknownService { ref name }) if name == "ghost"
        ));
    }
}
