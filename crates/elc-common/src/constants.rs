//! System-wide constants: file names, computed variable names, and the
//! compose invocation prefix.

/// Binary name for the CLI.
pub const BIN_NAME: &str = "elc";

/// Home registry file name, relative to the user's home directory.
pub const HOME_CONFIG_FILE: &str = ".elc.yaml";

/// Workspace declaration file, located in the workspace root.
pub const WORKSPACE_CONFIG_FILE: &str = "workspace.yaml";

/// Optional environment overlay, next to [`WORKSPACE_CONFIG_FILE`].
pub const ENV_OVERLAY_FILE: &str = "env.yaml";

/// Compose definition file name inside a service or template directory.
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

/// Container role targeted by `exec`.
pub const APP_CONTAINER: &str = "app";

/// Program and subcommand prefix for every compose invocation.
pub const COMPOSE_COMMAND: [&str; 2] = ["docker", "compose"];

/// Ambient variable holding the workspace root path.
pub const VAR_WORKSPACE_PATH: &str = "WORKSPACE_PATH";
/// Ambient variable holding the workspace name.
pub const VAR_WORKSPACE_NAME: &str = "WORKSPACE_NAME";
/// Computed variable holding the service name.
pub const VAR_APP_NAME: &str = "APP_NAME";
/// Computed variable holding the compose project namespace.
pub const VAR_COMPOSE_PROJECT_NAME: &str = "COMPOSE_PROJECT_NAME";
/// Computed variable holding the service's own path.
pub const VAR_SVC_PATH: &str = "SVC_PATH";
/// Computed variable holding the extended template's path.
pub const VAR_TPL_PATH: &str = "TPL_PATH";
/// Computed variable holding the effective compose file.
pub const VAR_COMPOSE_FILE: &str = "COMPOSE_FILE";
/// Variable consulted for the default exec user id.
pub const VAR_USER_ID: &str = "USER_ID";
/// Variable consulted for the default exec group id.
pub const VAR_GROUP_ID: &str = "GROUP_ID";

/// Environment variable that selects the active dependency mode.
pub const ENV_MODE: &str = "ELC_MODE";
/// Environment variable that overrides the current workspace.
pub const ENV_WORKSPACE: &str = "ELC_WORKSPACE";
