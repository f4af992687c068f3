//! `docker compose` invocations for a resolved service.
//!
//! Argument vectors are assembled here; running them is delegated to the
//! [`System`] collaborator. The service's resolved variables are passed as
//! the child's environment so that the compose file can reference them.

use std::path::Path;

use elc_common::constants::{APP_CONTAINER, COMPOSE_COMMAND, VAR_GROUP_ID, VAR_USER_ID};
use elc_common::error::{ElcError, Result};
use elc_compose::resolver::ResolvedService;
use elc_compose::vars::VarMap;

use crate::system::System;

/// Builds `docker compose -f <compose_file> <args...>`.
#[must_use]
pub fn compose_args<S: AsRef<str>>(compose_file: &Path, args: &[S]) -> Vec<String> {
    COMPOSE_COMMAND
        .iter()
        .map(|s| (*s).to_string())
        .chain(["-f".to_string(), compose_file.display().to_string()])
        .chain(args.iter().map(|a| a.as_ref().to_string()))
        .collect()
}

/// Builds `docker compose -f <file> exec [-u <user>] [-T] app <command...>`.
///
/// `-T` disables pseudo-terminal allocation and is placed right before the
/// container role.
#[must_use]
pub fn exec_args(
    compose_file: &Path,
    user: Option<&str>,
    tty: bool,
    command: &[String],
) -> Vec<String> {
    let mut args = vec!["exec".to_string()];
    if let Some(user) = user {
        args.push("-u".into());
        args.push(user.into());
    }
    if !tty {
        args.push("-T".into());
    }
    args.push(APP_CONTAINER.into());
    args.extend(command.iter().cloned());
    compose_args(compose_file, &args)
}

/// Chooses the `-u` argument for `exec`.
///
/// Explicit ids win (`uid` or `uid:gid`). Missing ids fall back to the
/// service's `USER_ID` / `GROUP_ID` variables. `None` omits the flag.
///
/// # Errors
///
/// Returns [`ElcError::Config`] when a group id is given but no user id is
/// known.
pub fn exec_user(uid: Option<u32>, gid: Option<u32>, vars: &VarMap) -> Result<Option<String>> {
    let Some(user) = uid
        .map(|u| u.to_string())
        .or_else(|| vars.get(VAR_USER_ID).map(str::to_string))
    else {
        return match gid {
            Some(g) => Err(ElcError::Config {
                message: format!("--gid {g} needs --uid or a {VAR_USER_ID} variable"),
            }),
            None => Ok(None),
        };
    };
    Ok(Some(match gid {
        Some(g) => format!("{user}:{g}"),
        None if uid.is_some() => user,
        None => match vars.get(VAR_GROUP_ID) {
            Some(g) => format!("{user}:{g}"),
            None => user,
        },
    }))
}

fn ensure_success(argv: &[String], code: i32) -> Result<()> {
    if code == 0 {
        Ok(())
    } else {
        Err(ElcError::ExternalCommandFailed {
            command: argv.join(" "),
            code,
        })
    }
}

/// A resolved service bound to the collaborator that runs its commands.
pub struct ComposeService<'a> {
    system: &'a dyn System,
    service: &'a ResolvedService,
}

impl<'a> ComposeService<'a> {
    /// Binds `service` to `system`.
    #[must_use]
    pub fn new(system: &'a dyn System, service: &'a ResolvedService) -> Self {
        Self { system, service }
    }

    fn args<S: AsRef<str>>(&self, args: &[S]) -> Vec<String> {
        compose_args(self.service.compose_file(), args)
    }

    fn run(&self, argv: &[String]) -> Result<()> {
        let code = self.system.run_interactive(argv, self.service.vars())?;
        ensure_success(argv, code)
    }

    /// Returns `true` if any container of the project is running.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::ExternalCommandFailed`] if the probe fails.
    pub fn is_running(&self) -> Result<bool> {
        let argv = self.args(&["ps", "--status=running", "-q"]);
        let out = self.system.run_captured(&argv, self.service.vars())?;
        ensure_success(&argv, out.code)?;
        Ok(!out.stdout.trim().is_empty())
    }

    /// Runs `up -d` unless the service is already running.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::ExternalCommandFailed`] on a non-zero exit.
    pub fn start(&self) -> Result<()> {
        if self.is_running()? {
            tracing::info!(service = self.service.name(), "already running");
            return Ok(());
        }
        tracing::info!(service = self.service.name(), "starting");
        self.run(&self.args(&["up", "-d"]))
    }

    /// Runs `stop` if the service is running.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::ExternalCommandFailed`] on a non-zero exit.
    pub fn stop(&self) -> Result<()> {
        if !self.is_running()? {
            tracing::info!(service = self.service.name(), "not running");
            return Ok(());
        }
        tracing::info!(service = self.service.name(), "stopping");
        self.run(&self.args(&["stop"]))
    }

    /// Runs `down` if the service is running.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::ExternalCommandFailed`] on a non-zero exit.
    pub fn destroy(&self) -> Result<()> {
        if !self.is_running()? {
            tracing::info!(service = self.service.name(), "not running");
            return Ok(());
        }
        tracing::info!(service = self.service.name(), "destroying");
        self.run(&self.args(&["down"]))
    }

    /// Runs `command` inside the `app` container.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::ExternalCommandFailed`] with the command's exit code.
    pub fn exec(&self, user: Option<&str>, tty: bool, command: &[String]) -> Result<()> {
        tracing::info!(service = self.service.name(), cmd = ?command, tty, "exec");
        self.run(&exec_args(self.service.compose_file(), user, tty, command))
    }

    /// Forwards arbitrary arguments to `docker compose`.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::ExternalCommandFailed`] on a non-zero exit.
    pub fn passthrough(&self, args: &[String]) -> Result<()> {
        tracing::info!(service = self.service.name(), args = ?args, "compose passthrough");
        self.run(&self.args(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> &'static Path {
        Path::new("/ws/apps/test/docker-compose.yml")
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn builds_probe_vector() {
        assert_eq!(
            compose_args(file(), &["ps", "--status=running", "-q"]),
            strings(&[
                "docker",
                "compose",
                "-f",
                "/ws/apps/test/docker-compose.yml",
                "ps",
                "--status=running",
                "-q",
            ])
        );
    }

    #[test]
    fn exec_with_terminal_has_no_t_flag() {
        let argv = exec_args(file(), Some("1000:1000"), true, &strings(&["some", "command"]));
        assert_eq!(
            argv[4..],
            strings(&["exec", "-u", "1000:1000", "app", "some", "command"])
        );
    }

    #[test]
    fn exec_without_terminal_inserts_t_before_app() {
        let argv = exec_args(file(), Some("1000:1000"), false, &strings(&["ls"]));
        assert_eq!(argv[4..], strings(&["exec", "-u", "1000:1000", "-T", "app", "ls"]));
    }

    #[test]
    fn exec_without_user_omits_flag() {
        let argv = exec_args(file(), None, false, &strings(&["ls"]));
        assert_eq!(argv[4..], strings(&["exec", "-T", "app", "ls"]));
    }

    #[test]
    fn explicit_uid_wins_over_variables() {
        let vars: VarMap = [("USER_ID", "1000"), ("GROUP_ID", "1000")].into_iter().collect();
        assert_eq!(exec_user(Some(1001), None, &vars).unwrap().as_deref(), Some("1001"));
        assert_eq!(exec_user(Some(1001), Some(50), &vars).unwrap().as_deref(), Some("1001:50"));
    }

    #[test]
    fn user_falls_back_to_variables() {
        let vars: VarMap = [("USER_ID", "1000"), ("GROUP_ID", "1000")].into_iter().collect();
        assert_eq!(exec_user(None, None, &vars).unwrap().as_deref(), Some("1000:1000"));
        assert_eq!(exec_user(None, Some(7), &vars).unwrap().as_deref(), Some("1000:7"));

        let only_user: VarMap = [("USER_ID", "42")].into_iter().collect();
        assert_eq!(exec_user(None, None, &only_user).unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn no_ids_anywhere_omits_user() {
        assert_eq!(exec_user(None, None, &VarMap::new()).unwrap(), None);
    }

    #[test]
    fn group_without_user_is_rejected() {
        let err = exec_user(None, Some(5), &VarMap::new()).unwrap_err();
        assert!(matches!(err, ElcError::Config { .. }));
    }

    #[test]
    fn non_zero_exit_is_external_failure() {
        let argv = strings(&["docker", "compose", "up"]);
        let err = ensure_success(&argv, 2).unwrap_err();
        assert!(matches!(err, ElcError::ExternalCommandFailed { code: 2, .. }));
        assert!(ensure_success(&argv, 0).is_ok());
    }
}
