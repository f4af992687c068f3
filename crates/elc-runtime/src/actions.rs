//! Service actions: start, stop, destroy, restart, exec, compose passthrough,
//! and variable printing.
//!
//! Every action plans first and executes second. Target names, the dependency
//! closure and each [`ResolvedService`] are computed before the first external
//! process is issued, so configuration errors never leave half-applied work.
//! Execution is sequential and stops at the first failing command.

use elc_common::error::{ElcError, Result};
use elc_compose::resolver::ResolvedService;

use crate::compose::{ComposeService, exec_user};
use crate::context::Context;

/// How `stop`-like actions tear a service down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// `docker compose stop`.
    Stop,
    /// `docker compose down`.
    Destroy,
}

/// Options for [`exec_command`].
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Command and arguments to run in the `app` container.
    pub command: Vec<String>,
    /// Explicit user id.
    pub uid: Option<u32>,
    /// Explicit group id.
    pub gid: Option<u32>,
}

fn resolve_all(ctx: &Context<'_>, names: &[String]) -> Result<Vec<ResolvedService>> {
    names
        .iter()
        .map(|name| ctx.workspace().resolve(name))
        .collect()
}

/// Startup sequence for `targets` under the context's mode.
fn start_plan(ctx: &Context<'_>, targets: &[String]) -> Result<Vec<ResolvedService>> {
    let graph = ctx.workspace().dependency_graph()?;
    let order = graph.startup_plan(targets, &ctx.options().mode)?;
    tracing::debug!(plan = ?order, mode = %ctx.options().mode, "computed startup plan");
    resolve_all(ctx, &order)
}

fn run_start(ctx: &Context<'_>, plan: &[ResolvedService]) -> Result<()> {
    for service in plan {
        ComposeService::new(ctx.system(), service).start()?;
    }
    Ok(())
}

fn run_teardown(ctx: &Context<'_>, plan: &[ResolvedService], teardown: Teardown) -> Result<()> {
    for service in plan {
        let compose = ComposeService::new(ctx.system(), service);
        match teardown {
            Teardown::Stop => compose.stop()?,
            Teardown::Destroy => compose.destroy()?,
        }
    }
    Ok(())
}

/// Starts `names` (or the service containing the current directory) along
/// with the dependencies selected by the mode.
///
/// # Errors
///
/// Returns a resolution error before any process runs, or
/// [`ElcError::ExternalCommandFailed`] from the first failing command.
pub fn start_services(ctx: &Context<'_>, names: &[String]) -> Result<()> {
    let targets = ctx.targets(names)?;
    let plan = start_plan(ctx, &targets)?;
    tracing::info!(targets = ?targets, services = plan.len(), "start");
    run_start(ctx, &plan)
}

/// Stops or destroys `names`, or every declared service when `all` is set.
///
/// Teardown never cascades to dependencies.
///
/// # Errors
///
/// Same as [`start_services`].
pub fn stop_services(
    ctx: &Context<'_>,
    names: &[String],
    all: bool,
    teardown: Teardown,
) -> Result<()> {
    let targets = if all {
        ctx.all_services()
    } else {
        ctx.targets(names)?
    };
    let plan = resolve_all(ctx, &targets)?;
    tracing::info!(targets = ?targets, ?teardown, "teardown");
    run_teardown(ctx, &plan, teardown)
}

/// Starts `names` through the dependency cascade, then tears the targets
/// themselves down.
///
/// `hard` destroys instead of stopping. Teardown never reaches dependencies.
///
/// # Errors
///
/// Same as [`start_services`].
pub fn restart_services(ctx: &Context<'_>, names: &[String], hard: bool) -> Result<()> {
    let targets = ctx.targets(names)?;
    let start = start_plan(ctx, &targets)?;
    let teardown_plan = resolve_all(ctx, &targets)?;
    let teardown = if hard {
        Teardown::Destroy
    } else {
        Teardown::Stop
    };
    tracing::info!(targets = ?targets, ?teardown, "restart");
    run_start(ctx, &start)?;
    run_teardown(ctx, &teardown_plan, teardown)
}

/// Starts the target service, then runs a command in its `app` container.
///
/// The target is `--svc` or the service containing the current directory.
///
/// # Errors
///
/// Returns [`ElcError::Config`] for an empty command or a group id without
/// any user id, a resolution error, or
/// [`ElcError::ExternalCommandFailed`] carrying the command's exit code.
pub fn exec_command(ctx: &Context<'_>, options: &ExecOptions) -> Result<()> {
    if options.command.is_empty() {
        return Err(ElcError::Config {
            message: "exec requires a command".into(),
        });
    }
    let target = ctx.single_target()?;
    let plan = start_plan(ctx, std::slice::from_ref(&target))?;
    let service = ctx.workspace().resolve(&target)?;
    let user = exec_user(options.uid, options.gid, service.vars())?;

    run_start(ctx, &plan)?;
    let tty = ctx.system().is_terminal();
    ComposeService::new(ctx.system(), &service).exec(user.as_deref(), tty, &options.command)
}

/// Forwards `args` to `docker compose` for the target service, or for every
/// declared service when `all` is set.
///
/// # Errors
///
/// Same as [`start_services`].
pub fn compose_command(ctx: &Context<'_>, args: &[String], all: bool) -> Result<()> {
    let targets = if all {
        ctx.all_services()
    } else {
        vec![ctx.single_target()?]
    };
    let plan = resolve_all(ctx, &targets)?;
    for service in &plan {
        ComposeService::new(ctx.system(), service).passthrough(args)?;
    }
    Ok(())
}

/// Prints `NAME=value` for every resolved variable of each target.
///
/// # Errors
///
/// Returns a resolution error.
pub fn print_vars(ctx: &Context<'_>, names: &[String]) -> Result<()> {
    let targets = ctx.targets(names)?;
    let plan = resolve_all(ctx, &targets)?;
    for service in &plan {
        tracing::debug!(service = service.name(), vars = service.vars().len(), "printing vars");
        for line in service.vars().to_lines() {
            ctx.system().println(&line);
        }
    }
    Ok(())
}
