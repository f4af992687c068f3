//! # elc-compose
//!
//! Resolution engine for elc workspaces.
//!
//! Handles:
//! - **Config**: Loading of `workspace.yaml` and `env.yaml` declarations.
//! - **Vars**: Order-preserving variable collections.
//! - **Interpolate**: `${NAME}` / `${NAME:-DEFAULT}` expression evaluation.
//! - **Path**: Lexical cleaning of path variables.
//! - **Resolver**: Template merge and per-service resolution.
//! - **Graph**: Mode-tagged dependency graph and startup ordering.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod graph;
pub mod interpolate;
pub mod path;
pub mod resolver;
pub mod vars;
