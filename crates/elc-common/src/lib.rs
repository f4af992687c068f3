//! # elc-common
//!
//! Shared error definitions, constants, the dependency [`types::Mode`], and
//! the home-registry model used across the entire elc workspace.
//!
//! This crate is the leaf of the dependency graph and depends on no other
//! internal crate.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
