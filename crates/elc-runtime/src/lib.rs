//! Action orchestration for elc.
//!
//! Loads the active workspace through a [`system::System`] collaborator,
//! resolves the requested services, and sequences `docker compose`
//! invocations. Every external side effect goes through the collaborator so
//! that it can be replaced in tests.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod actions;
pub mod compose;
pub mod context;
pub mod registry;
pub mod system;
