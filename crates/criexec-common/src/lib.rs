//! # criexec-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the entire criexec workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the container projections, label selectors
//! and error taxonomy that the bridge and the runtime client build upon.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
