//! Integration test utilities for the planning poker server
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST endpoints and room WebSockets of an in-process server.

pub mod fixtures;
pub mod helpers;
pub mod ws;

pub use fixtures::*;
pub use helpers::*;
pub use ws::*;
