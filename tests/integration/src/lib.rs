//! Integration test utilities for the tube server
//!
//! Helpers for running end-to-end tests against the REST API.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
