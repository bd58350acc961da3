//! Integration test utilities for the forum server
//!
//! Helpers for running end-to-end tests against the REST API, either a
//! server already listening at `TEST_SERVER_URL` or one started in-process.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
