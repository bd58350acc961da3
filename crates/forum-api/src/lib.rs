//! # forum-api
//!
//! HTTP surface of the forum: axum router, extractors, middleware stack,
//! and the error-to-response mapping.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
