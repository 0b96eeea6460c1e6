//! navms HTTP server
//!
//! This crate hosts the resolution core behind a catch-all axum
//! handler: every request, whatever its method or outcome, terminates
//! in a 302.

pub mod config;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::AppState;
