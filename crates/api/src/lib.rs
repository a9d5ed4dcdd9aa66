//! Poselab API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes)
//! so integration tests and the binary entrypoint can both access them.

pub mod config;
pub mod encoding;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
