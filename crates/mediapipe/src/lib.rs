//! Client for an external MediaPipe pose-estimation sidecar.
//!
//! The sidecar owns the model; this crate only ships frames to it over
//! HTTP and adapts its landmark output to the core estimator trait.

pub mod api;
pub mod estimator;

pub use api::{MediaPipeApi, MediaPipeApiError};
pub use estimator::MediaPipeEstimator;
