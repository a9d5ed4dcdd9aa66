use std::sync::Arc;

use poselab_core::analyzer::FrameAnalyzer;
use poselab_core::batch::BatchCoordinator;
use poselab_core::store::VideoStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Uploaded-video store (asset table + persisted bytes).
    pub store: Arc<VideoStore>,
    /// Single-frame pose analyzer.
    pub analyzer: Arc<FrameAnalyzer>,
    /// Batch analysis coordinator.
    pub batch: Arc<BatchCoordinator>,
}
