//! Single-frame pose analysis.
//!
//! The pose estimator is an external capability behind a trait; the
//! analyzer turns its normalized landmarks into pixel keypoints and an
//! annotated frame. "No person in frame" is a normal outcome, not an
//! error.

use std::sync::Arc;

use async_trait::async_trait;
use image::RgbImage;

use crate::annotate;
use crate::error::CoreError;
use crate::pose::{Keypoint, NormalizedLandmark};

/// Failure reported by a pose estimation capability.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct EstimatorError(pub String);

/// External pose-estimation capability.
#[async_trait]
pub trait PoseEstimator: Send + Sync {
    /// Detect a pose in the frame.
    ///
    /// Returns `Ok(None)` when no person is detected; landmarks are in
    /// normalized `[0,1]` image coordinates, in topology order.
    async fn estimate(
        &self,
        image: &RgbImage,
    ) -> Result<Option<Vec<NormalizedLandmark>>, EstimatorError>;
}

/// Result of analyzing one frame.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// The requested frame index.
    pub frame_index: i64,
    /// Whether a pose was detected.
    pub has_pose: bool,
    /// Pixel-space keypoints; empty when no pose was detected.
    pub keypoints: Vec<Keypoint>,
    /// The frame with the skeleton overlay (the unmodified frame when
    /// nothing was detected).
    pub annotated: RgbImage,
}

/// Runs pose estimation on decoded frames and renders the overlay.
pub struct FrameAnalyzer {
    estimator: Arc<dyn PoseEstimator>,
}

impl FrameAnalyzer {
    pub fn new(estimator: Arc<dyn PoseEstimator>) -> Self {
        Self { estimator }
    }

    /// Analyze a single decoded frame.
    ///
    /// Capability failures surface as [`CoreError::AnalysisFailed`] with
    /// the underlying cause.
    pub async fn analyze(
        &self,
        frame_index: i64,
        frame: RgbImage,
    ) -> Result<AnalysisResult, CoreError> {
        let landmarks = self
            .estimator
            .estimate(&frame)
            .await
            .map_err(|e| CoreError::AnalysisFailed(e.to_string()))?;

        let Some(landmarks) = landmarks else {
            return Ok(AnalysisResult {
                frame_index,
                has_pose: false,
                keypoints: Vec::new(),
                annotated: frame,
            });
        };

        let (width, height) = frame.dimensions();
        let keypoints: Vec<Keypoint> = landmarks
            .iter()
            .map(|lm| Keypoint::from_normalized(lm, width, height))
            .collect();

        let mut annotated = frame;
        annotate::draw_pose(&mut annotated, &keypoints);

        Ok(AnalysisResult {
            frame_index,
            has_pose: true,
            keypoints,
            annotated,
        })
    }
}
