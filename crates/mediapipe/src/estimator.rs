//! [`PoseEstimator`] implementation backed by the sidecar API.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use image::RgbImage;
use poselab_core::analyzer::{EstimatorError, PoseEstimator};
use poselab_core::pose::NormalizedLandmark;

use crate::api::{MediaPipeApi, MediaPipeApiError};

/// Pose estimator that ships frames to the MediaPipe sidecar.
pub struct MediaPipeEstimator {
    api: MediaPipeApi,
}

impl MediaPipeEstimator {
    /// Connect to the sidecar at `api_url` with a per-request `timeout`.
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, MediaPipeApiError> {
        Ok(Self {
            api: MediaPipeApi::new(api_url, timeout)?,
        })
    }
}

#[async_trait]
impl PoseEstimator for MediaPipeEstimator {
    async fn estimate(
        &self,
        image: &RgbImage,
    ) -> Result<Option<Vec<NormalizedLandmark>>, EstimatorError> {
        let mut jpeg = Cursor::new(Vec::new());
        image
            .write_to(&mut jpeg, image::ImageFormat::Jpeg)
            .map_err(|e| EstimatorError(format!("failed to encode frame: {e}")))?;

        let landmarks = self
            .api
            .detect_pose(jpeg.get_ref())
            .await
            .map_err(|e| EstimatorError(e.to_string()))?;

        Ok(landmarks.map(|lms| {
            lms.into_iter()
                .map(|l| NormalizedLandmark {
                    x: l.x,
                    y: l.y,
                    z: l.z,
                    visibility: l.visibility,
                })
                .collect()
        }))
    }
}
