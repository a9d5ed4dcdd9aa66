//! REST API client for the pose-estimation sidecar.
//!
//! Wraps the sidecar's single detection endpoint using [`reqwest`].
//! Frames are shipped as base64 JPEG in a JSON body; the sidecar
//! answers with normalized landmarks, or `null` when no person is in
//! the frame.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

/// HTTP client for a single pose-estimation sidecar instance.
pub struct MediaPipeApi {
    client: reqwest::Client,
    api_url: String,
}

/// One landmark as reported by the sidecar, in normalized image
/// coordinates.
#[derive(Debug, Deserialize)]
pub struct LandmarkDto {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visibility: f64,
}

/// Response from the sidecar's `/pose` endpoint.
#[derive(Debug, Deserialize)]
struct DetectResponse {
    /// `None` when no person was detected.
    landmarks: Option<Vec<LandmarkDto>>,
}

/// Errors from the sidecar REST layer.
#[derive(Debug, thiserror::Error)]
pub enum MediaPipeApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The sidecar returned a non-2xx status code.
    #[error("pose sidecar error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl MediaPipeApi {
    /// Create an API client for a sidecar instance.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://127.0.0.1:9090`.
    /// * `timeout` - Per-request ceiling; the model's latency is
    ///   otherwise unbounded.
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, MediaPipeApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_url })
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Run pose detection on a JPEG-encoded frame.
    ///
    /// Returns `Ok(None)` when the sidecar reports no person in frame.
    pub async fn detect_pose(
        &self,
        jpeg: &[u8],
    ) -> Result<Option<Vec<LandmarkDto>>, MediaPipeApiError> {
        let body = serde_json::json!({
            "image": BASE64.encode(jpeg),
        });

        let response = self
            .client
            .post(format!("{}/pose", self.api_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaPipeApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: DetectResponse = response.json().await?;
        Ok(parsed.landmarks)
    }
}
