//! Video decode capability seam.
//!
//! The store talks to video containers only through [`VideoDecoder`],
//! so tests can substitute an in-memory implementation and the
//! production path can shell out to ffmpeg. Decoding is treated as an
//! opaque external capability with its own failure modes.

use std::path::Path;

use async_trait::async_trait;
use image::RgbImage;

use crate::ffmpeg::{self, FfmpegError};

/// Container metadata extracted when a video is first seen.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VideoProbe {
    /// Total decodable frames.
    pub frame_count: i64,
    /// Frames per second.
    pub fps: f64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Container duration in seconds.
    pub duration_seconds: f64,
}

/// Errors from the decode capability.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not a decodable video container.
    #[error("not a decodable video: {0}")]
    InvalidFormat(String),

    /// The container is valid but the requested frame could not be produced.
    #[error("failed to decode frame {index}: {detail}")]
    FrameUnavailable { index: i64, detail: String },

    /// The decode tool itself failed (missing binary, I/O, crash).
    #[error("decoder failure: {0}")]
    Tool(String),
}

/// A capability that can probe containers and decode single frames.
#[async_trait]
pub trait VideoDecoder: Send + Sync {
    /// Validate that `path` holds a decodable video and return its metadata.
    async fn probe(&self, path: &Path) -> Result<VideoProbe, DecodeError>;

    /// Decode the frame at `index` (0-based) into an RGB buffer.
    ///
    /// The index is assumed range-checked by the caller; the decoder may
    /// still fail on damaged containers.
    async fn read_frame(
        &self,
        path: &Path,
        probe: &VideoProbe,
        index: i64,
    ) -> Result<RgbImage, DecodeError>;
}

/// Production decoder backed by the ffmpeg/ffprobe CLI tools.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegDecoder;

#[async_trait]
impl VideoDecoder for FfmpegDecoder {
    async fn probe(&self, path: &Path) -> Result<VideoProbe, DecodeError> {
        let output = ffmpeg::probe_video(path).await.map_err(probe_error)?;

        let (width, height) = ffmpeg::parse_resolution(&output);
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidFormat(
                "container has no video stream".to_string(),
            ));
        }

        let frame_count = ffmpeg::parse_total_frames(&output);
        if frame_count <= 0 {
            return Err(DecodeError::InvalidFormat(
                "video stream has no decodable frames".to_string(),
            ));
        }

        Ok(VideoProbe {
            frame_count,
            fps: ffmpeg::parse_framerate(&output),
            width,
            height,
            duration_seconds: ffmpeg::parse_duration(&output),
        })
    }

    async fn read_frame(
        &self,
        path: &Path,
        probe: &VideoProbe,
        index: i64,
    ) -> Result<RgbImage, DecodeError> {
        // Timestamp-based seek: the same addressing the original capture
        // interface exposes. fps <= 0 degenerates to the first frame.
        let timestamp = if probe.fps > 0.0 {
            index as f64 / probe.fps
        } else {
            0.0
        };

        let raw = ffmpeg::extract_frame_rgb24(path, timestamp, probe.width, probe.height)
            .await
            .map_err(|e| match e {
                FfmpegError::NotFound(io) => DecodeError::Tool(io.to_string()),
                FfmpegError::IoError(io) => DecodeError::Tool(io.to_string()),
                other => DecodeError::FrameUnavailable {
                    index,
                    detail: other.to_string(),
                },
            })?;

        RgbImage::from_raw(probe.width, probe.height, raw).ok_or(DecodeError::FrameUnavailable {
            index,
            detail: "frame buffer size mismatch".to_string(),
        })
    }
}

/// Classify a probe-time ffmpeg error.
///
/// An ffprobe that runs but rejects the input means the payload is not a
/// video; a missing binary or I/O failure is a tool problem.
fn probe_error(err: FfmpegError) -> DecodeError {
    match err {
        FfmpegError::NotFound(io) => DecodeError::Tool(io.to_string()),
        FfmpegError::IoError(io) => DecodeError::Tool(io.to_string()),
        other => DecodeError::InvalidFormat(other.to_string()),
    }
}
