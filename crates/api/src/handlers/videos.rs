//! Handlers for upload, frame retrieval, pose analysis, and deletion.
//!
//! Videos are identified by their sanitized storage filename, returned
//! from the upload call. Images travel as JPEG data URIs.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use poselab_core::analyzer::AnalysisResult;
use poselab_core::batch::BatchOutcome;
use poselab_core::pose::Keypoint;

use crate::encoding::jpeg_data_uri;
use crate::error::{core_error_parts, AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub frames: i64,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub duration: f64,
}

#[derive(Debug, Serialize)]
pub struct FrameResponse {
    pub frame_index: i64,
    /// JPEG data URI of the decoded frame.
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub frame_index: i64,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub frame_index: i64,
    pub has_pose: bool,
    pub keypoints: Vec<Keypoint>,
    /// JPEG data URI of the frame with the skeleton overlay.
    pub annotated_image: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeBatchRequest {
    pub frame_indices: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeBatchResponse {
    pub results: Vec<BatchElement>,
}

/// One element of a batch response: the analyze shape on success, or a
/// `{frame_index, error}` marker. The batch call itself still succeeds.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchElement {
    Success(AnalyzeResponse),
    Failure {
        frame_index: i64,
        error: ErrorDetail,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert a core analysis result into its wire shape.
fn analysis_response(result: AnalysisResult) -> AppResult<AnalyzeResponse> {
    let annotated_image = jpeg_data_uri(&result.annotated)?;
    Ok(AnalyzeResponse {
        frame_index: result.frame_index,
        has_pose: result.has_pose,
        keypoints: result.keypoints,
        annotated_image,
    })
}

/// Convert a batch outcome into its per-element wire shape.
fn batch_element(outcome: BatchOutcome) -> AppResult<BatchElement> {
    match outcome.result {
        Ok(result) => Ok(BatchElement::Success(analysis_response(result)?)),
        Err(err) => {
            let (_, code, message) = core_error_parts(&err);
            Ok(BatchElement::Failure {
                frame_index: outcome.frame_index,
                error: ErrorDetail { code, message },
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/upload
///
/// Accepts a multipart upload with a `video` file field, validates and
/// persists it, and returns the container metadata.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let mut payload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("video") {
            continue;
        }

        let filename = field
            .file_name()
            .map(ToString::to_string)
            .filter(|f| !f.is_empty())
            .ok_or_else(|| AppError::BadRequest("No file selected".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        payload = Some((filename, data.to_vec()));
        break;
    }

    let Some((filename, data)) = payload else {
        return Err(AppError::BadRequest(
            "Missing 'video' file field in multipart upload".to_string(),
        ));
    };

    let asset = state.store.upload(&data, &filename).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            filename: asset.filename,
            frames: asset.probe.frame_count,
            fps: asset.probe.fps,
            width: asset.probe.width,
            height: asset.probe.height,
            duration: asset.probe.duration_seconds,
        }),
    ))
}

/// GET /api/video/{filename}/frame/{index}
///
/// Decodes and returns a single frame as a JPEG data URI.
pub async fn get_frame(
    State(state): State<AppState>,
    Path((filename, index)): Path<(String, i64)>,
) -> AppResult<Json<FrameResponse>> {
    let frame = state.store.get_frame(&filename, index).await?;
    let image = jpeg_data_uri(&frame)?;

    Ok(Json(FrameResponse {
        frame_index: index,
        image,
    }))
}

/// POST /api/video/{filename}/analyze
///
/// Runs pose estimation on one frame and returns keypoints plus the
/// annotated image.
pub async fn analyze_frame(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Json(request): Json<AnalyzeRequest>,
) -> AppResult<Json<AnalyzeResponse>> {
    let frame = state.store.get_frame(&filename, request.frame_index).await?;
    let result = state.analyzer.analyze(request.frame_index, frame).await?;

    Ok(Json(analysis_response(result)?))
}

/// POST /api/video/{filename}/analyze-batch
///
/// Analyzes many frames of one video. Per-index failures are reported
/// inside the matching result element; the output always has one
/// element per requested index, in request order.
pub async fn analyze_batch(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Json(request): Json<AnalyzeBatchRequest>,
) -> AppResult<Json<AnalyzeBatchResponse>> {
    let outcomes = state
        .batch
        .analyze_batch(&filename, &request.frame_indices)
        .await?;

    let results = outcomes
        .into_iter()
        .map(batch_element)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(AnalyzeBatchResponse { results }))
}

/// DELETE /api/video/{filename}
///
/// Removes a video and its bytes. Idempotent: deleting an unknown video
/// also returns 204.
pub async fn delete_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<StatusCode> {
    state.store.delete(&filename).await?;
    Ok(StatusCode::NO_CONTENT)
}
