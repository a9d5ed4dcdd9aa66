//! Shared test harness: an app built with in-memory stub capabilities
//! (decoder + estimator) around a temp-dir video store, plus request
//! helpers.
//!
//! Mirrors the router construction in `main.rs` so integration tests
//! exercise the same middleware stack (CORS, request ID, timeout,
//! tracing, panic recovery) that production uses.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use image::{Rgb, RgbImage};
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use poselab_api::config::ServerConfig;
use poselab_api::routes;
use poselab_api::state::AppState;
use poselab_core::analyzer::{EstimatorError, FrameAnalyzer, PoseEstimator};
use poselab_core::batch::BatchCoordinator;
use poselab_core::decode::{DecodeError, VideoDecoder, VideoProbe};
use poselab_core::pose::{Landmark, NormalizedLandmark};
use poselab_core::store::VideoStore;

// ---------------------------------------------------------------------------
// Stub capabilities
// ---------------------------------------------------------------------------

/// Decoder for a line-oriented text fixture format:
///
/// ```text
/// stub-video v1
/// frames=10
/// fps=30
/// width=64
/// height=48
/// ```
///
/// Anything without the header is rejected as an invalid video, which
/// is exactly how the ffmpeg decoder treats arbitrary payloads.
pub struct StubDecoder;

/// Serialize a stub fixture for upload bodies.
pub fn stub_video_bytes(frames: i64, fps: f64, width: u32, height: u32) -> Vec<u8> {
    format!("stub-video v1\nframes={frames}\nfps={fps}\nwidth={width}\nheight={height}\n")
        .into_bytes()
}

#[async_trait]
impl VideoDecoder for StubDecoder {
    async fn probe(&self, path: &Path) -> Result<VideoProbe, DecodeError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DecodeError::Tool(e.to_string()))?;
        let text = String::from_utf8_lossy(&bytes);

        let mut lines = text.lines();
        if lines.next() != Some("stub-video v1") {
            return Err(DecodeError::InvalidFormat("missing stub header".into()));
        }

        let mut frame_count = 0;
        let mut fps = 0.0;
        let mut width = 0;
        let mut height = 0;
        for line in lines {
            match line.split_once('=') {
                Some(("frames", v)) => frame_count = v.parse().unwrap_or(0),
                Some(("fps", v)) => fps = v.parse().unwrap_or(0.0),
                Some(("width", v)) => width = v.parse().unwrap_or(0),
                Some(("height", v)) => height = v.parse().unwrap_or(0),
                _ => {}
            }
        }

        Ok(VideoProbe {
            frame_count,
            fps,
            width,
            height,
            duration_seconds: if fps > 0.0 {
                frame_count as f64 / fps
            } else {
                0.0
            },
        })
    }

    async fn read_frame(
        &self,
        _path: &Path,
        probe: &VideoProbe,
        index: i64,
    ) -> Result<RgbImage, DecodeError> {
        Ok(RgbImage::from_pixel(
            probe.width,
            probe.height,
            Rgb([index as u8, 0, 0]),
        ))
    }
}

/// Estimator that always reports a centered pose with full visibility.
pub struct StubPoseEstimator;

#[async_trait]
impl PoseEstimator for StubPoseEstimator {
    async fn estimate(
        &self,
        _image: &RgbImage,
    ) -> Result<Option<Vec<NormalizedLandmark>>, EstimatorError> {
        Ok(Some(
            (0..Landmark::COUNT)
                .map(|_| NormalizedLandmark {
                    x: 0.5,
                    y: 0.5,
                    z: 0.0,
                    visibility: 0.9,
                })
                .collect(),
        ))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev
/// default of the frontend) and a 30-second request timeout.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 16 * 1024 * 1024,
        upload_dir: upload_dir.to_string_lossy().to_string(),
        pose_api_url: "http://127.0.0.1:9090".to_string(),
        pose_timeout_secs: 5,
        batch_workers: 2,
    }
}

/// Build the full application router with all middleware layers, backed
/// by stub capabilities and the given upload directory.
pub async fn build_test_app(upload_dir: &Path) -> Router {
    let config = test_config(upload_dir);

    let store = Arc::new(
        VideoStore::open(upload_dir, Arc::new(StubDecoder))
            .await
            .expect("failed to open test store"),
    );
    let analyzer = Arc::new(FrameAnalyzer::new(Arc::new(StubPoseEstimator)));
    let batch = Arc::new(BatchCoordinator::new(
        Arc::clone(&store),
        Arc::clone(&analyzer),
        config.batch_workers,
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        analyzer,
        batch,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .nest("/api", routes::api_routes(config.max_upload_bytes))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Dispatch a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Dispatch a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Dispatch a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Dispatch a multipart upload with a single file field.
pub async fn upload_file(
    app: Router,
    field_name: &str,
    filename: &str,
    content: &[u8],
) -> Response<Body> {
    let boundary = "poselab-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; \
             name=\"{field_name}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
