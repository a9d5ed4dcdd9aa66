pub mod health;
pub mod videos;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                  service health
///
/// /upload                                  video upload (multipart)
///
/// /video/{filename}/frame/{index}          single frame (JPEG data URI)
/// /video/{filename}/analyze                single-frame pose analysis
/// /video/{filename}/analyze-batch          multi-frame pose analysis
/// /video/{filename}                        delete (DELETE)
/// ```
///
/// `max_upload_bytes` caps request bodies across the tree; only the
/// upload route carries payloads anywhere near the limit.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .route("/upload", post(handlers::videos::upload_video))
        .nest("/video", videos::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
