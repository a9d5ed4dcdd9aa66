//! Route definitions for frame retrieval and pose analysis.
//!
//! Mounted at `/video`. Videos are identified by the storage filename
//! returned from the upload endpoint.
//!
//! ```text
//! GET    /{filename}/frame/{index}     get_frame
//! POST   /{filename}/analyze           analyze_frame
//! POST   /{filename}/analyze-batch     analyze_batch
//! DELETE /{filename}                   delete_video
//! ```

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{filename}/frame/{index}", get(videos::get_frame))
        .route("/{filename}/analyze", post(videos::analyze_frame))
        .route("/{filename}/analyze-batch", post(videos::analyze_batch))
        .route("/{filename}", delete(videos::delete_video))
}
