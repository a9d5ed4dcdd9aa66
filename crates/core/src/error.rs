#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Upload is not a decodable video: {0}")]
    InvalidVideoFormat(String),

    #[error("Video not found: {filename}")]
    AssetNotFound { filename: String },

    #[error("Frame index {index} out of range (valid range: 0..{frame_count})")]
    FrameIndexOutOfRange { index: i64, frame_count: i64 },

    #[error("Pose analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
