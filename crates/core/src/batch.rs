//! Batch frame analysis.
//!
//! Sequences many single-frame analyses against one asset. Work runs on
//! a bounded worker pool so a large batch cannot hold dozens of decoded
//! frames in memory at once, and results are reassembled in request
//! order regardless of completion order.
//!
//! Failure policy: an unknown asset or an oversized batch fails the
//! whole call; a failure on one index (bad index, decode error,
//! estimator error) is recorded on that element only and the remaining
//! indices still run.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::analyzer::{AnalysisResult, FrameAnalyzer};
use crate::error::CoreError;
use crate::store::VideoStore;

/// Largest accepted batch.
pub const MAX_BATCH_FRAMES: usize = 50;

/// One element of a batch result, in request order.
#[derive(Debug)]
pub struct BatchOutcome {
    /// The requested frame index.
    pub frame_index: i64,
    /// The analysis, or the per-element failure.
    pub result: Result<AnalysisResult, CoreError>,
}

pub struct BatchCoordinator {
    store: Arc<VideoStore>,
    analyzer: Arc<FrameAnalyzer>,
    workers: usize,
}

impl BatchCoordinator {
    /// `workers` bounds how many frames are decoded and analyzed
    /// concurrently; it is clamped to at least 1.
    pub fn new(store: Arc<VideoStore>, analyzer: Arc<FrameAnalyzer>, workers: usize) -> Self {
        Self {
            store,
            analyzer,
            workers: workers.max(1),
        }
    }

    /// Analyze every index of `indices` against one asset.
    ///
    /// The returned vector always has one element per requested index,
    /// in the same order.
    pub async fn analyze_batch(
        &self,
        filename: &str,
        indices: &[i64],
    ) -> Result<Vec<BatchOutcome>, CoreError> {
        if indices.len() > MAX_BATCH_FRAMES {
            return Err(CoreError::Validation(format!(
                "too many frames in batch: {} (max {MAX_BATCH_FRAMES})",
                indices.len()
            )));
        }

        // Resolve the handle once; an unknown asset fails the whole call.
        let asset = Arc::new(self.store.get(filename).await?);

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(indices.len());

        for &index in indices {
            let store = Arc::clone(&self.store);
            let analyzer = Arc::clone(&self.analyzer);
            let asset = Arc::clone(&asset);
            let semaphore = Arc::clone(&semaphore);

            handles.push(tokio::spawn(async move {
                // Closed only if the coordinator is dropped mid-flight.
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return BatchOutcome {
                            frame_index: index,
                            result: Err(CoreError::Internal("worker pool closed".into())),
                        };
                    }
                };

                let result = match store.read_asset_frame(&asset, index).await {
                    Ok(frame) => analyzer.analyze(index, frame).await,
                    Err(e) => Err(e),
                };
                BatchOutcome {
                    frame_index: index,
                    result,
                }
            }));
        }

        // Awaiting in spawn order restores request order no matter how
        // the pool interleaved the work.
        let mut outcomes = Vec::with_capacity(handles.len());
        for (handle, &index) in handles.into_iter().zip(indices) {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => outcomes.push(BatchOutcome {
                    frame_index: index,
                    result: Err(CoreError::Internal(format!("analysis task failed: {e}"))),
                }),
            }
        }
        Ok(outcomes)
    }
}
