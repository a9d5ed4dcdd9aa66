//! Uploaded-video store.
//!
//! Owns the upload directory and the in-memory asset table. All frame
//! and metadata access goes through an asset handle looked up here;
//! nothing else touches the stored bytes.
//!
//! Concurrency: the table sits behind an async `RwLock`. Frame reads
//! and metadata lookups take the read side and may run concurrently;
//! uploads and deletes take the write side and are serialized.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbImage;
use tokio::sync::RwLock;

use crate::decode::{DecodeError, VideoDecoder, VideoProbe};
use crate::error::CoreError;
use crate::naming;
use crate::types::Timestamp;

/// Container extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

/// An uploaded video registered in the store.
#[derive(Debug, Clone)]
pub struct VideoAsset {
    /// Unique storage name; doubles as the public handle.
    pub filename: String,
    /// Absolute or root-relative path of the stored bytes.
    pub stored_path: PathBuf,
    /// Size of the stored file.
    pub size_bytes: u64,
    /// When the asset entered the store.
    pub uploaded_at: Timestamp,
    /// Container metadata captured at upload time.
    pub probe: VideoProbe,
}

pub struct VideoStore {
    root: PathBuf,
    decoder: Arc<dyn VideoDecoder>,
    assets: RwLock<HashMap<String, VideoAsset>>,
}

impl VideoStore {
    /// Open a store rooted at `root`, creating the directory and
    /// re-registering any videos already present.
    ///
    /// Upload storage is ephemeral on the target platforms, so the table
    /// is rebuilt from the filesystem instead of persisted: files that
    /// no longer probe as video are skipped with a warning.
    pub async fn open(
        root: impl Into<PathBuf>,
        decoder: Arc<dyn VideoDecoder>,
    ) -> Result<Self, CoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| CoreError::Internal(format!("failed to create upload dir: {e}")))?;

        let store = Self {
            root,
            decoder,
            assets: RwLock::new(HashMap::new()),
        };
        store.rescan().await?;
        Ok(store)
    }

    /// Rebuild the asset table from the files under the store root.
    async fn rescan(&self) -> Result<(), CoreError> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| CoreError::Internal(format!("failed to read upload dir: {e}")))?;

        let mut table = HashMap::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
        {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            // Partial uploads and hidden files are not assets.
            if name.starts_with('.') || !path.is_file() {
                continue;
            }

            match self.decoder.probe(&path).await {
                Ok(probe) => {
                    let size_bytes = entry.metadata().await.map(|m| m.len()).unwrap_or(0);
                    table.insert(
                        name.to_string(),
                        VideoAsset {
                            filename: name.to_string(),
                            stored_path: path,
                            size_bytes,
                            uploaded_at: chrono::Utc::now(),
                            probe,
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "skipping non-video file in upload dir");
                }
            }
        }

        let count = table.len();
        *self.assets.write().await = table;
        if count > 0 {
            tracing::info!(count, "re-registered existing uploads");
        }
        Ok(())
    }

    /// Persist an uploaded payload and register it as an asset.
    ///
    /// The payload is written to a temporary path and probed before it
    /// can land in the store, so a rejected upload leaves no file
    /// behind. Name collisions are resolved with a uuid suffix; racing
    /// uploads of the same name both succeed under distinct handles.
    pub async fn upload(
        &self,
        bytes: &[u8],
        declared_filename: &str,
    ) -> Result<VideoAsset, CoreError> {
        let sanitized = naming::sanitize_filename(declared_filename);
        match naming::file_extension(&sanitized) {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => {
                return Err(CoreError::InvalidVideoFormat(format!(
                    "unsupported file type '{sanitized}' (expected one of: {})",
                    ALLOWED_EXTENSIONS.join(", ")
                )));
            }
        }

        // Stage to a dot-prefixed temp name inside the root so the final
        // rename stays on one filesystem and rescans ignore leftovers.
        let temp_path = self.root.join(format!(
            ".upload-{}.part",
            uuid::Uuid::new_v4().simple()
        ));
        tokio::fs::write(&temp_path, bytes)
            .await
            .map_err(|e| CoreError::Internal(format!("failed to stage upload: {e}")))?;

        let probe = match self.decoder.probe(&temp_path).await {
            Ok(probe) => probe,
            Err(e) => {
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(upload_probe_error(e));
            }
        };

        let mut assets = self.assets.write().await;
        let filename = naming::unique_storage_name(&sanitized, |candidate| {
            assets.contains_key(candidate) || self.root.join(candidate).exists()
        });
        let stored_path = self.root.join(&filename);

        if let Err(e) = tokio::fs::rename(&temp_path, &stored_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(CoreError::Internal(format!("failed to store upload: {e}")));
        }

        let asset = VideoAsset {
            filename: filename.clone(),
            stored_path,
            size_bytes: bytes.len() as u64,
            uploaded_at: chrono::Utc::now(),
            probe,
        };
        assets.insert(filename, asset.clone());

        tracing::info!(
            filename = %asset.filename,
            frames = asset.probe.frame_count,
            fps = asset.probe.fps,
            "registered upload"
        );
        Ok(asset)
    }

    /// Look up an asset by its handle.
    pub async fn get(&self, filename: &str) -> Result<VideoAsset, CoreError> {
        self.assets
            .read()
            .await
            .get(filename)
            .cloned()
            .ok_or_else(|| CoreError::AssetNotFound {
                filename: filename.to_string(),
            })
    }

    /// Decode a single frame of an asset.
    ///
    /// Fails with `FrameIndexOutOfRange` unless `0 <= index < frame_count`.
    pub async fn get_frame(&self, filename: &str, index: i64) -> Result<RgbImage, CoreError> {
        let asset = self.get(filename).await?;
        self.read_asset_frame(&asset, index).await
    }

    /// Decode a single frame given an already-resolved asset.
    ///
    /// Used by batch analysis to avoid re-resolving the handle per index.
    pub async fn read_asset_frame(
        &self,
        asset: &VideoAsset,
        index: i64,
    ) -> Result<RgbImage, CoreError> {
        if index < 0 || index >= asset.probe.frame_count {
            return Err(CoreError::FrameIndexOutOfRange {
                index,
                frame_count: asset.probe.frame_count,
            });
        }

        self.decoder
            .read_frame(&asset.stored_path, &asset.probe, index)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))
    }

    /// Remove an asset and its stored bytes. Idempotent: deleting an
    /// unknown or already-deleted asset is not an error.
    pub async fn delete(&self, filename: &str) -> Result<(), CoreError> {
        let removed = self.assets.write().await.remove(filename);

        let path = match removed {
            Some(asset) => asset.stored_path,
            None => self.root.join(filename),
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(filename, "deleted upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Internal(format!("failed to delete upload: {e}"))),
        }
    }

    /// The directory holding stored bytes.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Map a probe failure during upload onto the store's error taxonomy.
fn upload_probe_error(err: DecodeError) -> CoreError {
    match err {
        DecodeError::InvalidFormat(msg) => CoreError::InvalidVideoFormat(msg),
        other => CoreError::Internal(other.to_string()),
    }
}
