use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    application::usercases::upload_validator::{self, UploadPolicy},
    domain::{
        repositories::{
            object_storage::{ObjectStorageClient, StorageError},
            tracks::{TrackRepository, TrackStoreError},
        },
        value_objects::{
            tracks::{NewTrackModel, TrackModel},
            uploads::{IncomingFile, MediaKind, StoredObject, UploadOptions, UploadSubmission},
        },
    },
};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0} file is required")]
    MissingFile(MediaKind),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid audio format '{extension}'; allowed: {}", .allowed.join(", "))]
    InvalidAudioFormat {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("invalid image format '{extension}'; allowed: {}", .allowed.join(", "))]
    InvalidImageFormat {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("{kind} file is too large ({size} bytes, limit {limit} bytes)")]
    FileTooLarge { kind: MediaKind, size: u64, limit: u64 },

    #[error("storage provider unavailable while uploading {kind}: {detail}")]
    StorageUnavailable { kind: MediaKind, detail: String },

    #[error("storage provider rejected credentials while uploading {kind}: {detail}")]
    StorageAuthFailed { kind: MediaKind, detail: String },

    #[error("track record rejected: {0}")]
    RecordRejected(String),

    #[error("track store unavailable: {0}")]
    StoreUnavailable(String),
}

impl UploadError {
    /// Client-fixable errors detected before any remote call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UploadError::MissingFile(_)
                | UploadError::MissingField(_)
                | UploadError::InvalidAudioFormat { .. }
                | UploadError::InvalidImageFormat { .. }
                | UploadError::FileTooLarge { .. }
        )
    }

    fn from_storage(kind: MediaKind, err: StorageError) -> Self {
        match err {
            StorageError::Unauthorized { .. } => UploadError::StorageAuthFailed {
                kind,
                detail: err.to_string(),
            },
            StorageError::PayloadTooLarge { .. } | StorageError::Unavailable(_) => {
                UploadError::StorageUnavailable {
                    kind,
                    detail: err.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackUploadConfig {
    pub policy: UploadPolicy,
    pub audio_folder: String,
    pub image_folder: String,
    pub image_transformation: Option<String>,
    pub upload_timeout: Duration,
}

impl Default for TrackUploadConfig {
    fn default() -> Self {
        Self {
            policy: UploadPolicy::default(),
            audio_folder: "audio".to_string(),
            image_folder: "image".to_string(),
            image_transformation: None,
            upload_timeout: Duration::from_secs(60),
        }
    }
}

pub struct TrackUploadUseCase<T, S>
where
    T: TrackRepository + Send + Sync + 'static,
    S: ObjectStorageClient + Send + Sync + 'static,
{
    track_repository: Arc<T>,
    storage_client: Arc<S>,
    config: TrackUploadConfig,
}

impl<T, S> TrackUploadUseCase<T, S>
where
    T: TrackRepository + Send + Sync + 'static,
    S: ObjectStorageClient + Send + Sync + 'static,
{
    pub fn new(track_repository: Arc<T>, storage_client: Arc<S>, config: TrackUploadConfig) -> Self {
        Self {
            track_repository,
            storage_client,
            config,
        }
    }

    /// Validates, uploads both files, and persists the track. The submission owns its temp
    /// files, so they are removed on every exit path, including when this future is dropped
    /// before completion. A failed submission must be sent again in full.
    pub async fn submit(&self, submission: UploadSubmission) -> Result<TrackModel, UploadError> {
        let result = self.process(&submission).await;

        drop(submission);

        match &result {
            Ok(track) => info!(track_id = %track.id, "upload: track created"),
            Err(err) if err.is_validation() => {
                warn!(error = %err, "upload: submission rejected")
            }
            Err(err) => error!(error = %err, "upload: submission failed"),
        }

        result
    }

    async fn process(&self, submission: &UploadSubmission) -> Result<TrackModel, UploadError> {
        let bundle = upload_validator::validate(submission, &self.config.policy)?;

        debug!(
            title = %bundle.title,
            artist = %bundle.artist,
            audio_bytes = bundle.audio_file.size_bytes,
            image_bytes = bundle.image_file.size_bytes,
            "upload: submission validated"
        );

        let audio_options = UploadOptions::audio(&self.config.audio_folder);
        let image_options = UploadOptions::image(
            &self.config.image_folder,
            self.config.image_transformation.clone(),
        );

        let (audio, image) = tokio::try_join!(
            self.upload_one(MediaKind::Audio, &bundle.audio_file, &audio_options),
            self.upload_one(MediaKind::Image, &bundle.image_file, &image_options),
        )?;

        let new_track = NewTrackModel::from_upload(&bundle, audio, image);

        let track = self
            .track_repository
            .insert(new_track.to_entity())
            .await
            .map_err(|err| match err {
                TrackStoreError::Rejected(reason) => UploadError::RecordRejected(reason),
                TrackStoreError::Unavailable(source) => {
                    UploadError::StoreUnavailable(format!("{:#}", source))
                }
            })?;

        Ok(TrackModel::from(track))
    }

    async fn upload_one(
        &self,
        kind: MediaKind,
        file: &IncomingFile,
        options: &UploadOptions,
    ) -> Result<StoredObject, UploadError> {
        let timeout = self.config.upload_timeout;

        match tokio::time::timeout(timeout, self.storage_client.upload(file, options)).await {
            Ok(Ok(stored)) => {
                debug!(
                    %kind,
                    public_id = %stored.public_id,
                    "upload: stored file at provider"
                );
                Ok(stored)
            }
            Ok(Err(err)) => Err(UploadError::from_storage(kind, err)),
            Err(_) => Err(UploadError::StorageUnavailable {
                kind,
                detail: format!("upload timed out after {}s", timeout.as_secs_f64()),
            }),
        }
    }
}
