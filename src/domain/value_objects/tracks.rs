use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::tracks::{InsertTrackEntity, TrackEntity},
    value_objects::uploads::{StoredObject, UploadBundle},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageRefs {
    pub audio: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackModel {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    pub image_url: String,
    pub storage_refs: StorageRefs,
    pub duration: Option<f64>,
    pub format: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TrackEntity> for TrackModel {
    fn from(value: TrackEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            artist: value.artist,
            audio_url: normalize_legacy_path(&value.audio_url),
            image_url: normalize_legacy_path(&value.image_url),
            storage_refs: StorageRefs {
                audio: value.audio_public_id,
                image: value.image_public_id,
            },
            duration: value.duration,
            format: value.format,
            created_at: value.created_at,
        }
    }
}

/// Records written before the storage provider migration hold Windows-style local paths.
pub fn normalize_legacy_path(value: &str) -> String {
    value.replace('\\', "/")
}

/// Both storage results are required to build an insert, so a record can never be
/// written with only one URL.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrackModel {
    pub title: String,
    pub artist: String,
    pub audio: StoredObject,
    pub image: StoredObject,
}

impl NewTrackModel {
    pub fn from_upload(bundle: &UploadBundle, audio: StoredObject, image: StoredObject) -> Self {
        Self {
            title: bundle.title.clone(),
            artist: bundle.artist.clone(),
            audio,
            image,
        }
    }

    pub fn to_entity(&self) -> InsertTrackEntity {
        InsertTrackEntity {
            title: self.title.clone(),
            artist: self.artist.clone(),
            audio_url: self.audio.secure_url.clone(),
            image_url: self.image.secure_url.clone(),
            audio_public_id: self.audio.public_id.clone(),
            image_public_id: self.image.public_id.clone(),
            duration: self.audio.duration,
            format: self.audio.format.clone(),
        }
    }
}
