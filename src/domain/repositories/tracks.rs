use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::tracks::{InsertTrackEntity, TrackEntity};

#[derive(Debug, Error)]
pub enum TrackStoreError {
    /// The store refused the row itself (constraint or schema violation).
    #[error("track record rejected: {0}")]
    Rejected(String),

    #[error("track store unavailable")]
    Unavailable(#[source] anyhow::Error),
}

#[automock]
#[async_trait]
pub trait TrackRepository {
    async fn insert(
        &self,
        insert_track_entity: InsertTrackEntity,
    ) -> std::result::Result<TrackEntity, TrackStoreError>;

    async fn find_all(&self) -> Result<Vec<TrackEntity>>;

    async fn find_by_id(&self, track_id: Uuid) -> Result<Option<TrackEntity>>;

    async fn delete_by_id(&self, track_id: Uuid) -> Result<Option<TrackEntity>>;
}
