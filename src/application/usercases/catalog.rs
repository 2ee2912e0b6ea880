use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::{object_storage::ObjectStorageClient, tracks::TrackRepository},
    value_objects::{tracks::TrackModel, uploads::ResourceType},
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("track not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct CatalogUseCase<T, S>
where
    T: TrackRepository + Send + Sync + 'static,
    S: ObjectStorageClient + Send + Sync + 'static,
{
    track_repository: Arc<T>,
    storage_client: Arc<S>,
    delete_remote_on_track_delete: bool,
}

impl<T, S> CatalogUseCase<T, S>
where
    T: TrackRepository + Send + Sync + 'static,
    S: ObjectStorageClient + Send + Sync + 'static,
{
    pub fn new(
        track_repository: Arc<T>,
        storage_client: Arc<S>,
        delete_remote_on_track_delete: bool,
    ) -> Self {
        Self {
            track_repository,
            storage_client,
            delete_remote_on_track_delete,
        }
    }

    pub async fn list_all(&self) -> Result<Vec<TrackModel>> {
        let tracks = self.track_repository.find_all().await?;

        Ok(tracks.into_iter().map(TrackModel::from).collect())
    }

    pub async fn find_by_id(&self, track_id: Uuid) -> Result<TrackModel, CatalogError> {
        let track = self
            .track_repository
            .find_by_id(track_id)
            .await?
            .ok_or(CatalogError::NotFound)?;

        Ok(TrackModel::from(track))
    }

    /// Removes the record and returns it. Stored objects stay at the provider unless
    /// remote deletion is switched on.
    pub async fn delete_by_id(&self, track_id: Uuid) -> Result<TrackModel, CatalogError> {
        let track = self
            .track_repository
            .delete_by_id(track_id)
            .await?
            .ok_or(CatalogError::NotFound)?;

        info!(%track_id, "catalog: track deleted");

        if self.delete_remote_on_track_delete {
            self.destroy_remote(&track.audio_public_id, ResourceType::Video)
                .await;
            self.destroy_remote(&track.image_public_id, ResourceType::Image)
                .await;
        }

        Ok(TrackModel::from(track))
    }

    async fn destroy_remote(&self, public_id: &str, resource_type: ResourceType) {
        if let Err(err) = self.storage_client.destroy(public_id, resource_type).await {
            warn!(
                public_id,
                %resource_type,
                error = %err,
                "catalog: failed to destroy stored object"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::tracks::TrackEntity,
        repositories::{
            object_storage::{MockObjectStorageClient, StorageError},
            tracks::MockTrackRepository,
        },
    };
    use chrono::Utc;
    use mockall::predicate::{eq, ne};

    fn track(id: Uuid, audio_url: &str) -> TrackEntity {
        TrackEntity {
            id,
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            audio_url: audio_url.to_string(),
            image_url: "https://res.example.com/image/upload/image/cover.png".to_string(),
            audio_public_id: "audio/song".to_string(),
            image_public_id: "image/cover".to_string(),
            duration: Some(200.0),
            format: Some("mp3".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn empty_catalog_lists_nothing() {
        let mut tracks = MockTrackRepository::new();
        tracks.expect_find_all().times(1).returning(|| Ok(vec![]));

        let usecase = CatalogUseCase::new(
            Arc::new(tracks),
            Arc::new(MockObjectStorageClient::new()),
            false,
        );

        assert!(usecase.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_normalizes_legacy_paths() {
        let mut tracks = MockTrackRepository::new();
        tracks.expect_find_all().returning(|| {
            Ok(vec![
                track(Uuid::new_v4(), "uploads\\1700000000000_song.mp3"),
                track(Uuid::new_v4(), "https://res.example.com/video/upload/a.mp3"),
            ])
        });

        let usecase = CatalogUseCase::new(
            Arc::new(tracks),
            Arc::new(MockObjectStorageClient::new()),
            false,
        );

        let listed = usecase.list_all().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].audio_url, "uploads/1700000000000_song.mp3");
        assert!(listed.iter().all(|track| !track.audio_url.contains('\\')));
    }

    #[tokio::test]
    async fn listing_surfaces_store_failure() {
        let mut tracks = MockTrackRepository::new();
        tracks
            .expect_find_all()
            .returning(|| Err(anyhow::anyhow!("connection refused")));

        let usecase = CatalogUseCase::new(
            Arc::new(tracks),
            Arc::new(MockObjectStorageClient::new()),
            false,
        );

        assert!(usecase.list_all().await.is_err());
    }

    #[tokio::test]
    async fn find_by_id_returns_normalized_track_or_not_found() {
        let known = Uuid::new_v4();
        let mut tracks = MockTrackRepository::new();
        tracks
            .expect_find_by_id()
            .with(eq(known))
            .returning(|id| Ok(Some(track(id, "uploads\\1700000000000_song.mp3"))));
        tracks
            .expect_find_by_id()
            .with(ne(known))
            .returning(|_| Ok(None));

        let usecase = CatalogUseCase::new(
            Arc::new(tracks),
            Arc::new(MockObjectStorageClient::new()),
            false,
        );

        let found = usecase.find_by_id(known).await.unwrap();
        assert_eq!(found.id, known);
        assert_eq!(found.audio_url, "uploads/1700000000000_song.mp3");

        let err = usecase.find_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn second_delete_of_same_id_is_not_found() {
        let id = Uuid::new_v4();
        let mut tracks = MockTrackRepository::new();
        let mut sequence = mockall::Sequence::new();
        tracks
            .expect_delete_by_id()
            .with(eq(id))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(move |id| Ok(Some(track(id, "https://cdn/a.mp3"))));
        tracks
            .expect_delete_by_id()
            .with(eq(id))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(None));

        let mut storage = MockObjectStorageClient::new();
        storage.expect_destroy().never();

        let usecase = CatalogUseCase::new(Arc::new(tracks), Arc::new(storage), false);

        let deleted = usecase.delete_by_id(id).await.unwrap();
        assert_eq!(deleted.id, id);

        let err = usecase.delete_by_id(id).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn cascade_destroys_both_stored_objects() {
        let id = Uuid::new_v4();
        let mut tracks = MockTrackRepository::new();
        tracks
            .expect_delete_by_id()
            .returning(move |id| Ok(Some(track(id, "https://cdn/a.mp3"))));

        let mut storage = MockObjectStorageClient::new();
        storage
            .expect_destroy()
            .withf(|public_id, resource_type| {
                public_id == "audio/song" && *resource_type == ResourceType::Video
            })
            .times(1)
            .returning(|_, _| Ok(()));
        storage
            .expect_destroy()
            .withf(|public_id, resource_type| {
                public_id == "image/cover" && *resource_type == ResourceType::Image
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = CatalogUseCase::new(Arc::new(tracks), Arc::new(storage), true);

        assert!(usecase.delete_by_id(id).await.is_ok());
    }

    #[tokio::test]
    async fn cascade_failure_does_not_fail_the_delete() {
        let id = Uuid::new_v4();
        let mut tracks = MockTrackRepository::new();
        tracks
            .expect_delete_by_id()
            .returning(move |id| Ok(Some(track(id, "https://cdn/a.mp3"))));

        let mut storage = MockObjectStorageClient::new();
        storage
            .expect_destroy()
            .times(2)
            .returning(|_, _| Err(StorageError::Unavailable("timeout".to_string())));

        let usecase = CatalogUseCase::new(Arc::new(tracks), Arc::new(storage), true);

        let deleted = usecase.delete_by_id(id).await.unwrap();
        assert_eq!(deleted.storage_refs.audio, "audio/song");
    }

    #[tokio::test]
    async fn delete_surfaces_store_failure_as_internal() {
        let mut tracks = MockTrackRepository::new();
        tracks
            .expect_delete_by_id()
            .returning(|_| Err(anyhow::anyhow!("pool timed out")));

        let usecase = CatalogUseCase::new(
            Arc::new(tracks),
            Arc::new(MockObjectStorageClient::new()),
            false,
        );

        let err = usecase.delete_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Internal(_)));
    }
}
