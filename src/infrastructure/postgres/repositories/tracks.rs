use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{
    RunQueryDsl, delete, insert_into,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::tracks::{InsertTrackEntity, TrackEntity},
        repositories::tracks::{TrackRepository, TrackStoreError},
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::tracks},
};

pub struct TrackPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TrackPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TrackRepository for TrackPostgres {
    async fn insert(
        &self,
        insert_track_entity: InsertTrackEntity,
    ) -> std::result::Result<TrackEntity, TrackStoreError> {
        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .map_err(|err| TrackStoreError::Unavailable(err.into()))?;

        let result = insert_into(tracks::table)
            .values(&insert_track_entity)
            .returning(TrackEntity::as_returning())
            .get_result::<TrackEntity>(&mut conn)
            .map_err(classify_insert_error)?;

        Ok(result)
    }

    async fn find_all(&self) -> Result<Vec<TrackEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = tracks::table
            .select(TrackEntity::as_select())
            .order(tracks::created_at.desc())
            .load::<TrackEntity>(&mut conn)
            .context("failed to load tracks")?;

        Ok(results)
    }

    async fn find_by_id(&self, track_id: Uuid) -> Result<Option<TrackEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = tracks::table
            .filter(tracks::id.eq(track_id))
            .select(TrackEntity::as_select())
            .first::<TrackEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete_by_id(&self, track_id: Uuid) -> Result<Option<TrackEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = delete(tracks::table.filter(tracks::id.eq(track_id)))
            .returning(TrackEntity::as_returning())
            .get_result::<TrackEntity>(&mut conn)
            .optional()
            .with_context(|| format!("failed to delete track {}", track_id))?;

        Ok(result)
    }
}

/// Constraint violations mean the row itself was refused; anything else is the store.
fn classify_insert_error(err: DieselError) -> TrackStoreError {
    match err {
        DieselError::DatabaseError(
            kind @ (DatabaseErrorKind::NotNullViolation
            | DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::ForeignKeyViolation),
            info,
        ) => TrackStoreError::Rejected(format!("{:?}: {}", kind, info.message())),
        DieselError::SerializationError(err) => TrackStoreError::Rejected(err.to_string()),
        other => TrackStoreError::Unavailable(anyhow::Error::new(other)),
    }
}
