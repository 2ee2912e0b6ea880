use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::tracks;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = tracks)]
pub struct TrackEntity {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    pub image_url: String,
    pub audio_public_id: String,
    pub image_public_id: String,
    pub duration: Option<f64>,
    pub format: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `id` and `created_at` are left to column defaults so the store assigns them.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = tracks)]
pub struct InsertTrackEntity {
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    pub image_url: String,
    pub audio_public_id: String,
    pub image_public_id: String,
    pub duration: Option<f64>,
    pub format: Option<String>,
}
