use std::{path::PathBuf, sync::Arc};

use axum::{
    Extension, Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    application::usercases::{
        catalog::{CatalogError, CatalogUseCase},
        track_upload::{TrackUploadConfig, TrackUploadUseCase},
        upload_validator::UploadPolicy,
    },
    config::{config_model::DotEnvyConfig, stage::Stage},
    domain::{
        repositories::{object_storage::ObjectStorageClient, tracks::TrackRepository},
        value_objects::tracks::TrackModel,
    },
    infrastructure::{
        axum_http::{
            auth::{AdminGuard, AdminId, require_admin},
            error_responses::ApiError,
            multipart,
        },
        postgres::{postgres_connection::PgPoolSquad, repositories::tracks::TrackPostgres},
    },
};

pub struct MusicState<T, S>
where
    T: TrackRepository + Send + Sync + 'static,
    S: ObjectStorageClient + Send + Sync + 'static,
{
    pub track_upload_usecase: TrackUploadUseCase<T, S>,
    pub catalog_usecase: CatalogUseCase<T, S>,
    pub temp_dir: PathBuf,
    pub stage: Stage,
}

#[derive(Debug, Serialize)]
struct MusicResponse {
    success: bool,
    message: &'static str,
    music: TrackModel,
}

#[derive(Debug, Serialize)]
struct MusicDetailResponse {
    success: bool,
    music: TrackModel,
}

#[derive(Debug, Serialize)]
struct MusicListResponse {
    success: bool,
    musics: Vec<TrackModel>,
}

pub fn routes<S>(db_pool: Arc<PgPoolSquad>, storage_client: Arc<S>, config: Arc<DotEnvyConfig>) -> Router
where
    S: ObjectStorageClient + Send + Sync + 'static,
{
    let track_repository = Arc::new(TrackPostgres::new(Arc::clone(&db_pool)));

    let track_upload_usecase = TrackUploadUseCase::new(
        Arc::clone(&track_repository),
        Arc::clone(&storage_client),
        TrackUploadConfig {
            policy: UploadPolicy {
                allowed_audio_extensions: config.uploads.allowed_audio_extensions.clone(),
                allowed_image_extensions: config.uploads.allowed_image_extensions.clone(),
                audio_max_bytes: config.uploads.audio_max_bytes,
                image_max_bytes: config.uploads.image_max_bytes,
            },
            audio_folder: config.storage.audio_folder.clone(),
            image_folder: config.storage.image_folder.clone(),
            image_transformation: config.storage.image_transformation.clone(),
            upload_timeout: config.storage.upload_timeout,
        },
    );

    let catalog_usecase = CatalogUseCase::new(
        track_repository,
        storage_client,
        config.uploads.delete_remote_on_track_delete,
    );

    let guard = config.uploads.admin_auth_required.then(|| {
        Arc::new(AdminGuard {
            jwt_secret: config.admin_secret.secret.clone(),
        })
    });

    if guard.is_none() {
        warn!("musics: admin auth is disabled for add-music and delete-music");
    }

    router(
        Arc::new(MusicState {
            track_upload_usecase,
            catalog_usecase,
            temp_dir: PathBuf::from(&config.uploads.temp_dir),
            stage: config.stage,
        }),
        guard,
    )
}

/// Builds the music routes. `guard` protects the mutating routes; listing stays public.
pub fn router<T, S>(state: Arc<MusicState<T, S>>, guard: Option<Arc<AdminGuard>>) -> Router
where
    T: TrackRepository + Send + Sync + 'static,
    S: ObjectStorageClient + Send + Sync + 'static,
{
    let mut protected = Router::new()
        .route("/add-music", post(add_music::<T, S>))
        .route("/delete-music/:id", delete(delete_music::<T, S>));

    if let Some(guard) = guard {
        protected = protected.route_layer(middleware::from_fn_with_state(guard, require_admin));
    }

    Router::new()
        .merge(protected)
        .route("/get-music", get(get_music::<T, S>))
        .route("/get-music/:id", get(get_music_by_id::<T, S>))
        .with_state(state)
}

pub async fn add_music<T, S>(
    State(state): State<Arc<MusicState<T, S>>>,
    admin: Option<Extension<AdminId>>,
    multipart: Multipart,
) -> Response
where
    T: TrackRepository + Send + Sync + 'static,
    S: ObjectStorageClient + Send + Sync + 'static,
{
    let submission = match multipart::read_submission(multipart, &state.temp_dir).await {
        Ok(submission) => submission,
        Err(err) => {
            warn!(error = %err, "musics: multipart intake failed");
            return ApiError::intake(err, state.stage).into_response();
        }
    };

    match state.track_upload_usecase.submit(submission).await {
        Ok(music) => {
            info!(
                track_id = %music.id,
                admin_id = ?admin.map(|Extension(AdminId(id))| id),
                "musics: track added"
            );
            (
                StatusCode::CREATED,
                Json(MusicResponse {
                    success: true,
                    message: "Music uploaded successfully",
                    music,
                }),
            )
                .into_response()
        }
        Err(err) => ApiError::upload(err, state.stage).into_response(),
    }
}

pub async fn get_music<T, S>(State(state): State<Arc<MusicState<T, S>>>) -> Response
where
    T: TrackRepository + Send + Sync + 'static,
    S: ObjectStorageClient + Send + Sync + 'static,
{
    match state.catalog_usecase.list_all().await {
        Ok(musics) => Json(MusicListResponse {
            success: true,
            musics,
        })
        .into_response(),
        Err(err) => ApiError::internal(err, state.stage).into_response(),
    }
}

pub async fn get_music_by_id<T, S>(
    State(state): State<Arc<MusicState<T, S>>>,
    Path(id): Path<String>,
) -> Response
where
    T: TrackRepository + Send + Sync + 'static,
    S: ObjectStorageClient + Send + Sync + 'static,
{
    let Ok(track_id) = Uuid::parse_str(&id) else {
        return ApiError::catalog(CatalogError::NotFound, state.stage).into_response();
    };

    match state.catalog_usecase.find_by_id(track_id).await {
        Ok(music) => Json(MusicDetailResponse {
            success: true,
            music,
        })
        .into_response(),
        Err(err) => ApiError::catalog(err, state.stage).into_response(),
    }
}

pub async fn delete_music<T, S>(
    State(state): State<Arc<MusicState<T, S>>>,
    admin: Option<Extension<AdminId>>,
    Path(id): Path<String>,
) -> Response
where
    T: TrackRepository + Send + Sync + 'static,
    S: ObjectStorageClient + Send + Sync + 'static,
{
    // A malformed id cannot name an existing track.
    let Ok(track_id) = Uuid::parse_str(&id) else {
        return ApiError::catalog(CatalogError::NotFound, state.stage).into_response();
    };

    match state.catalog_usecase.delete_by_id(track_id).await {
        Ok(music) => {
            info!(
                %track_id,
                admin_id = ?admin.map(|Extension(AdminId(id))| id),
                "musics: track deleted"
            );
            Json(MusicResponse {
                success: true,
                message: "Music deleted successfully",
                music,
            })
            .into_response()
        }
        Err(err) => ApiError::catalog(err, state.stage).into_response(),
    }
}
