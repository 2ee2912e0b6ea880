use std::{path::Path, sync::Arc};

use axum::{
    extract::{
        Multipart,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
};
use chrono::Utc;
use thiserror::Error;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::debug;
use uuid::Uuid;

use crate::domain::value_objects::uploads::{IncomingFile, TempFile, UploadSubmission};

pub const AUDIO_FIELD: &str = "music";
pub const IMAGE_FIELD: &str = "image";

const MAX_FILENAME_LENGTH: usize = 200;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("malformed multipart body: {0}")]
    Malformed(String),

    #[error("request body too large: {0}")]
    BodyTooLarge(String),

    #[error("unexpected field '{0}'")]
    UnexpectedField(String),

    #[error("only one '{0}' file is allowed")]
    DuplicateFile(&'static str),

    #[error("failed to write temp file")]
    Io(#[from] std::io::Error),
}

impl IntakeError {
    fn from_multipart(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            IntakeError::BodyTooLarge(err.body_text())
        } else {
            IntakeError::Malformed(err.body_text())
        }
    }
}

/// Streams an add-music form into `temp_dir`. Each stored file is owned by the returned
/// submission; on failure or cancellation the partial submission is dropped and every file
/// written so far is removed with it.
pub async fn read_submission(
    mut multipart: Multipart,
    temp_dir: &Path,
) -> Result<UploadSubmission, IntakeError> {
    tokio::fs::create_dir_all(temp_dir).await?;

    let mut submission = UploadSubmission::default();
    collect_fields(&mut multipart, temp_dir, &mut submission).await?;

    Ok(submission)
}

async fn collect_fields(
    multipart: &mut Multipart,
    temp_dir: &Path,
    submission: &mut UploadSubmission,
) -> Result<(), IntakeError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(IntakeError::from_multipart)?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "title" => submission.title = Some(read_text(field).await?),
            "artist" => submission.artist = Some(read_text(field).await?),
            AUDIO_FIELD => {
                if submission.audio.is_some() {
                    return Err(IntakeError::DuplicateFile(AUDIO_FIELD));
                }
                submission.audio = store_file(field, temp_dir).await?;
            }
            IMAGE_FIELD => {
                if submission.image.is_some() {
                    return Err(IntakeError::DuplicateFile(IMAGE_FIELD));
                }
                submission.image = store_file(field, temp_dir).await?;
            }
            _ => return Err(IntakeError::UnexpectedField(field_name)),
        }
    }

    Ok(())
}

async fn read_text(field: Field<'_>) -> Result<String, IntakeError> {
    field
        .text()
        .await
        .map_err(IntakeError::from_multipart)
}

/// Returns `None` for a file input left empty by the client.
async fn store_file(
    mut field: Field<'_>,
    temp_dir: &Path,
) -> Result<Option<IncomingFile>, IntakeError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    if original_name.is_empty() {
        return Ok(None);
    }

    let mime_type = field
        .content_type()
        .filter(|value| !value.is_empty())
        .unwrap_or("application/octet-stream")
        .to_string();

    // Declared before the handle so the handle closes first on an early return.
    let temp_file = TempFile::new(temp_dir.join(temp_file_name(&original_name)));
    let mut file = File::create(temp_file.path()).await?;
    let mut size_bytes: u64 = 0;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(IntakeError::from_multipart)?
    {
        file.write_all(&chunk).await?;
        size_bytes += chunk.len() as u64;
    }
    file.flush().await?;

    debug!(
        original_name = %original_name,
        path = %temp_file.path().display(),
        size_bytes,
        "intake: file stored"
    );

    Ok(Some(IncomingFile {
        original_name,
        temp_file: Arc::new(temp_file),
        size_bytes,
        mime_type,
    }))
}

fn temp_file_name(original_name: &str) -> String {
    format!(
        "{}_{}_{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        sanitize_filename(original_name)
    )
}

/// Keeps only the final path component and replaces anything outside `[A-Za-z0-9._-]`.
pub fn sanitize_filename(original_name: &str) -> String {
    let filename_only = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('.').is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}
