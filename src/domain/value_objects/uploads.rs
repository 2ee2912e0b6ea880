use std::{
    fmt::Display,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Image,
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        };
        write!(f, "{}", kind)
    }
}

/// Owns a local temp file and deletes it on drop, so a request future that is cancelled
/// mid-flight still releases its files.
#[derive(Debug, PartialEq, Eq)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != ErrorKind::NotFound {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "upload: failed to remove temp file"
                );
            }
        }
    }
}

/// A file the HTTP boundary has already written to local disk. Clones share the temp file,
/// which is removed once the last clone is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    pub original_name: String,
    pub temp_file: Arc<TempFile>,
    pub size_bytes: u64,
    pub mime_type: String,
}

impl IncomingFile {
    pub fn stored_path(&self) -> &Path {
        self.temp_file.path()
    }

    /// Lower-cased extension of the client-supplied name, empty when there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Raw add-music submission as received; nothing here has been validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSubmission {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub audio: Option<IncomingFile>,
    pub image: Option<IncomingFile>,
}

impl UploadSubmission {
    pub fn temp_paths(&self) -> Vec<PathBuf> {
        [self.audio.as_ref(), self.image.as_ref()]
            .into_iter()
            .flatten()
            .map(|file| file.stored_path().to_path_buf())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBundle {
    pub title: String,
    pub artist: String,
    pub audio_file: IncomingFile,
    pub image_file: IncomingFile,
}

/// Provider resource class. Audio goes up as `Video`, the provider's streamable-media class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Video,
    Image,
}

impl ResourceType {
    pub fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Audio => ResourceType::Video,
            MediaKind::Image => ResourceType::Image,
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let resource_type = match self {
            ResourceType::Video => "video",
            ResourceType::Image => "image",
        };
        write!(f, "{}", resource_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub resource_type: ResourceType,
    pub folder: String,
    pub transformation: Option<String>,
}

impl UploadOptions {
    pub fn audio(folder: &str) -> Self {
        Self {
            resource_type: ResourceType::for_kind(MediaKind::Audio),
            folder: folder.to_string(),
            transformation: None,
        }
    }

    pub fn image(folder: &str, transformation: Option<String>) -> Self {
        Self {
            resource_type: ResourceType::for_kind(MediaKind::Image),
            folder: folder.to_string(),
            transformation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub secure_url: String,
    pub public_id: String,
    pub duration: Option<f64>,
    pub format: Option<String>,
}
