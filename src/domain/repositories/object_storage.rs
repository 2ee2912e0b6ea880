use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::value_objects::uploads::{
    IncomingFile, ResourceType, StoredObject, UploadOptions,
};

#[derive(Debug, Error)]
pub enum StorageError {
    /// The provider refused our credentials (HTTP 401/403).
    #[error("storage provider rejected credentials (status {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("storage provider rejected the file size (status {status}): {message}")]
    PayloadTooLarge { status: u16, message: String },

    #[error("storage provider unavailable: {0}")]
    Unavailable(String),
}

#[automock]
#[async_trait]
pub trait ObjectStorageClient {
    async fn upload(
        &self,
        file: &IncomingFile,
        options: &UploadOptions,
    ) -> Result<StoredObject, StorageError>;

    async fn destroy(
        &self,
        public_id: &str,
        resource_type: ResourceType,
    ) -> Result<(), StorageError>;
}
