use std::{collections::BTreeMap, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    StatusCode,
    multipart::{Form, Part},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, error};

use crate::domain::{
    repositories::object_storage::{ObjectStorageClient, StorageError},
    value_objects::uploads::{IncomingFile, ResourceType, StoredObject, UploadOptions},
};

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
}

pub struct CloudinaryClient {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    duration: Option<f64>,
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    message: Option<String>,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("failed to build storage http client")?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, resource_type: ResourceType, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            resource_type,
            action
        )
    }

    /// Signed form fields for an authenticated API call. `params` must not contain the
    /// file, the api key or the signature itself.
    fn signed_fields(&self, params: BTreeMap<&'static str, String>) -> Vec<(&'static str, String)> {
        let signature = sign(&params, &self.config.api_secret);

        let mut fields: Vec<(&'static str, String)> = params.into_iter().collect();
        fields.push(("api_key", self.config.api_key.clone()));
        fields.push(("signature", signature));
        fields.push(("signature_algorithm", "sha256".to_string()));
        fields
    }

    async fn ensure_success(
        resp: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, StorageError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .unwrap_or_else(|| body.chars().take(512).collect());

        error!(
            status = %status,
            provider_message = %message,
            context = %context,
            "storage api request failed"
        );

        Err(classify_status(status, message))
    }
}

#[async_trait]
impl ObjectStorageClient for CloudinaryClient {
    async fn upload(
        &self,
        file: &IncomingFile,
        options: &UploadOptions,
    ) -> Result<StoredObject, StorageError> {
        let bytes = tokio::fs::read(file.stored_path()).await.map_err(|err| {
            StorageError::Unavailable(format!(
                "failed to read {}: {}",
                file.stored_path().display(),
                err
            ))
        })?;

        let mut params = BTreeMap::new();
        params.insert("folder", options.folder.clone());
        params.insert("timestamp", Utc::now().timestamp().to_string());
        if let Some(transformation) = &options.transformation {
            params.insert("transformation", transformation.clone());
        }

        let part = Part::bytes(bytes)
            .file_name(file.original_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|err| StorageError::Unavailable(format!("invalid mime type: {}", err)))?;

        let form = self
            .signed_fields(params)
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value))
            .part("file", part);

        let resp = self
            .http
            .post(self.endpoint(options.resource_type, "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| StorageError::Unavailable(format!("upload request failed: {}", err)))?;
        let resp = Self::ensure_success(resp, "upload").await?;

        let parsed: UploadResponse = resp.json().await.map_err(|err| {
            StorageError::Unavailable(format!("unreadable upload response: {}", err))
        })?;

        debug!(
            public_id = %parsed.public_id,
            resource_type = %options.resource_type,
            "storage: upload accepted"
        );

        Ok(StoredObject {
            secure_url: parsed.secure_url,
            public_id: parsed.public_id,
            duration: parsed.duration,
            format: parsed.format,
        })
    }

    async fn destroy(
        &self,
        public_id: &str,
        resource_type: ResourceType,
    ) -> Result<(), StorageError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", Utc::now().timestamp().to_string());

        let resp = self
            .http
            .post(self.endpoint(resource_type, "destroy"))
            .form(&self.signed_fields(params))
            .send()
            .await
            .map_err(|err| StorageError::Unavailable(format!("destroy request failed: {}", err)))?;
        let resp = Self::ensure_success(resp, "destroy").await?;

        let parsed: DestroyResponse = resp.json().await.map_err(|err| {
            StorageError::Unavailable(format!("unreadable destroy response: {}", err))
        })?;

        match parsed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(StorageError::Unavailable(format!(
                "destroy of {} returned '{}'",
                public_id, other
            ))),
        }
    }
}

/// `sha256("k1=v1&k2=v2...<secret>")` over the sorted parameters, hex encoded.
fn sign(params: &BTreeMap<&'static str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn classify_status(status: StatusCode, message: String) -> StorageError {
    let code = status.as_u16();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StorageError::Unauthorized {
            status: code,
            message,
        },
        StatusCode::PAYLOAD_TOO_LARGE => StorageError::PayloadTooLarge {
            status: code,
            message,
        },
        StatusCode::BAD_REQUEST if message.to_ascii_lowercase().contains("too large") => {
            StorageError::PayloadTooLarge {
                status: code,
                message,
            }
        }
        _ => StorageError::Unavailable(format!("status {}: {}", code, message)),
    }
}
