use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    application::usercases::{
        admin_auth::AdminAuthError, catalog::CatalogError, track_upload::UploadError,
    },
    config::stage::Stage,
    infrastructure::axum_http::multipart::IntakeError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Failure envelope returned by every route. Raw detail is only attached on stages that
/// expose it.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>, stage: Stage) -> Self {
        if stage.exposes_error_detail() {
            self.detail = Some(detail.into());
        }
        self
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// Missing content type, unreadable JSON, or a body that does not fit the model.
    pub fn json_body(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_BODY", rejection.body_text())
    }

    pub fn upload(err: UploadError, stage: Stage) -> Self {
        let detail = err.to_string();
        let api_error = match &err {
            UploadError::MissingFile(_) => {
                Self::new(StatusCode::BAD_REQUEST, "MISSING_FILE", detail.clone())
            }
            UploadError::MissingField(_) => {
                Self::new(StatusCode::BAD_REQUEST, "MISSING_FIELD", detail.clone())
            }
            UploadError::InvalidAudioFormat { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_AUDIO_FORMAT", detail.clone())
            }
            UploadError::InvalidImageFormat { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_IMAGE_FORMAT", detail.clone())
            }
            UploadError::FileTooLarge { .. } => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE", detail.clone())
            }
            UploadError::StorageUnavailable { .. } => Self::new(
                StatusCode::BAD_GATEWAY,
                "STORAGE_UNAVAILABLE",
                "Storage provider is unavailable, please submit the track again",
            ),
            UploadError::StorageAuthFailed { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_AUTH_FAILED",
                "Storage provider rejected the server credentials",
            ),
            UploadError::RecordRejected(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "RECORD_REJECTED",
                "Track record was rejected by the store",
            ),
            UploadError::StoreUnavailable(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_UNAVAILABLE",
                "Track store is unavailable",
            ),
        };

        if err.is_validation() {
            api_error
        } else {
            api_error.with_detail(detail, stage)
        }
    }

    pub fn intake(err: IntakeError, stage: Stage) -> Self {
        match &err {
            IntakeError::Malformed(_) => {
                Self::new(StatusCode::BAD_REQUEST, "MALFORMED_MULTIPART", err.to_string())
            }
            IntakeError::BodyTooLarge(_) => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE", err.to_string())
            }
            IntakeError::UnexpectedField(_) => {
                Self::new(StatusCode::BAD_REQUEST, "UNEXPECTED_FIELD", err.to_string())
            }
            IntakeError::DuplicateFile(_) => {
                Self::new(StatusCode::BAD_REQUEST, "DUPLICATE_FILE", err.to_string())
            }
            IntakeError::Io(source) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTAKE_FAILED",
                "Failed to receive uploaded files",
            )
            .with_detail(source.to_string(), stage),
        }
    }

    pub fn catalog(err: CatalogError, stage: Stage) -> Self {
        match err {
            CatalogError::NotFound => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Music not found"),
            CatalogError::Internal(source) => Self::internal(source, stage),
        }
    }

    pub fn admin_auth(err: AdminAuthError, stage: Stage) -> Self {
        match err {
            AdminAuthError::MissingFields => {
                Self::new(StatusCode::BAD_REQUEST, "MISSING_FIELDS", "All fields are required")
            }
            AdminAuthError::AdminNotFound => {
                Self::new(StatusCode::CONFLICT, "ADMIN_NOT_FOUND", "Admin not found")
            }
            AdminAuthError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid credentials",
            ),
            AdminAuthError::Internal(source) => Self::internal(source, stage),
        }
    }

    pub fn internal(source: anyhow::Error, stage: Stage) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
            "Internal server error",
        )
        .with_detail(format!("{:#}", source), stage)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            success: false,
            code: self.code,
            message: self.message,
            error: self.detail,
        });

        (self.status, body).into_response()
    }
}
