pub mod admin_auth;
pub mod catalog;
pub mod track_upload;
pub mod upload_validator;
