use std::time::Duration;

use super::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub storage: Storage,
    pub admin_secret: AdminSecret,
    pub uploads: Uploads,
    pub cors: Cors,
    pub stage: Stage,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    /// MiB
    pub body_limit: u64,
    /// Seconds
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Storage {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
    pub audio_folder: String,
    pub image_folder: String,
    pub image_transformation: Option<String>,
    pub upload_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AdminSecret {
    pub secret: String,
    pub token_ttl_days: i64,
}

#[derive(Debug, Clone)]
pub struct Uploads {
    pub temp_dir: String,
    pub static_dir: String,
    pub audio_max_bytes: u64,
    pub image_max_bytes: u64,
    pub allowed_audio_extensions: Vec<String>,
    pub allowed_image_extensions: Vec<String>,
    pub delete_remote_on_track_delete: bool,
    pub admin_auth_required: bool,
}

#[derive(Debug, Clone)]
pub struct Cors {
    pub allowed_origins: Vec<String>,
}
