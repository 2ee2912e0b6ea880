use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result};

use crate::application::usercases::upload_validator::{
    DEFAULT_AUDIO_EXTENSIONS, DEFAULT_IMAGE_EXTENSIONS,
};

use super::{
    config_model::{AdminSecret, Cors, Database, DotEnvyConfig, Server, Storage, Uploads},
    stage::Stage,
};

const MIB: u64 = 1024 * 1024;
const MAX_TOKEN_TTL_DAYS: i64 = 365;

pub fn load() -> Result<DotEnvyConfig> {
    load_from(|key| std::env::var(key).ok())
}

/// Builds the config from an arbitrary variable lookup so it can be exercised without
/// touching the process environment.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvReader { lookup };

    let server = Server {
        port: env.parse_or("SERVER_PORT", 4000)?,
        body_limit: env.parse_or("SERVER_BODY_LIMIT", 40)?,
        timeout: env.parse_or("SERVER_TIMEOUT", 120)?,
    };

    let database = Database {
        url: env.required("DATABASE_URL")?,
    };

    let storage = Storage {
        cloud_name: env.required("STORAGE_CLOUD_NAME")?,
        api_key: env.required("STORAGE_API_KEY")?,
        api_secret: env.required("STORAGE_API_SECRET")?,
        api_base: env
            .optional("STORAGE_API_BASE")
            .unwrap_or_else(|| "https://api.cloudinary.com/v1_1".to_string()),
        audio_folder: env
            .optional("STORAGE_AUDIO_FOLDER")
            .unwrap_or_else(|| "audio".to_string()),
        image_folder: env
            .optional("STORAGE_IMAGE_FOLDER")
            .unwrap_or_else(|| "image".to_string()),
        image_transformation: match env.optional("STORAGE_IMAGE_TRANSFORMATION") {
            Some(raw) if raw.eq_ignore_ascii_case("none") => None,
            Some(raw) => Some(raw),
            None => Some("c_limit,w_1000,h_1000,q_auto".to_string()),
        },
        upload_timeout: Duration::from_secs(env.parse_or("STORAGE_UPLOAD_TIMEOUT", 60)?),
    };

    let admin_secret = AdminSecret {
        secret: env.required("JWT_SECRET")?,
        token_ttl_days: env.parse_or("JWT_TTL_DAYS", 7)?,
    };
    if !(1..=MAX_TOKEN_TTL_DAYS).contains(&admin_secret.token_ttl_days) {
        anyhow::bail!("JWT_TTL_DAYS must be between 1 and {}", MAX_TOKEN_TTL_DAYS);
    }

    let audio_max_mb: u64 = env.parse_or("AUDIO_MAX_SIZE_MB", 20)?;
    let image_max_mb: u64 = env.parse_or("IMAGE_MAX_SIZE_MB", 5)?;

    let uploads = Uploads {
        temp_dir: env
            .optional("TEMP_UPLOAD_DIR")
            .unwrap_or_else(|| "uploads/tmp".to_string()),
        static_dir: env
            .optional("UPLOADS_STATIC_DIR")
            .unwrap_or_else(|| "uploads".to_string()),
        audio_max_bytes: audio_max_mb
            .checked_mul(MIB)
            .context("AUDIO_MAX_SIZE_MB is too large")?,
        image_max_bytes: image_max_mb
            .checked_mul(MIB)
            .context("IMAGE_MAX_SIZE_MB is too large")?,
        allowed_audio_extensions: env
            .optional("ALLOWED_AUDIO_EXTENSIONS")
            .map(|raw| parse_list(&raw, true))
            .unwrap_or_else(|| to_owned_list(DEFAULT_AUDIO_EXTENSIONS)),
        allowed_image_extensions: env
            .optional("ALLOWED_IMAGE_EXTENSIONS")
            .map(|raw| parse_list(&raw, true))
            .unwrap_or_else(|| to_owned_list(DEFAULT_IMAGE_EXTENSIONS)),
        delete_remote_on_track_delete: env.parse_or("DELETE_REMOTE_ON_TRACK_DELETE", false)?,
        admin_auth_required: env.parse_or("ADMIN_AUTH_REQUIRED", true)?,
    };

    let cors = Cors {
        allowed_origins: env
            .optional("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_list(&raw, false))
            .unwrap_or_else(|| vec!["http://localhost:5173".to_string()]),
    };

    let stage = env
        .optional("STAGE")
        .map(|raw| Stage::try_from(&raw))
        .transpose()
        .context("STAGE is invalid")?
        .unwrap_or_default();

    Ok(DotEnvyConfig {
        server,
        database,
        storage,
        admin_secret,
        uploads,
        cors,
        stage,
    })
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)
            .with_context(|| format!("{} is invalid", key))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.optional(key) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("{} is invalid", key)),
            None => Ok(default),
        }
    }
}

fn parse_list(raw: &str, lowercase: bool) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().trim_start_matches('.'))
        .filter(|item| !item.is_empty())
        .map(|item| {
            if lowercase {
                item.to_ascii_lowercase()
            } else {
                item.to_string()
            }
        })
        .collect()
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
