pub mod jwt_model;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::infrastructure::jwt_authentication::jwt_model::Claims;

pub fn generate_token(admin_id: Uuid, secret: &str, ttl_days: i64) -> Result<String> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::days(ttl_days))
        .ok_or_else(|| anyhow::anyhow!("failed to compute token expiration"))?;

    let claims = Claims {
        sub: admin_id.to_string(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("failed to sign admin token")
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .context("admin token validation failed")?;

    Ok(token_data.claims)
}
