use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    domain::{
        repositories::admins::AdminRepository,
        value_objects::admins::{AdminModel, LoginAdminModel, LoginResult, RegisterAdminModel},
    },
    infrastructure::{argon2_hashing, jwt_authentication},
};

#[derive(Debug, Error)]
pub enum AdminAuthError {
    #[error("all fields are required")]
    MissingFields,

    #[error("admin not found")]
    AdminNotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct AdminTokenConfig {
    pub secret: String,
    pub ttl_days: i64,
}

pub struct AdminAuthUseCase<T>
where
    T: AdminRepository + Send + Sync + 'static,
{
    admin_repository: Arc<T>,
    token_config: AdminTokenConfig,
}

impl<T> AdminAuthUseCase<T>
where
    T: AdminRepository + Send + Sync + 'static,
{
    pub fn new(admin_repository: Arc<T>, token_config: AdminTokenConfig) -> Self {
        Self {
            admin_repository,
            token_config,
        }
    }

    pub async fn register(&self, register_admin_model: RegisterAdminModel) -> Result<(), AdminAuthError> {
        if is_blank(&register_admin_model.username)
            || is_blank(&register_admin_model.email)
            || is_blank(&register_admin_model.password)
        {
            return Err(AdminAuthError::MissingFields);
        }

        let password_hash = argon2_hashing::hash(register_admin_model.password.clone())?;

        let admin_id = self
            .admin_repository
            .register(register_admin_model.to_entity(password_hash))
            .await?;

        info!(%admin_id, "admin_auth: admin registered");

        Ok(())
    }

    pub async fn login(&self, login_admin_model: LoginAdminModel) -> Result<LoginResult, AdminAuthError> {
        let email = login_admin_model.email.trim();

        if email.is_empty() || login_admin_model.password.is_empty() {
            return Err(AdminAuthError::MissingFields);
        }

        let admin = self
            .admin_repository
            .find_by_email(email)
            .await?
            .ok_or(AdminAuthError::AdminNotFound)?;

        let matched =
            argon2_hashing::verify(login_admin_model.password, admin.password_hash.clone())?;
        if !matched {
            warn!(admin_id = %admin.id, "admin_auth: password mismatch");
            return Err(AdminAuthError::InvalidCredentials);
        }

        let token = jwt_authentication::generate_token(
            admin.id,
            &self.token_config.secret,
            self.token_config.ttl_days,
        )?;

        info!(admin_id = %admin.id, "admin_auth: admin logged in");

        Ok(LoginResult {
            user: AdminModel::from(admin),
            token,
        })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
