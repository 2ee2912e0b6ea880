use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::admins::{AdminEntity, RegisterAdminEntity};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminModel {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<AdminEntity> for AdminModel {
    fn from(value: AdminEntity) -> Self {
        Self {
            id: value.id,
            username: value.username,
            email: value.email,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterAdminModel {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterAdminModel {
    pub fn to_entity(&self, password_hash: String) -> RegisterAdminEntity {
        RegisterAdminEntity {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password_hash,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginAdminModel {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginResult {
    pub user: AdminModel,
    pub token: String,
}
