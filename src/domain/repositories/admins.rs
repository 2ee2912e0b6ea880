use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::admins::{AdminEntity, RegisterAdminEntity};

#[automock]
#[async_trait]
pub trait AdminRepository {
    async fn register(&self, register_admin_entity: RegisterAdminEntity) -> Result<Uuid>;

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminEntity>>;
}
