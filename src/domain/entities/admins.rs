use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::admins;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = admins)]
pub struct AdminEntity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admins)]
pub struct RegisterAdminEntity {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
