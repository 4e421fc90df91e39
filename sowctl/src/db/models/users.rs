//! Database models for users.

use crate::api::models::users::Role;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row as stored.
///
/// `password_hash` holds an Argon2 PHC string for every record written by
/// this service; rows imported from the legacy system may still hold
/// plaintext, which [`crate::auth::password::verify_password`] tolerates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub username: String,
    /// Already hashed. Hashing is the caller's responsibility so that the
    /// blocking work can be scheduled off the async runtime.
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub active: bool,
}
