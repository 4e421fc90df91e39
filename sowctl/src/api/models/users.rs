//! API models for users.
//!
//! User accounts are provisioned out of band (startup bootstrap or direct
//! database administration); there are no user CRUD endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Role enum for different job functions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Employee,
    Manager,
    Admin,
}

/// The authenticated caller, as carried by a verified access token.
///
/// This never touches the database: the claims embedded at login/refresh time
/// are the source of truth for the token's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    pub username: String,
    pub roles: Vec<Role>,
}
