//! API request and response data models.
//!
//! These structures define the public API contract and are distinct from the
//! database models in [`crate::db::models`], so storage and API
//! representations can evolve independently. All models carry `utoipa`
//! annotations for the generated OpenAPI docs.

pub mod auth;
pub mod sows;
pub mod users;
