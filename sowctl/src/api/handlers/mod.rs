//! HTTP request handlers for all API endpoints.
//!
//! - [`auth`]: Login, token refresh, and logout
//! - [`sows`]: Statement-of-Work CRUD, all behind bearer authentication
//!
//! Handlers validate the request, call into the database repositories, and
//! serialize the response. Authentication is done by the
//! [`crate::api::models::users::CurrentUser`] extractor.

pub mod auth;
pub mod sows;
