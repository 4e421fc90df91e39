//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! Endpoints are documented with OpenAPI annotations using `utoipa`; the
//! rendered documentation is served at `/docs`.

pub mod handlers;
pub mod models;
