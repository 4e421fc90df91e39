//! Repository implementations for database access.
//!
//! Each repository wraps a `&mut PgConnection`, provides strongly-typed CRUD
//! operations, and returns domain models from [`crate::db::models`]. The
//! [`Repository`] trait defines the common operation set; [`Users`] stays a
//! plain struct because its surface (credential lookup, bulk username
//! resolution) does not match the trait.

pub mod repository;
pub mod sows;
pub mod users;

pub use repository::Repository;
pub use sows::Sows;
pub use users::Users;
