//! Database record models matching table schemas.
//!
//! Each struct corresponds to a table row and derives `sqlx::FromRow` for
//! query results. Write requests are separate types so the repositories can
//! control identity and timestamp assignment.

pub mod sows;
pub mod users;
