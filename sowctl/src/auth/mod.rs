//! Authentication: password hashing, JWT issuance, and request extraction.

pub mod current_user;
pub mod password;
pub mod token;
