//! Database models for Statement-of-Work records.

use crate::api::models::sows::SowType;
use crate::types::{SowId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Write request for a SoW row.
///
/// Creation and update share one shape because updates are full-replace:
/// every mutable column is overwritten, and optional fields left `None` are
/// stored as NULL.
#[derive(Debug, Clone)]
pub struct SowWriteDBRequest {
    pub user_id: UserId,
    pub name: String,
    pub sow_type: SowType,
    pub vms: Option<i32>,
    pub landing_zones: Option<i32>,
    pub engineer_hourly: Option<f64>,
    pub architect_hourly: Option<f64>,
    pub pm_hourly: Option<f64>,
    pub hours: Option<i32>,
    pub months: Option<i32>,
}

/// A SoW row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SowDBResponse {
    pub id: SowId,
    pub user_id: UserId,
    pub name: String,
    pub sow_type: SowType,
    pub vms: Option<i32>,
    pub landing_zones: Option<i32>,
    pub engineer_hourly: Option<f64>,
    pub architect_hourly: Option<f64>,
    pub pm_hourly: Option<f64>,
    pub hours: Option<i32>,
    pub months: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
