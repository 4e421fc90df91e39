//! API request/response models for Statement-of-Work records.

use crate::db::models::sows::SowDBResponse;
use crate::types::{SowId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The discriminant selecting which required-field group applies to a SoW.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "sow_type")]
pub enum SowType {
    #[serde(rename = "Lift and shift")]
    LiftAndShift,
    #[serde(rename = "Arc as a Service")]
    ArcAsAService,
}

/// Candidate SoW payload for creation.
///
/// Every field is optional at the wire level; presence rules are enforced by
/// the handler pre-check (`user`, `name`) and the write-time validation in
/// the repository (conditional group by `type`). Fields belonging to the
/// group the discriminant does not select are accepted and ignored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SowCreate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub user: Option<UserId>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub sow_type: Option<SowType>,
    pub vms: Option<i32>,
    pub landing_zones: Option<i32>,
    pub engineer_hourly: Option<f64>,
    pub architect_hourly: Option<f64>,
    pub pm_hourly: Option<f64>,
    pub hours: Option<i32>,
    pub months: Option<i32>,
}

/// Full-replace update payload. Callers must resend the complete record:
/// absent optional fields are cleared, not preserved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SowUpdate {
    #[schema(value_type = String, format = "uuid")]
    pub id: SowId,
    #[serde(flatten)]
    pub fields: SowCreate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SowDelete {
    #[schema(value_type = String, format = "uuid")]
    pub id: SowId,
}

/// A SoW record enriched with its owning user's display name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SowResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: SowId,
    #[serde(rename = "user")]
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub username: String,
    pub name: String,
    #[serde(rename = "type")]
    pub sow_type: SowType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing_zones: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engineer_hourly: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architect_hourly: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm_hourly: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SowResponse {
    pub fn from_record(sow: SowDBResponse, username: String) -> Self {
        Self {
            id: sow.id,
            user_id: sow.user_id,
            username,
            name: sow.name,
            sow_type: sow.sow_type,
            vms: sow.vms,
            landing_zones: sow.landing_zones,
            engineer_hourly: sow.engineer_hourly,
            architect_hourly: sow.architect_hourly,
            pm_hourly: sow.pm_hourly,
            hours: sow.hours,
            months: sow.months,
            created_at: sow.created_at,
            updated_at: sow.updated_at,
        }
    }
}
