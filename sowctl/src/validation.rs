//! Write-time validation for SoW payloads.
//!
//! Required-field rules are conditional on the `sow_type` discriminant: a
//! `LiftAndShift` engagement is priced per VM and landing zone with three
//! hourly rates, while an `ArcAsAService` engagement is priced as hours over
//! months. Exactly one group must be fully populated; the other group's
//! fields are irrelevant to the record and are not checked.
//!
//! The [`crate::db::handlers::sows::Sows`] repository calls this on every
//! create and update, so no invalid record can reach storage regardless of
//! which handler wrote it. There is no read-time validation.

use crate::api::models::sows::SowType;
use crate::db::models::sows::SowWriteDBRequest;

/// Field names required for every `LiftAndShift` record.
const LIFT_AND_SHIFT_FIELDS: [&str; 5] = ["vms", "landing_zones", "engineer_hourly", "architect_hourly", "pm_hourly"];

/// Field names required for every `ArcAsAService` record.
const ARC_AS_A_SERVICE_FIELDS: [&str; 2] = ["hours", "months"];

/// Validate a candidate SoW write, returning the missing field names on failure.
///
/// `user` is structurally present on [`SowWriteDBRequest`]; the empty-name
/// rule is checked here because the wire payload allows blank strings.
pub fn validate_sow(request: &SowWriteDBRequest) -> Result<(), Vec<&'static str>> {
    let mut missing = Vec::new();

    if request.name.trim().is_empty() {
        missing.push("name");
    }

    let group: &[(&'static str, bool)] = match request.sow_type {
        SowType::LiftAndShift => &[
            (LIFT_AND_SHIFT_FIELDS[0], request.vms.is_some()),
            (LIFT_AND_SHIFT_FIELDS[1], request.landing_zones.is_some()),
            (LIFT_AND_SHIFT_FIELDS[2], request.engineer_hourly.is_some()),
            (LIFT_AND_SHIFT_FIELDS[3], request.architect_hourly.is_some()),
            (LIFT_AND_SHIFT_FIELDS[4], request.pm_hourly.is_some()),
        ],
        SowType::ArcAsAService => &[
            (ARC_AS_A_SERVICE_FIELDS[0], request.hours.is_some()),
            (ARC_AS_A_SERVICE_FIELDS[1], request.months.is_some()),
        ],
    };

    for (field, present) in group {
        if !present {
            missing.push(field);
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}
