use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::models::{
        auth::MessageResponse,
        sows::{SowCreate, SowDelete, SowResponse, SowUpdate},
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{sows::SowFilter, Repository, Sows, Users},
        models::sows::SowWriteDBRequest,
    },
    errors::Error,
    AppState,
};

fn sow_not_found() -> Error {
    Error::NotFound {
        message: "SoW not found".to_string(),
    }
}

/// Turn a wire payload into a write request, enforcing the presence of the
/// owner and name up front.
fn to_write_request(payload: SowCreate) -> Result<SowWriteDBRequest, Error> {
    let (Some(user_id), Some(name)) = (payload.user, payload.name.filter(|n| !n.is_empty())) else {
        return Err(Error::BadRequest {
            message: "Required fields are missing".to_string(),
        });
    };

    // A missing discriminant can never validate, same as a failed group check
    let sow_type = payload.sow_type.ok_or_else(|| Error::BadRequest {
        message: "Invalid SoW data received".to_string(),
    })?;

    Ok(SowWriteDBRequest {
        user_id,
        name,
        sow_type,
        vms: payload.vms,
        landing_zones: payload.landing_zones,
        engineer_hourly: payload.engineer_hourly,
        architect_hourly: payload.architect_hourly,
        pm_hourly: payload.pm_hourly,
        hours: payload.hours,
        months: payload.months,
    })
}

/// Validation and reference failures on writes share one client-facing message.
fn map_write_error(err: DbError) -> Error {
    match err {
        DbError::CheckViolation { .. } | DbError::ForeignKeyViolation { .. } => Error::BadRequest {
            message: "Invalid SoW data received".to_string(),
        },
        other => Error::Database(other),
    }
}

/// List all SoWs, enriched with owner usernames
#[utoipa::path(
    get,
    path = "/sows",
    tag = "sows",
    responses(
        (status = 200, description = "All SoW records", body = Vec<SowResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No records exist"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_sows(State(state): State<AppState>, _user: CurrentUser) -> Result<Json<Vec<SowResponse>>, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let sows = Sows::new(&mut pool_conn).list(&SowFilter::default()).await?;
    if sows.is_empty() {
        return Err(Error::NotFound {
            message: "No SoWs found".to_string(),
        });
    }

    let mut owner_ids: Vec<_> = sows.iter().map(|s| s.user_id).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();
    let usernames = Users::new(&mut pool_conn).get_usernames(&owner_ids).await?;

    let responses = sows
        .into_iter()
        .map(|sow| {
            // Every record references a live user via FK, so a miss here
            // means the store is inconsistent
            let username = usernames.get(&sow.user_id).cloned().ok_or_else(|| Error::Internal {
                operation: format!("resolve owner of SoW {}", sow.id),
            })?;
            Ok(SowResponse::from_record(sow, username))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(Json(responses))
}

/// Create a new SoW
#[utoipa::path(
    post,
    path = "/sows",
    request_body = SowCreate,
    tag = "sows",
    responses(
        (status = 201, description = "SoW created", body = MessageResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_sow(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(payload): Json<SowCreate>,
) -> Result<(StatusCode, Json<MessageResponse>), Error> {
    let request = to_write_request(payload)?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    Sows::new(&mut pool_conn).create(&request).await.map_err(map_write_error)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "New SoW created".to_string(),
        }),
    ))
}

/// Replace an existing SoW
#[utoipa::path(
    patch,
    path = "/sows",
    request_body = SowUpdate,
    tag = "sows",
    responses(
        (status = 200, description = "SoW updated", body = MessageResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No SoW with this id"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_sow(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(payload): Json<SowUpdate>,
) -> Result<Json<MessageResponse>, Error> {
    let request = to_write_request(payload.fields)?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let updated = Sows::new(&mut pool_conn)
        .update(payload.id, &request)
        .await
        .map_err(|e| match e {
            DbError::NotFound => sow_not_found(),
            other => map_write_error(other),
        })?;

    Ok(Json(MessageResponse {
        message: format!("'{}' updated", updated.name),
    }))
}

/// Delete a SoW
#[utoipa::path(
    delete,
    path = "/sows",
    request_body = SowDelete,
    tag = "sows",
    responses(
        (status = 200, description = "SoW deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No SoW with this id"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_sow(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(payload): Json<SowDelete>,
) -> Result<Json<MessageResponse>, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let deleted = Sows::new(&mut pool_conn)
        .delete(payload.id)
        .await?
        .ok_or_else(sow_not_found)?;

    Ok(Json(MessageResponse {
        message: format!("SoW '{}' with ID {} deleted", deleted.name, deleted.id),
    }))
}
