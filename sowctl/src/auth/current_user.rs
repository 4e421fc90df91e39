//! Request extractor for the authenticated user.

use crate::{
    api::models::users::CurrentUser,
    auth::token,
    errors::{Error, Result},
    AppState,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{instrument, trace};

/// Pull the bearer token out of the Authorization header, if any.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(token) = bearer_token(parts) else {
            trace!("No bearer token on request");
            return Err(Error::Unauthenticated { message: None });
        };

        token::verify_access_token(token, &state.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::test_utils::{create_test_app, create_test_user};
    use axum::http::StatusCode;
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_missing_token_is_rejected(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server.get("/sows").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    async fn test_garbage_token_is_rejected(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server.get("/sows").authorization_bearer("not-a-jwt").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        // Non-bearer scheme is treated as absent credentials
        let response = server.get("/sows").authorization("Basic dXNlcjpwYXNz").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    async fn test_valid_token_is_accepted(pool: PgPool) {
        create_test_user(&pool, "worker", "pw123456", vec![Role::Employee], true).await;
        let server = create_test_app(pool).await;

        let login = server
            .post("/auth")
            .json(&serde_json::json!({"username": "worker", "password": "pw123456"}))
            .await;
        login.assert_status_ok();
        let token = login.json::<serde_json::Value>()["accessToken"].as_str().unwrap().to_string();

        let response = server.get("/sows").authorization_bearer(&token).await;
        // No records yet, but the request got past authentication
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
