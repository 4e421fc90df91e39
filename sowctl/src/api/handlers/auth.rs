use axum::{extract::State, http::request::Parts, Json};

use crate::{
    api::models::{
        auth::{AccessTokenResponse, LoginRequest, LoginResponse, LogoutResponse},
        users::CurrentUser,
    },
    auth::{password, token},
    db::handlers::Users,
    errors::Error,
    AppState,
};

/// Build the refresh-token session cookie.
///
/// SameSite=None because the API and its frontends are served from different
/// origins; CORS with credentials covers the rest.
fn create_session_cookie(token: &str, config: &crate::config::Config) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=None; Max-Age={}",
        config.auth.cookie_name,
        token,
        config.auth.refresh_token_ttl.as_secs()
    )
}

/// Find the session cookie's value on an incoming request, if present.
fn session_cookie_value(parts: &Parts, config: &crate::config::Config) -> Option<String> {
    let cookie_str = parts.headers.get(axum::http::header::COOKIE)?.to_str().ok()?;

    for cookie in cookie_str.split(';') {
        if let Some((name, value)) = cookie.trim().split_once('=') {
            if name == config.auth.cookie_name {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/auth",
    request_body = LoginRequest,
    tag = "auth",
    responses(
        (status = 200, description = "Login successful", body = AccessTokenResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<LoginResponse, Error> {
    let (Some(username), Some(password)) = (
        request.username.filter(|u| !u.is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(Error::BadRequest {
            message: "All fields are required".to_string(),
        });
    };

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    // Username lookup ignores case
    let user = user_repo
        .get_by_username(&username)
        .await?
        .filter(|u| u.active)
        .ok_or(Error::Unauthenticated { message: None })?;

    // Verify password on a blocking thread to avoid blocking async runtime
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::Unauthenticated { message: None });
    }

    let current_user = CurrentUser {
        username: user.username.clone(),
        roles: user.roles.clone(),
    };
    let access_token = token::create_access_token(&current_user, &state.config)?;
    let refresh_token = token::create_refresh_token(&user.username, &state.config)?;

    let cookie = create_session_cookie(&refresh_token, &state.config);

    Ok(LoginResponse {
        body: AccessTokenResponse { access_token },
        cookie,
    })
}

/// Exchange the session cookie for a fresh access token
#[utoipa::path(
    get,
    path = "/auth/refresh",
    tag = "auth",
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "No session cookie, or user no longer exists"),
        (status = 403, description = "Invalid or expired session"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn refresh(State(state): State<AppState>, parts: Parts) -> Result<Json<AccessTokenResponse>, Error> {
    let refresh_token = session_cookie_value(&parts, &state.config).ok_or(Error::Unauthenticated { message: None })?;

    // Invalid or expired refresh tokens answer 403, not 401
    let username = token::verify_refresh_token(&refresh_token, &state.config)?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    // The subject may have been removed or deactivated since the token was issued
    let user = user_repo
        .get_by_username(&username)
        .await?
        .filter(|u| u.active)
        .ok_or(Error::Unauthenticated { message: None })?;

    // Roles are re-read from the store, not echoed from the old token
    let current_user = CurrentUser {
        username: user.username,
        roles: user.roles,
    };
    let access_token = token::create_access_token(&current_user, &state.config)?;

    Ok(Json(AccessTokenResponse { access_token }))
}

/// Logout (clear session cookie)
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Cookie cleared"),
        (status = 204, description = "No session to clear"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, parts: Parts) -> Result<LogoutResponse, Error> {
    if session_cookie_value(&parts, &state.config).is_none() {
        return Ok(LogoutResponse::NoSession);
    }

    // Expired cookie with the same attributes clears the session client-side
    let cookie = format!(
        "{}=; Path=/; HttpOnly; Secure; SameSite=None; Max-Age=0",
        state.config.auth.cookie_name
    );

    Ok(LogoutResponse::Cleared { cookie })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::test_utils::{create_test_app, create_test_user};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_login_happy_path_sets_cookie(pool: PgPool) {
        create_test_user(&pool, "alice", "correct horse", vec![Role::Employee], true).await;
        let server = create_test_app(pool).await;

        let response = server
            .post("/auth")
            .json(&json!({"username": "alice", "password": "correct horse"}))
            .await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
        // The refresh token travels only in the cookie
        assert!(body.get("refreshToken").is_none());

        let cookie = response.header("set-cookie");
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("jwt="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Max-Age=604800"));
    }

    #[sqlx::test]
    async fn test_login_username_is_case_insensitive(pool: PgPool) {
        create_test_user(&pool, "Bob", "hunter2hunter2", vec![Role::Employee], true).await;
        let server = create_test_app(pool).await;

        let response = server
            .post("/auth")
            .json(&json!({"username": "bOB", "password": "hunter2hunter2"}))
            .await;
        response.assert_status_ok();
    }

    #[sqlx::test]
    async fn test_login_missing_fields(pool: PgPool) {
        let server = create_test_app(pool).await;

        for body in [json!({"username": "alice"}), json!({"password": "x"}), json!({"username": "", "password": "x"})] {
            let response = server.post("/auth").json(&body).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<Value>()["message"], "All fields are required");
        }
    }

    #[sqlx::test]
    async fn test_login_rejects_bad_credentials(pool: PgPool) {
        create_test_user(&pool, "carol", "right-password", vec![Role::Employee], true).await;
        create_test_user(&pool, "dave", "whatever-pass", vec![Role::Employee], false).await;
        let server = create_test_app(pool).await;

        // Unknown user
        let response = server
            .post("/auth")
            .json(&json!({"username": "mallory", "password": "right-password"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        // Wrong password
        let response = server
            .post("/auth")
            .json(&json!({"username": "carol", "password": "wrong-password"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        // Deactivated account
        let response = server
            .post("/auth")
            .json(&json!({"username": "dave", "password": "whatever-pass"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    async fn test_refresh_returns_fresh_access_token(pool: PgPool) {
        create_test_user(&pool, "erin", "pass-phrase-1", vec![Role::Manager], true).await;
        let server = create_test_app(pool).await;

        let login = server
            .post("/auth")
            .json(&json!({"username": "erin", "password": "pass-phrase-1"}))
            .await;
        login.assert_status_ok();

        // TestServer persists cookies from the login response
        let response = server.get("/auth/refresh").await;
        response.assert_status_ok();
        assert!(response.json::<Value>()["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[sqlx::test]
    async fn test_refresh_without_cookie(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server.get("/auth/refresh").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    async fn test_refresh_with_tampered_cookie(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server
            .get("/auth/refresh")
            .add_header("cookie", "jwt=eyJhbGciOiJIUzI1NiJ9.garbage.sig")
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[sqlx::test]
    async fn test_logout(pool: PgPool) {
        create_test_user(&pool, "frank", "some-password", vec![Role::Employee], true).await;
        let server = create_test_app(pool).await;

        // Without a session there is nothing to clear
        let response = server.post("/auth/logout").await;
        response.assert_status(StatusCode::NO_CONTENT);

        server
            .post("/auth")
            .json(&json!({"username": "frank", "password": "some-password"}))
            .await
            .assert_status_ok();

        let response = server.post("/auth/logout").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["message"], "Cookie cleared");

        let cookie = response.header("set-cookie");
        assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
    }
}
