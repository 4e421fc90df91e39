//! API request/response models for authentication.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login credentials. Both fields are optional at the wire level so the
/// handler can answer 400 for an incomplete payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Body returned by login and refresh. The refresh token is never part of the
/// body; it travels only in the session cookie.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Generic confirmation message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Structured response for successful login: access token body plus the
/// refresh-token cookie.
pub struct LoginResponse {
    pub body: AccessTokenResponse,
    pub cookie: String,
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(header::SET_COOKIE, self.cookie.parse().unwrap());
        (StatusCode::OK, headers, Json(self.body)).into_response()
    }
}

/// Structured response for logout. Logout without a session cookie is a
/// deliberate no-op and answers 204.
pub enum LogoutResponse {
    NoSession,
    Cleared { cookie: String },
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response {
        match self {
            LogoutResponse::NoSession => StatusCode::NO_CONTENT.into_response(),
            LogoutResponse::Cleared { cookie } => {
                let mut headers = HeaderMap::new();
                headers.insert(header::SET_COOKIE, cookie.parse().unwrap());
                (
                    StatusCode::OK,
                    headers,
                    Json(MessageResponse {
                        message: "Cookie cleared".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
