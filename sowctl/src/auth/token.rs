//! JWT access and refresh token creation and verification.
//!
//! Two independent token kinds, signed with distinct secrets:
//! short-lived access tokens carried as `Authorization: Bearer`, and
//! long-lived refresh tokens carried in an HttpOnly cookie. Verification
//! failures map to client errors (401 for access, 403 for refresh) while
//! key or crypto failures stay server errors.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    api::models::users::{CurrentUser, Role},
    config::Config,
    errors::Error,
};

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub username: String, // Username
    pub roles: Vec<Role>, // User roles
    pub exp: i64,         // Expiration time
    pub iat: i64,         // Issued at
}

/// Claims carried by a refresh token
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub username: String, // Username
    pub exp: i64,         // Expiration time
    pub iat: i64,         // Issued at
}

impl From<AccessClaims> for CurrentUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            username: claims.username,
            roles: claims.roles,
        }
    }
}

fn access_secret(config: &Config) -> Result<&str, Error> {
    config.access_token_secret.as_deref().ok_or_else(|| Error::Internal {
        operation: "JWT: access_token_secret is required".to_string(),
    })
}

fn refresh_secret(config: &Config) -> Result<&str, Error> {
    config.refresh_token_secret.as_deref().ok_or_else(|| Error::Internal {
        operation: "JWT: refresh_token_secret is required".to_string(),
    })
}

/// Create an access token for a user
pub fn create_access_token(user: &CurrentUser, config: &Config) -> Result<String, Error> {
    let now = Utc::now();
    let claims = AccessClaims {
        username: user.username.clone(),
        roles: user.roles.clone(),
        exp: (now + config.auth.access_token_ttl).timestamp(),
        iat: now.timestamp(),
    };

    let key = EncodingKey::from_secret(access_secret(config)?.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Create a refresh token for a user
pub fn create_refresh_token(username: &str, config: &Config) -> Result<String, Error> {
    let now = Utc::now();
    let claims = RefreshClaims {
        username: username.to_string(),
        exp: (now + config.auth.refresh_token_ttl).timestamp(),
        iat: now.timestamp(),
    };

    let key = EncodingKey::from_secret(refresh_secret(config)?.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Map a token decode failure to the right response class.
///
/// `client_error` is returned for anything the caller sent us broken;
/// key and crypto problems become server errors.
fn map_decode_error(e: jsonwebtoken::errors::Error, client_error: Error) -> Error {
    match e.kind() {
        // Client errors - malformed tokens, invalid claims, expired tokens
        jsonwebtoken::errors::ErrorKind::InvalidToken
        | jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::ExpiredSignature
        | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
        | jsonwebtoken::errors::ErrorKind::InvalidIssuer
        | jsonwebtoken::errors::ErrorKind::InvalidAudience
        | jsonwebtoken::errors::ErrorKind::InvalidSubject
        | jsonwebtoken::errors::ErrorKind::ImmatureSignature
        | jsonwebtoken::errors::ErrorKind::Base64(_)
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => client_error,

        // Server errors (500) - key issues, internal failures
        jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_)
        | jsonwebtoken::errors::ErrorKind::RsaFailedSigning
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName
        | jsonwebtoken::errors::ErrorKind::InvalidKeyFormat
        | jsonwebtoken::errors::ErrorKind::MissingAlgorithm
        | jsonwebtoken::errors::ErrorKind::Json(_)
        | jsonwebtoken::errors::ErrorKind::Utf8(_)
        | jsonwebtoken::errors::ErrorKind::Crypto(_) => Error::Internal {
            operation: format!("JWT verification: {e}"),
        },

        // Catch-all for any future error variants (default to server error for safety)
        _ => Error::Internal {
            operation: format!("JWT verification (unknown error): {e}"),
        },
    }
}

/// Verify and decode an access token
pub fn verify_access_token(token: &str, config: &Config) -> Result<CurrentUser, Error> {
    let key = DecodingKey::from_secret(access_secret(config)?.as_bytes());
    let token_data = decode::<AccessClaims>(token, &key, &Validation::default())
        .map_err(|e| map_decode_error(e, Error::Unauthenticated { message: None }))?;

    Ok(CurrentUser::from(token_data.claims))
}

/// Verify and decode a refresh token, returning the subject username
pub fn verify_refresh_token(token: &str, config: &Config) -> Result<String, Error> {
    let key = DecodingKey::from_secret(refresh_secret(config)?.as_bytes());
    let token_data = decode::<RefreshClaims>(token, &key, &Validation::default())
        .map_err(|e| map_decode_error(e, Error::Forbidden { message: None }))?;

    Ok(token_data.claims.username)
}
