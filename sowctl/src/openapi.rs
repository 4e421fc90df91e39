//! OpenAPI documentation configuration.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api;

/// Security scheme for SoW endpoints (short-lived JWT access token).
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearer_auth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token from `POST /auth`, sent as `Authorization: Bearer <token>`. \
                             Renew it via `GET /auth/refresh` when it expires.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::login,
        api::handlers::auth::refresh,
        api::handlers::auth::logout,
        api::handlers::sows::list_sows,
        api::handlers::sows::create_sow,
        api::handlers::sows::update_sow,
        api::handlers::sows::delete_sow,
    ),
    components(schemas(
        api::models::auth::LoginRequest,
        api::models::auth::AccessTokenResponse,
        api::models::auth::MessageResponse,
        api::models::sows::SowType,
        api::models::sows::SowCreate,
        api::models::sows::SowUpdate,
        api::models::sows::SowDelete,
        api::models::sows::SowResponse,
        api::models::users::Role,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login, token refresh, and logout"),
        (name = "sows", description = "Statement-of-Work records"),
    )
)]
pub struct ApiDoc;
