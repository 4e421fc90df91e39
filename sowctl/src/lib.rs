//! # sowctl: Statement-of-Work tracking service
//!
//! `sowctl` is a small backend service for managing Statement-of-Work (SoW)
//! records: scoped engagements with conditional pricing fields depending on
//! the engagement type. It exposes a JSON API for authentication and SoW
//! CRUD, backed by PostgreSQL.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL (via sqlx) for persistence.
//!
//! The **API layer** ([`api`]) has two surfaces: public authentication routes
//! (`/auth`, `/auth/refresh`, `/auth/logout`) and bearer-protected SoW routes
//! (`/sows`). Authentication uses two JWTs signed with distinct secrets: a
//! short-lived access token returned in the response body, and a long-lived
//! refresh token carried in an HttpOnly cookie. Handlers pull the caller out
//! of the `Authorization` header with the [`api::models::users::CurrentUser`]
//! extractor.
//!
//! The **database layer** ([`db`]) uses the repository pattern: each entity
//! has a repository over `&mut PgConnection` that handles queries and maps
//! constraint failures into [`db::errors::DbError`]. SoW writes run the
//! conditional required-field rules from [`validation`] before touching the
//! table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use sowctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = sowctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     sowctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::models::users::Role,
    auth::password,
    config::BootstrapUserConfig,
    db::handlers::Users,
    db::models::users::UserCreateDBRequest,
    openapi::ApiDoc,
};
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, instrument, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{SowId, UserId};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the sowctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the configured bootstrap user if it doesn't exist.
///
/// Idempotent: an existing user (matched by username, ignoring case) gets its
/// password re-hashed to the configured value, so the configured credentials
/// always work after startup.
#[instrument(skip_all, fields(username = %bootstrap.username))]
pub async fn create_bootstrap_user(bootstrap: &BootstrapUserConfig, db: &PgPool) -> anyhow::Result<UserId> {
    let pwd = bootstrap.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&pwd)).await??;

    let mut conn = db.acquire().await?;
    let mut user_repo = Users::new(&mut conn);

    if let Some(existing) = user_repo.get_by_username(&bootstrap.username).await? {
        user_repo.update_password_hash(existing.id, &password_hash).await?;
        return Ok(existing.id);
    }

    let roles = if bootstrap.roles.is_empty() {
        vec![Role::Admin]
    } else {
        bootstrap.roles.clone()
    };

    let created = user_repo
        .create(&UserCreateDBRequest {
            username: bootstrap.username.clone(),
            password_hash,
            roles,
            active: true,
        })
        .await?;

    info!("Created bootstrap user");
    Ok(created.id)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.auth.cors.allowed_origins {
        origins.push(origin.parse::<HeaderValue>()?);
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.auth.cors.allow_credentials)
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::AUTHORIZATION])
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
        ]))
}

/// Build the application router with all endpoints and middleware.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/auth", post(api::handlers::auth::login))
        .route("/auth/refresh", get(api::handlers::auth::refresh))
        .route("/auth/logout", post(api::handlers::auth::logout))
        .route(
            "/sows",
            get(api::handlers::sows::list_sows)
                .post(api::handlers::sows::create_sow)
                .patch(api::handlers::sows::update_sow)
                .delete(api::handlers::sows::delete_sow),
        )
        .with_state(state.clone())
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, and creates the bootstrap user
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;

        Self::new_with_pool(config, pool).await
    }

    /// Create an application around an existing pool (used by tests)
    pub async fn new_with_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        migrator().run(&pool).await?;

        if let Some(bootstrap) = &config.bootstrap_user {
            create_bootstrap_user(bootstrap, &pool).await?;
        }

        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// The configured router (for tests)
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("sowctl listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::create_bootstrap_user;
    use crate::api::models::users::Role;
    use crate::config::BootstrapUserConfig;
    use crate::db::handlers::Users;
    use crate::test_utils::{create_test_app, login};
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_healthz(pool: PgPool) {
        let server = create_test_app(pool).await;
        let response = server.get("/healthz").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "OK");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_bootstrap_user_is_idempotent(pool: PgPool) {
        let bootstrap = BootstrapUserConfig {
            username: "root".to_string(),
            password: "first-password".to_string(),
            roles: vec![Role::Admin],
        };

        let first = create_bootstrap_user(&bootstrap, &pool).await.unwrap();

        // Second run with a new password keeps the user and rotates the credential
        let rotated = BootstrapUserConfig {
            password: "second-password".to_string(),
            ..bootstrap
        };
        let second = create_bootstrap_user(&rotated, &pool).await.unwrap();
        assert_eq!(first, second);

        let server = create_test_app(pool.clone()).await;
        login(&server, "root", "second-password").await;

        let mut conn = pool.acquire().await.unwrap();
        let user = Users::new(&mut conn).get_by_username("root").await.unwrap().unwrap();
        assert_eq!(user.roles, vec![Role::Admin]);
    }
}
