//! Test utilities for integration testing.

use crate::api::models::users::Role;
use crate::auth::password;
use crate::db::{handlers::Users, models::users::UserCreateDBRequest, models::users::UserDBResponse};
use axum_test::TestServer;
use sqlx::PgPool;

pub fn create_test_config() -> crate::config::Config {
    crate::config::Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        access_token_secret: Some("test-access-secret-for-testing-only".to_string()),
        refresh_token_secret: Some("test-refresh-secret-for-testing-only".to_string()),
        ..Default::default()
    }
}

/// Build a test server around an existing pool. Cookies persist across
/// requests, so a login is enough to exercise the refresh flow.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    let config = create_test_config();

    let app = crate::Application::new_with_pool(config, pool)
        .await
        .expect("Failed to create application");

    let mut server = TestServer::new(app.router()).expect("Failed to create test server");
    server.save_cookies();
    server
}

pub async fn create_test_user(pool: &PgPool, username: &str, password: &str, roles: Vec<Role>, active: bool) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut users_repo = Users::new(&mut conn);

    let user_create = UserCreateDBRequest {
        username: username.to_string(),
        password_hash: password::hash_password(password).expect("Failed to hash test password"),
        roles,
        active,
    };

    users_repo.create(&user_create).await.expect("Failed to create test user")
}

/// Login and return the access token.
pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/auth")
        .json(&serde_json::json!({"username": username, "password": password}))
        .await;
    response.assert_status_ok();

    response.json::<serde_json::Value>()["accessToken"]
        .as_str()
        .expect("login response should carry an access token")
        .to_string()
}
