#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use beatmarket_api::auth::jwt::{generate_access_token, JwtConfig};
use beatmarket_api::auth::password::hash_password;
use beatmarket_api::config::ServerConfig;
use beatmarket_api::router::build_app_router;
use beatmarket_api::state::AppState;
use beatmarket_core::storage::LocalMediaStorage;
use beatmarket_core::types::DbId;
use beatmarket_db::models::user::CreateUser;
use beatmarket_db::repositories::Repositories;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "secret-password";
const BOUNDARY: &str = "beatmarket-test-boundary";

/// Build a test `ServerConfig` with safe defaults and a 1 MiB body limit.
pub fn test_config(media_root: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        media_root: media_root.to_path_buf(),
        media_base_url: "/media".to_string(),
        database_url: None,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// The real router over fresh in-memory repositories and a temporary media
/// directory. Clones of `router` share the same state.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub media: TempDir,
}

pub fn build_test_app() -> TestApp {
    let media = tempfile::tempdir().expect("tempdir should be created");
    let config = test_config(media.path());

    let state = AppState {
        pool: None,
        repos: Repositories::in_memory(),
        media: Arc::new(LocalMediaStorage::new(media.path(), "/media")),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        media,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router
        .clone()
        .oneshot(request)
        .await
        .expect("router should not fail")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        request(Method::GET, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn delete_auth(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        request(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn json_request(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> Response<Body> {
    send(
        app,
        request(method, uri, token)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: &TestApp, uri: &str, body: Value) -> Response<Body> {
    json_request(app, Method::POST, uri, None, body).await
}

pub async fn post_json_auth(app: &TestApp, uri: &str, token: &str, body: Value) -> Response<Body> {
    json_request(app, Method::POST, uri, Some(token), body).await
}

pub async fn put_json_auth(app: &TestApp, uri: &str, token: &str, body: Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, Some(token), body).await
}

/// Multipart body with a single `file` field.
pub fn multipart_body(filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn upload(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: &str,
    filename: &str,
    bytes: &[u8],
) -> Response<Body> {
    send(
        app,
        request(method, uri, Some(token))
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(filename, bytes)))
            .unwrap(),
    )
    .await
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Register through the API and return the new user's id.
pub async fn register(app: &TestApp, username: &str, roles: &[&str]) -> DbId {
    let body = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": PASSWORD,
        "birthday": "1999-04-20",
        "roles": roles,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_i64()
        .expect("register should return the user id")
}

/// Log in through the API and return the `data` object of the response.
pub async fn login(app: &TestApp, username: &str) -> Value {
    let body = json!({
        "email": format!("{username}@example.com"),
        "password": PASSWORD,
    });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

/// Register, log in and return `(user_id, access_token)`.
pub async fn register_and_login(app: &TestApp, username: &str, roles: &[&str]) -> (DbId, String) {
    let id = register(app, username, roles).await;
    let tokens = login(app, username).await;
    let token = tokens["access_token"]
        .as_str()
        .expect("login should return an access token")
        .to_string();
    (id, token)
}

/// Insert an admin directly (admins cannot self-register) and mint a token.
pub async fn seed_admin(app: &TestApp) -> (DbId, String) {
    let roles = vec!["user".to_string(), "admin".to_string()];
    let id = app
        .state
        .repos
        .users
        .create(&CreateUser {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            picture_url: None,
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            roles: roles.clone(),
            tags: Vec::new(),
        })
        .await
        .expect("admin should be created");
    let token = generate_access_token(id, &roles, &app.state.config.jwt).unwrap();
    (id, token)
}
