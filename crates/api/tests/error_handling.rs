//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly; no router is involved.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use beatmarket_api::error::AppError;
use beatmarket_core::error::CoreError;
use beatmarket_db::DbError;
use http_body_util::BodyExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Beat",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Beat with id 42 not found");
}

#[tokio::test]
async fn not_found_by_column_names_the_lookup() {
    let err = AppError::Core(CoreError::NotFoundBy {
        entity: "TelegramAccount",
        column: "telegram_id",
        value: "777".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "TelegramAccount with telegram_id 777 not found");
}

#[tokio::test]
async fn validation_returns_400() {
    let err = AppError::Core(CoreError::Validation("Title must not be empty".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Title must not be empty");
}

#[tokio::test]
async fn bad_request_returns_400() {
    let err = AppError::BadRequest("Missing 'file' field".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn conflict_returns_409() {
    let err = AppError::Core(CoreError::Conflict("Email already registered".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn auth_errors_return_401_and_403() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Unauthorized("no token".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("not yours".into()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("disk /var/media is full".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Internal("pool exhausted".into()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!json["error"].as_str().unwrap().contains("pool"));
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[test]
fn db_errors_keep_their_domain_meaning() {
    let err: AppError = DbError::Core(CoreError::Forbidden("not yours".into())).into();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));

    let err: AppError = DbError::Database(sqlx::Error::PoolTimedOut).into();
    assert_matches!(err, AppError::Database(_));
}

#[test]
fn validator_errors_become_validation() {
    let mut errors = validator::ValidationErrors::new();
    errors.add("email", validator::ValidationError::new("email"));

    let err: AppError = errors.into();
    assert_matches!(err, AppError::Core(CoreError::Validation(_)));
}
