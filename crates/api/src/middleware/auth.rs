//! JWT-based authentication extractor for Axum handlers.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use beatmarket_core::error::CoreError;
use beatmarket_core::types::DbId;
use serde::Deserialize;

use crate::auth::jwt::{validate_token, TokenKind};
use crate::error::AppError;
use crate::state::AppState;

/// Cookie carrying the access token for browser clients.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Authenticated user extracted from an access token.
///
/// The token is taken from the `Authorization: Bearer` header, or from the
/// `accessToken` cookie when no header is sent. Tokens of users that have
/// since been deleted are rejected.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// Role names granted at login.
    pub roles: Vec<String>,
}

/// Value of cookie `name` in the request's `Cookie` headers.
pub fn cookie_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let header = header.to_str().map_err(|_| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization header".into(),
        ))
    })?;
    header.strip_prefix("Bearer ").map(Some).ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts)? {
            Some(token) => token,
            None => cookie_value(parts, ACCESS_TOKEN_COOKIE).ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?,
        };

        let claims = validate_token(token, TokenKind::Access, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        match state.repos.users.get_by_id(claims.sub).await {
            Ok(_) => {}
            Err(e) if matches!(e.as_core(), Some(CoreError::NotFound { .. })) => {
                tracing::debug!(user_id = claims.sub, "Rejected token of deleted user");
                return Err(AppError::Core(CoreError::Unauthorized(
                    "Account no longer exists".into(),
                )));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(AuthUser {
            user_id: claims.sub,
            roles: claims.roles,
        })
    }
}

/// Raw refresh token for `POST /auth/refresh`.
///
/// Read from the JSON body's `refresh_token` field, falling back to the
/// `refreshToken` cookie when the body is empty or omits the field.
#[derive(Debug, Clone)]
pub struct RefreshToken(pub String);

#[derive(Debug, Default, Deserialize)]
struct RefreshBody {
    refresh_token: Option<String>,
}

impl FromRequest<AppState> for RefreshToken {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let cookie = cookie_value(&parts, REFRESH_TOKEN_COOKIE).map(str::to_string);

        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let body = parse_refresh_body(&bytes)?;

        body.refresh_token
            .or(cookie)
            .map(RefreshToken)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing refresh token".into()))
            })
    }
}

fn parse_refresh_body(bytes: &[u8]) -> Result<RefreshBody, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(RefreshBody::default());
    }
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid refresh request body: {e}")))
}
