//! Handlers for the `/auth` resource (register, login, refresh).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderName, StatusCode};
use axum::response::AppendHeaders;
use axum::Json;
use beatmarket_core::error::CoreError;
use beatmarket_core::roles::{registration_roles, Role, ROLE_ARTIST, ROLE_PRODUCER};
use beatmarket_db::entity::Filter;
use beatmarket_db::models::artist::CreateArtist;
use beatmarket_db::models::producer::CreateProducer;
use beatmarket_db::models::user::{CreateUser, User, UserResponse};
use beatmarket_db::DbError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_token_pair, validate_token, JwtConfig, TokenKind, TokenPair};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{RefreshToken, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 25))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5))]
    pub password: String,
    pub birthday: NaiveDate,
    /// Extra roles to grant; `user` is always included.
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl RegisterRequest {
    /// Trim the username and lowercase the email so length and format rules
    /// apply to the stored values.
    fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self
    }
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

type TokenCookies = AppendHeaders<[(HeaderName, String); 2]>;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a user and the artist/producer profiles for the requested roles.
/// The user row and the profile rows are separate writes; a failure after
/// the user insert leaves the user without its profiles.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let input = input.normalized();
    input.validate()?;
    let roles = registration_roles(&input.roles)?;
    let email = input.email;

    if state
        .repos
        .users
        .find_one(&Filter::eq("email", email.as_str()))
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Email {email} is already registered"
        ))));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user_id = state
        .repos
        .users
        .create(&CreateUser {
            username: input.username,
            email,
            password_hash,
            picture_url: None,
            birthday: input.birthday,
            roles: roles.clone(),
            tags: Vec::new(),
        })
        .await?;

    if roles.iter().any(|r| r == ROLE_ARTIST) {
        state
            .repos
            .artists
            .create(&CreateArtist {
                user_id,
                description: None,
            })
            .await?;
    }
    if roles.iter().any(|r| r == ROLE_PRODUCER) {
        state
            .repos
            .producers
            .create(&CreateProducer {
                user_id,
                description: None,
            })
            .await?;
    }

    tracing::info!(user_id, roles = ?roles, "User registered");

    let user = state.repos.users.get_by_id(user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Tokens are returned in the body and
/// set as `accessToken` / `refreshToken` cookies.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<(TokenCookies, Json<DataResponse<TokenResponse>>)> {
    let email = input.email.trim().to_lowercase();
    let user = state
        .repos
        .users
        .find_one(&Filter::eq("email", email))
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Rejected login with wrong password");
        return Err(invalid_credentials());
    }

    tracing::info!(user_id = user.id, "User logged in");
    issue_tokens(&state.config.jwt, &user)
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new token pair. The token comes from
/// the body or the `refreshToken` cookie. Roles are re-read from the user
/// row, so role changes take effect on refresh.
pub async fn refresh(
    State(state): State<AppState>,
    RefreshToken(token): RefreshToken,
) -> AppResult<(TokenCookies, Json<DataResponse<TokenResponse>>)> {
    let claims = validate_token(&token, TokenKind::Refresh, &state.config.jwt)
        .map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = match state.repos.users.get_by_id(claims.sub).await {
        Ok(user) => user,
        Err(DbError::Core(CoreError::NotFound { .. })) => {
            return Err(AppError::Core(CoreError::Unauthorized(
                "User no longer exists".into(),
            )))
        }
        Err(e) => return Err(e.into()),
    };

    issue_tokens(&state.config.jwt, &user)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid email or password".into(),
    ))
}

fn token_cookie(name: &str, value: &str, max_age_secs: i64) -> String {
    format!("{name}={value}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax")
}

fn issue_tokens(
    config: &JwtConfig,
    user: &User,
) -> AppResult<(TokenCookies, Json<DataResponse<TokenResponse>>)> {
    let TokenPair {
        access_token,
        refresh_token,
    } = generate_token_pair(user.id, &user.roles, config)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let cookies = AppendHeaders([
        (
            SET_COOKIE,
            token_cookie(ACCESS_TOKEN_COOKIE, &access_token, config.access_expires_in()),
        ),
        (
            SET_COOKIE,
            token_cookie(
                REFRESH_TOKEN_COOKIE,
                &refresh_token,
                config.refresh_expires_in(),
            ),
        ),
    ]);

    Ok((
        cookies,
        Json(DataResponse {
            data: TokenResponse {
                access_token,
                refresh_token,
                token_type: "Bearer",
                expires_in: config.access_expires_in(),
            },
        }),
    ))
}
