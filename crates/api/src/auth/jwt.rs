//! JWT access and refresh tokens.
//!
//! Both token kinds are HS256-signed JWTs carrying [`Claims`]; the `kind`
//! claim keeps a refresh token from being accepted as an access token and
//! vice versa. Refresh tokens live longer and are exchanged for a new pair at
//! `/auth/refresh`.

use beatmarket_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which of the pair a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Role names granted to the user (e.g. `["user", "producer"]`).
    pub roles: Vec<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
    pub kind: TokenKind,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }

    /// Access token lifetime in seconds.
    pub fn access_expires_in(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// Refresh token lifetime in seconds.
    pub fn refresh_expires_in(&self) -> i64 {
        self.refresh_token_expiry_days * 24 * 60 * 60
    }

    fn lifetime_secs(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_expires_in(),
            TokenKind::Refresh => self.refresh_expires_in(),
        }
    }
}

/// An issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn generate_token(
    user_id: DbId,
    roles: &[String],
    kind: TokenKind,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        roles: roles.to_vec(),
        exp: now + config.lifetime_secs(kind),
        iat: now,
        jti: Uuid::new_v4().to_string(),
        kind,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Generate an access token for the given user.
pub fn generate_access_token(
    user_id: DbId,
    roles: &[String],
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    generate_token(user_id, roles, TokenKind::Access, config)
}

/// Generate both tokens for a fresh session.
pub fn generate_token_pair(
    user_id: DbId,
    roles: &[String],
    config: &JwtConfig,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    Ok(TokenPair {
        access_token: generate_token(user_id, roles, TokenKind::Access, config)?,
        refresh_token: generate_token(user_id, roles, TokenKind::Refresh, config)?,
    })
}

/// Validate and decode a token of the expected kind.
///
/// Validates the signature and expiration. A well-signed token of the other
/// kind is rejected with `InvalidToken`.
pub fn validate_token(
    token: &str,
    expected: TokenKind,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    if token_data.claims.kind != expected {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(token_data.claims)
}
