//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose roles do not
//! include the required one. Admins pass every check.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use beatmarket_core::error::CoreError;
use beatmarket_core::roles::{has_any_role, Role};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require(
    parts: &mut Parts,
    state: &AppState,
    role: Role,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !has_any_role(&user.roles, &[role]) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "{role} role required"
        ))));
    }
    Ok(user)
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Role::Admin).await.map(RequireAdmin)
    }
}

/// Requires the `producer` role (beats, soundkits, licenses).
pub struct RequireProducer(pub AuthUser);

impl FromRequestParts<AppState> for RequireProducer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Role::Producer)
            .await
            .map(RequireProducer)
    }
}

/// Requires the `artist` role (albums).
pub struct RequireArtist(pub AuthUser);

impl FromRequestParts<AppState> for RequireArtist {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Role::Artist).await.map(RequireArtist)
    }
}
