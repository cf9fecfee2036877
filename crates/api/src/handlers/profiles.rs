//! Handlers shared by the `/artists` and `/producers` resources.
//!
//! Profiles are created at registration and embed the owning user in every
//! response. Mutations resolve the caller's own profile from their user id
//! and require it to be the addressed one.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use beatmarket_core::catalog::validate_description;
use beatmarket_core::error::CoreError;
use beatmarket_core::pagination::Page;
use beatmarket_core::types::DbId;
use beatmarket_db::entity::{Entity, Filter};
use beatmarket_db::models::artist::{Artist, ArtistResponse, UpdateArtist};
use beatmarket_db::models::producer::{Producer, ProducerResponse, UpdateProducer};
use beatmarket_db::models::user::UserResponse;
use beatmarket_db::repositories::{fetch_page, resolve_profile_id, Repositories, Repository};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::users::users_by_id;
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::{DataResponse, IdResponse};
use crate::state::AppState;

/// A per-role profile linked 1:1 to a user.
pub trait Profile: Entity {
    /// Public view with the user embedded.
    type Response: Serialize + Send + 'static;

    fn repo(repos: &Repositories) -> &dyn Repository<Self>;

    fn user_id(&self) -> DbId;

    fn into_response(self, user: UserResponse) -> Self::Response;

    fn description_update(description: Option<String>) -> Self::Update;
}

impl Profile for Artist {
    type Response = ArtistResponse;

    fn repo(repos: &Repositories) -> &dyn Repository<Self> {
        repos.artists.as_ref()
    }

    fn user_id(&self) -> DbId {
        self.user_id
    }

    fn into_response(self, user: UserResponse) -> ArtistResponse {
        ArtistResponse::new(self, user)
    }

    fn description_update(description: Option<String>) -> UpdateArtist {
        UpdateArtist { description }
    }
}

impl Profile for Producer {
    type Response = ProducerResponse;

    fn repo(repos: &Repositories) -> &dyn Repository<Self> {
        repos.producers.as_ref()
    }

    fn user_id(&self) -> DbId {
        self.user_id
    }

    fn into_response(self, user: UserResponse) -> ProducerResponse {
        ProducerResponse::new(self, user)
    }

    fn description_update(description: Option<String>) -> UpdateProducer {
        UpdateProducer { description }
    }
}

/// Request body for `PUT /artists/{id}` and `PUT /producers/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub description: Option<String>,
}

/// GET /api/v1/{artists,producers}/me
pub async fn me<P: Profile>(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<P::Response>>> {
    let profile = P::repo(&state.repos)
        .find_one(&Filter::owner(auth.user_id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundBy {
            entity: P::NAME,
            column: "user_id",
            value: auth.user_id.to_string(),
        }))?;
    let user = state.repos.users.get_by_id(auth.user_id).await?;
    Ok(Json(DataResponse {
        data: profile.into_response(user.into()),
    }))
}

/// GET /api/v1/{artists,producers}
///
/// Profiles whose user is no longer live are left out of `items`.
pub async fn list<P: Profile>(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<P::Response>>>> {
    let request = params.to_request()?;
    let page = fetch_page::<P, _>(P::repo(&state.repos), &request, None).await?;

    let user_ids: Vec<DbId> = page.items.iter().map(P::user_id).collect();
    let mut users = users_by_id(&state, &user_ids).await?;

    Ok(Json(DataResponse {
        data: page.filter_map(|profile| {
            let user = users.remove(&profile.user_id())?;
            Some(profile.into_response(user))
        }),
    }))
}

/// GET /api/v1/{artists,producers}/{id}
pub async fn get_by_id<P: Profile>(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<P::Response>>> {
    let profile = P::repo(&state.repos).get_by_id(id).await?;
    let user = state.repos.users.get_by_id(profile.user_id()).await?;
    Ok(Json(DataResponse {
        data: profile.into_response(user.into()),
    }))
}

/// PUT /api/v1/{artists,producers}/{id}
pub async fn update<P: Profile>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<IdResponse>>> {
    if let Some(description) = &input.description {
        validate_description(description)?;
    }
    ensure_own_profile::<P>(&state, id, auth.user_id).await?;

    let id = P::repo(&state.repos)
        .update(id, &P::description_update(input.description))
        .await?;
    tracing::info!(
        entity = P::NAME,
        profile_id = id,
        user_id = auth.user_id,
        "Profile updated"
    );
    Ok(Json(DataResponse {
        data: IdResponse { id },
    }))
}

/// DELETE /api/v1/{artists,producers}/{id}
///
/// Deactivates the profile; the user account stays.
pub async fn delete<P: Profile>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_own_profile::<P>(&state, id, auth.user_id).await?;

    if !P::repo(&state.repos).delete(id, auth.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: P::NAME,
            id,
        }));
    }
    tracing::info!(
        entity = P::NAME,
        profile_id = id,
        user_id = auth.user_id,
        "Profile deactivated"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Deactivate the profile of `user_id`, if any. Failures are logged only.
pub(crate) async fn deactivate_for_user<P: Profile>(state: &AppState, user_id: DbId) {
    let repo = P::repo(&state.repos);
    match repo.find_one(&Filter::owner(user_id)).await {
        Ok(Some(profile)) => {
            if let Err(e) = repo.delete(profile.id(), user_id).await {
                tracing::warn!(
                    entity = P::NAME,
                    user_id,
                    profile_id = profile.id(),
                    error = %e,
                    "Failed to deactivate profile"
                );
            }
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(entity = P::NAME, user_id, error = %e, "Failed to look up profile")
        }
    }
}

/// `NotFound` if `id` is not a live profile, `Forbidden` if it is not the
/// caller's own.
async fn ensure_own_profile<P: Profile>(
    state: &AppState,
    id: DbId,
    user_id: DbId,
) -> AppResult<()> {
    let repo = P::repo(&state.repos);
    repo.get_by_id(id).await?;
    let own_id = resolve_profile_id::<P, _>(repo, user_id).await.map_err(|e| {
        if matches!(e.as_core(), Some(CoreError::NotFoundBy { .. })) {
            AppError::Core(CoreError::Forbidden(format!(
                "User {user_id} has no {} profile",
                P::NAME
            )))
        } else {
            e.into()
        }
    })?;
    if own_id != id {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "{} {id} does not belong to user {user_id}",
            P::NAME
        ))));
    }
    Ok(())
}
