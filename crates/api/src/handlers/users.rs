//! Handlers for the `/users` resource.
//!
//! A user may only modify or delete their own account.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use beatmarket_core::pagination::Page;
use beatmarket_core::types::DbId;
use beatmarket_db::models::artist::Artist;
use beatmarket_db::models::producer::Producer;
use beatmarket_db::models::user::{UpdateUser, User, UserResponse};
use beatmarket_db::repositories::{delete_owned, fetch_page, update_owned};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::profiles::deactivate_for_user;
use crate::handlers::upload::replace_picture;
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::{DataResponse, IdResponse};
use crate::state::AppState;

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 25))]
    pub username: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl UpdateUserRequest {
    fn normalized(mut self) -> Self {
        self.username = self.username.map(|u| u.trim().to_string());
        self
    }
}

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = state.repos.users.get_by_id(auth.user_id).await?;
    Ok(Json(DataResponse {
        data: user.into(),
    }))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<UserResponse>>>> {
    let request = params.to_request()?;
    let page = fetch_page::<User, _>(state.repos.users.as_ref(), &request, None).await?;
    Ok(Json(DataResponse {
        data: page.map(UserResponse::from),
    }))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = state.repos.users.get_by_id(id).await?;
    Ok(Json(DataResponse {
        data: user.into(),
    }))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<IdResponse>>> {
    let input = input.normalized();
    input.validate()?;
    let update = UpdateUser {
        username: input.username,
        birthday: input.birthday,
        ..Default::default()
    };
    let id =
        update_owned::<User, _>(state.repos.users.as_ref(), id, auth.user_id, &update).await?;
    tracing::info!(user_id = id, "User updated");
    Ok(Json(DataResponse {
        data: IdResponse { id },
    }))
}

/// PUT /api/v1/users/{id}/picture
///
/// Multipart form with a `file` field holding the new picture.
pub async fn update_picture(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<IdResponse>>> {
    let id = replace_picture::<User, _, _>(
        &state,
        state.repos.users.as_ref(),
        id,
        auth.user_id,
        multipart,
        |url| UpdateUser {
            picture_url: Some(url),
            ..Default::default()
        },
    )
    .await?;
    Ok(Json(DataResponse {
        data: IdResponse { id },
    }))
}

/// DELETE /api/v1/users/{id}
///
/// Soft-deletes the account, then deactivates its artist and producer
/// profiles. Profile deactivation is best effort: a failure is logged and
/// does not undo the account deletion.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<User, _>(state.repos.users.as_ref(), id, auth.user_id).await?;
    deactivate_profiles(&state, id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Live users among `ids`, keyed by id, for embedding in profile responses.
pub(crate) async fn users_by_id(
    state: &AppState,
    ids: &[DbId],
) -> AppResult<HashMap<DbId, UserResponse>> {
    let users = state.repos.users.find_by_ids(ids).await?;
    Ok(users
        .into_iter()
        .map(|user| (user.id, UserResponse::from(user)))
        .collect())
}

async fn deactivate_profiles(state: &AppState, user_id: DbId) {
    deactivate_for_user::<Artist>(state, user_id).await;
    deactivate_for_user::<Producer>(state, user_id).await;
}
