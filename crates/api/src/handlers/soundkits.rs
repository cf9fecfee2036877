//! Handlers for the `/soundkits` resource.
//!
//! Soundkits are uploaded as sample archives. There is no release step: the
//! owner flips `is_available` through a regular update.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use beatmarket_core::media::{title_from_filename, MediaKind};
use beatmarket_core::pagination::Page;
use beatmarket_core::types::DbId;
use beatmarket_db::entity::Filter;
use beatmarket_db::models::soundkit::{CreateSoundkit, Soundkit, UpdateSoundkit};
use beatmarket_db::repositories::{delete_owned, fetch_page, update_owned};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::details::DetailsRequest;
use crate::handlers::upload::{discard_upload, read_file_field, replace_picture, store_upload};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireProducer;
use crate::query::PageParams;
use crate::response::{DataResponse, IdResponse};
use crate::state::AppState;

/// Request body for `PUT /soundkits/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateSoundkitRequest {
    #[serde(flatten)]
    pub details: DetailsRequest,
    pub is_available: Option<bool>,
}

/// GET /api/v1/soundkits
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<Soundkit>>>> {
    let request = params.to_request()?;
    let page = fetch_page::<Soundkit, _>(state.repos.soundkits.as_ref(), &request, None).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/soundkits/my
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<Soundkit>>>> {
    let request = params.to_request()?;
    let filter = Filter::owner(auth.user_id);
    let page =
        fetch_page::<Soundkit, _>(state.repos.soundkits.as_ref(), &request, Some(&filter))
            .await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/soundkits
///
/// Multipart form with an archive `file` (`zip`, `rar`, `7z`).
pub async fn create(
    State(state): State<AppState>,
    RequireProducer(auth): RequireProducer,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<IdResponse>>)> {
    let user = state.repos.users.get_by_id(auth.user_id).await?;
    let file = read_file_field(multipart).await?;
    let stored = store_upload(&state, &file, MediaKind::Archive).await?;

    let input = CreateSoundkit {
        title: title_from_filename(&file.filename),
        description: None,
        picture_url: None,
        file_url: stored.url.clone(),
        co_prod: None,
        prod_by: Some(user.username),
        user_id: auth.user_id,
    };
    let id = match state.repos.soundkits.create(&input).await {
        Ok(id) => id,
        Err(e) => {
            discard_upload(&state, &stored).await;
            return Err(e.into());
        }
    };

    tracing::info!(soundkit_id = id, user_id = auth.user_id, "Soundkit uploaded");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: IdResponse { id },
        }),
    ))
}

/// GET /api/v1/soundkits/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Soundkit>>> {
    let soundkit = state.repos.soundkits.get_by_id(id).await?;
    Ok(Json(DataResponse { data: soundkit }))
}

/// PUT /api/v1/soundkits/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSoundkitRequest>,
) -> AppResult<Json<DataResponse<IdResponse>>> {
    input.details.validate()?;
    let update = UpdateSoundkit {
        title: input.details.title,
        description: input.details.description,
        co_prod: input.details.co_prod,
        prod_by: input.details.prod_by,
        is_available: input.is_available,
        ..Default::default()
    };
    let id = update_owned::<Soundkit, _>(
        state.repos.soundkits.as_ref(),
        id,
        auth.user_id,
        &update,
    )
    .await?;
    tracing::info!(soundkit_id = id, user_id = auth.user_id, "Soundkit updated");
    Ok(Json(DataResponse {
        data: IdResponse { id },
    }))
}

/// PUT /api/v1/soundkits/{id}/picture
pub async fn update_picture(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<IdResponse>>> {
    let id = replace_picture::<Soundkit, _, _>(
        &state,
        state.repos.soundkits.as_ref(),
        id,
        auth.user_id,
        multipart,
        |url| UpdateSoundkit {
            picture_url: Some(url),
            ..Default::default()
        },
    )
    .await?;
    Ok(Json(DataResponse {
        data: IdResponse { id },
    }))
}

/// DELETE /api/v1/soundkits/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<Soundkit, _>(state.repos.soundkits.as_ref(), id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
