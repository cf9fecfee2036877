//! Handlers for the `/beats` resource.
//!
//! A beat starts life as an audio upload: the title comes from the file name
//! and the beat stays unavailable until its owner releases it with final
//! details.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use beatmarket_core::media::{title_from_filename, MediaKind};
use beatmarket_core::pagination::Page;
use beatmarket_core::types::DbId;
use beatmarket_db::entity::Filter;
use beatmarket_db::models::beat::{Beat, CreateBeat, UpdateBeat};
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

/// Request body for `POST /beats/{id}/release`.
#[derive(Debug, Deserialize)]
pub struct ReleaseRequest {
    pub title: String,
    pub description: Option<String>,
    pub co_prod: Option<String>,
    pub prod_by: Option<String>,
}

/// GET /api/v1/beats
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<Beat>>>> {
    let request = params.to_request()?;
    let page = fetch_page::<Beat, _>(state.repos.beats.as_ref(), &request, None).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/beats/my
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<Beat>>>> {
    let request = params.to_request()?;
    let filter = Filter::owner(auth.user_id);
    let page =
        fetch_page::<Beat, _>(state.repos.beats.as_ref(), &request, Some(&filter)).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/beats
///
/// Multipart form with an audio `file`. The beat is credited to the
/// uploading producer and created unavailable.
pub async fn create(
    State(state): State<AppState>,
    RequireProducer(auth): RequireProducer,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<IdResponse>>)> {
    let user = state.repos.users.get_by_id(auth.user_id).await?;
    let file = read_file_field(multipart).await?;
    let stored = store_upload(&state, &file, MediaKind::Audio).await?;

    let input = CreateBeat {
        title: title_from_filename(&file.filename),
        description: None,
        picture_url: None,
        file_url: stored.url.clone(),
        co_prod: None,
        prod_by: Some(user.username),
        user_id: auth.user_id,
    };
    let id = match state.repos.beats.create(&input).await {
        Ok(id) => id,
        Err(e) => {
            discard_upload(&state, &stored).await;
            return Err(e.into());
        }
    };

    tracing::info!(beat_id = id, user_id = auth.user_id, "Beat uploaded");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: IdResponse { id },
        }),
    ))
}

/// GET /api/v1/beats/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Beat>>> {
    let beat = state.repos.beats.get_by_id(id).await?;
    Ok(Json(DataResponse { data: beat }))
}

/// PUT /api/v1/beats/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<DetailsRequest>,
) -> AppResult<Json<DataResponse<IdResponse>>> {
    input.validate()?;
    let update = UpdateBeat {
        title: input.title,
        description: input.description,
        co_prod: input.co_prod,
        prod_by: input.prod_by,
        ..Default::default()
    };
    let id =
        update_owned::<Beat, _>(state.repos.beats.as_ref(), id, auth.user_id, &update).await?;
    tracing::info!(beat_id = id, user_id = auth.user_id, "Beat updated");
    Ok(Json(DataResponse {
        data: IdResponse { id },
    }))
}

/// PUT /api/v1/beats/{id}/picture
pub async fn update_picture(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<IdResponse>>> {
    let id = replace_picture::<Beat, _, _>(
        &state,
        state.repos.beats.as_ref(),
        id,
        auth.user_id,
        multipart,
        |url| UpdateBeat {
            picture_url: Some(url),
            ..Default::default()
        },
    )
    .await?;
    Ok(Json(DataResponse {
        data: IdResponse { id },
    }))
}

/// POST /api/v1/beats/{id}/release
///
/// Set the final title, description and credits and make the beat available.
pub async fn release(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReleaseRequest>,
) -> AppResult<Json<DataResponse<IdResponse>>> {
    let details = DetailsRequest {
        title: Some(input.title),
        description: input.description,
        co_prod: input.co_prod,
        prod_by: input.prod_by,
    };
    details.validate()?;

    let update = UpdateBeat {
        title: details.title,
        description: details.description,
        co_prod: details.co_prod,
        prod_by: details.prod_by,
        is_available: Some(true),
        ..Default::default()
    };
    let id =
        update_owned::<Beat, _>(state.repos.beats.as_ref(), id, auth.user_id, &update).await?;
    tracing::info!(beat_id = id, user_id = auth.user_id, "Beat released");
    Ok(Json(DataResponse {
        data: IdResponse { id },
    }))
}

/// DELETE /api/v1/beats/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<Beat, _>(state.repos.beats.as_ref(), id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
