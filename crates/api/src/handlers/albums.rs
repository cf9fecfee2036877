//! Handlers for the `/albums` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use beatmarket_core::pagination::Page;
use beatmarket_core::types::DbId;
use beatmarket_db::entity::Filter;
use beatmarket_db::models::album::{Album, CreateAlbum, UpdateAlbum};
use beatmarket_db::repositories::{delete_owned, fetch_page, update_owned};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::details::DetailsRequest;
use crate::handlers::upload::replace_picture;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireArtist;
use crate::query::PageParams;
use crate::response::{DataResponse, IdResponse};
use crate::state::AppState;

/// Request body for `POST /albums`.
#[derive(Debug, Deserialize)]
pub struct CreateAlbumRequest {
    pub title: String,
    pub description: Option<String>,
    pub co_prod: Option<String>,
    pub prod_by: Option<String>,
}

/// Request body for `PUT /albums/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateAlbumRequest {
    #[serde(flatten)]
    pub details: DetailsRequest,
    pub is_available: Option<bool>,
}

/// GET /api/v1/albums
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<Album>>>> {
    let request = params.to_request()?;
    let page = fetch_page::<Album, _>(state.repos.albums.as_ref(), &request, None).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/albums/my
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<Album>>>> {
    let request = params.to_request()?;
    let filter = Filter::owner(auth.user_id);
    let page =
        fetch_page::<Album, _>(state.repos.albums.as_ref(), &request, Some(&filter)).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/albums
pub async fn create(
    State(state): State<AppState>,
    RequireArtist(auth): RequireArtist,
    Json(input): Json<CreateAlbumRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<IdResponse>>)> {
    let details = DetailsRequest {
        title: Some(input.title),
        description: input.description,
        co_prod: input.co_prod,
        prod_by: input.prod_by,
    };
    details.validate()?;

    let create = CreateAlbum {
        title: details.title.unwrap_or_default(),
        description: details.description,
        picture_url: None,
        co_prod: details.co_prod,
        prod_by: details.prod_by,
        user_id: auth.user_id,
    };
    let id = state.repos.albums.create(&create).await?;

    tracing::info!(album_id = id, user_id = auth.user_id, "Album created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: IdResponse { id },
        }),
    ))
}

/// GET /api/v1/albums/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Album>>> {
    let album = state.repos.albums.get_by_id(id).await?;
    Ok(Json(DataResponse { data: album }))
}

/// PUT /api/v1/albums/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAlbumRequest>,
) -> AppResult<Json<DataResponse<IdResponse>>> {
    input.details.validate()?;
    let update = UpdateAlbum {
        title: input.details.title,
        description: input.details.description,
        co_prod: input.details.co_prod,
        prod_by: input.details.prod_by,
        is_available: input.is_available,
        ..Default::default()
    };
    let id =
        update_owned::<Album, _>(state.repos.albums.as_ref(), id, auth.user_id, &update).await?;
    tracing::info!(album_id = id, user_id = auth.user_id, "Album updated");
    Ok(Json(DataResponse {
        data: IdResponse { id },
    }))
}

/// PUT /api/v1/albums/{id}/picture
pub async fn update_picture(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<IdResponse>>> {
    let id = replace_picture::<Album, _, _>(
        &state,
        state.repos.albums.as_ref(),
        id,
        auth.user_id,
        multipart,
        |url| UpdateAlbum {
            picture_url: Some(url),
            ..Default::default()
        },
    )
    .await?;
    Ok(Json(DataResponse {
        data: IdResponse { id },
    }))
}

/// DELETE /api/v1/albums/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<Album, _>(state.repos.albums.as_ref(), id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
