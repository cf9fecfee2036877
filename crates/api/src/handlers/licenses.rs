//! Handlers for the `/licenses` resource.
//!
//! A license is a priced usage right a producer sells; it can be attached to
//! a playlist or a beat pack.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use beatmarket_core::catalog::{validate_description, validate_price, validate_title};
use beatmarket_core::error::CoreError;
use beatmarket_core::pagination::Page;
use beatmarket_core::types::DbId;
use beatmarket_db::entity::Filter;
use beatmarket_db::models::license::{CreateLicense, License, UpdateLicense};
use beatmarket_db::repositories::{delete_owned, fetch_page, update_owned};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireProducer;
use crate::query::PageParams;
use crate::response::{DataResponse, IdResponse};
use crate::state::AppState;

/// Request body for `POST /licenses`.
#[derive(Debug, Deserialize)]
pub struct CreateLicenseRequest {
    pub title: String,
    pub description: Option<String>,
    pub price: String,
    pub file_url: Option<String>,
    pub playlist_id: Option<DbId>,
    pub beat_pack_id: Option<DbId>,
}

/// Request body for `PUT /licenses/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLicenseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub file_url: Option<String>,
    pub playlist_id: Option<DbId>,
    pub beat_pack_id: Option<DbId>,
}

fn validate_fields(
    title: Option<&str>,
    description: Option<&str>,
    price: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(title) = title {
        validate_title(title)?;
    }
    if let Some(description) = description {
        validate_description(description)?;
    }
    if let Some(price) = price {
        validate_price(price)?;
    }
    Ok(())
}

/// GET /api/v1/licenses
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<License>>>> {
    let request = params.to_request()?;
    let page = fetch_page::<License, _>(state.repos.licenses.as_ref(), &request, None).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/licenses/my
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<License>>>> {
    let request = params.to_request()?;
    let filter = Filter::owner(auth.user_id);
    let page =
        fetch_page::<License, _>(state.repos.licenses.as_ref(), &request, Some(&filter)).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/licenses
pub async fn create(
    State(state): State<AppState>,
    RequireProducer(auth): RequireProducer,
    Json(input): Json<CreateLicenseRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<IdResponse>>)> {
    validate_fields(
        Some(&input.title),
        input.description.as_deref(),
        Some(&input.price),
    )?;
    let user = state.repos.users.get_by_id(auth.user_id).await?;

    let create = CreateLicense {
        title: input.title,
        description: input.description,
        price: input.price,
        file_url: input.file_url,
        prod_by: Some(user.username),
        playlist_id: input.playlist_id,
        beat_pack_id: input.beat_pack_id,
        user_id: auth.user_id,
    };
    let id = state.repos.licenses.create(&create).await?;

    tracing::info!(license_id = id, user_id = auth.user_id, "License created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: IdResponse { id },
        }),
    ))
}

/// GET /api/v1/licenses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<License>>> {
    let license = state.repos.licenses.get_by_id(id).await?;
    Ok(Json(DataResponse { data: license }))
}

/// PUT /api/v1/licenses/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLicenseRequest>,
) -> AppResult<Json<DataResponse<IdResponse>>> {
    validate_fields(
        input.title.as_deref(),
        input.description.as_deref(),
        input.price.as_deref(),
    )?;
    let update = UpdateLicense {
        title: input.title,
        description: input.description,
        price: input.price,
        picture_url: None,
        file_url: input.file_url,
        playlist_id: input.playlist_id,
        beat_pack_id: input.beat_pack_id,
    };
    let id = update_owned::<License, _>(
        state.repos.licenses.as_ref(),
        id,
        auth.user_id,
        &update,
    )
    .await?;
    tracing::info!(license_id = id, user_id = auth.user_id, "License updated");
    Ok(Json(DataResponse {
        data: IdResponse { id },
    }))
}

/// DELETE /api/v1/licenses/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<License, _>(state.repos.licenses.as_ref(), id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
