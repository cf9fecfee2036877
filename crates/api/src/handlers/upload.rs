//! Multipart upload plumbing shared by the media-carrying handlers.
//!
//! The `file` field is read to the end before anything is stored, and the
//! stored object is removed again if the repository write that references it
//! fails.

use axum::extract::Multipart;
use beatmarket_core::error::CoreError;
use beatmarket_core::media::{unique_filename, MediaKind};
use beatmarket_core::ownership::ensure_owner;
use beatmarket_core::types::DbId;
use beatmarket_db::entity::Entity;
use beatmarket_db::repositories::Repository;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A fully buffered upload.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A file written to media storage.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub key: String,
    pub url: String,
}

/// Read the required `file` field. Other fields are ignored.
pub async fn read_file_field(mut multipart: Multipart) -> AppResult<UploadedFile> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file = Some(UploadedFile {
            filename,
            bytes: data.to_vec(),
        });
    }

    let file =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if file.bytes.is_empty() {
        return Err(CoreError::Validation(format!(
            "Uploaded file '{}' is empty",
            file.filename
        ))
        .into());
    }
    Ok(file)
}

/// Validate the file type and write it under a fresh unique name.
pub async fn store_upload(
    state: &AppState,
    file: &UploadedFile,
    kind: MediaKind,
) -> AppResult<StoredMedia> {
    let key = unique_filename(&file.filename, kind)?;
    let url = state.media.put(&key, &file.bytes).await?;
    tracing::info!(key = %key, size = file.bytes.len(), "Stored upload");
    Ok(StoredMedia { key, url })
}

/// Remove a stored file whose database row was never written.
pub async fn discard_upload(state: &AppState, stored: &StoredMedia) {
    if let Err(e) = state.media.remove(&stored.key).await {
        tracing::warn!(key = %stored.key, error = %e, "Failed to discard orphaned upload");
    }
}

/// Replace the picture of an owned row.
///
/// Ownership is checked before the upload is stored. `make_update` builds the
/// partial update carrying the new picture URL.
pub async fn replace_picture<E, R, F>(
    state: &AppState,
    repo: &R,
    id: DbId,
    acting_user_id: DbId,
    multipart: Multipart,
    make_update: F,
) -> AppResult<DbId>
where
    E: Entity,
    R: Repository<E> + ?Sized,
    F: FnOnce(String) -> E::Update,
{
    let row = repo.get_by_id(id).await?;
    let owner = row
        .owner_id()
        .ok_or_else(|| CoreError::Internal(format!("{} rows have no owner", E::NAME)))?;
    ensure_owner(E::NAME, id, owner, acting_user_id)?;

    let file = read_file_field(multipart).await?;
    let stored = store_upload(state, &file, MediaKind::Picture).await?;

    match repo.update(id, &make_update(stored.url.clone())).await {
        Ok(id) => {
            tracing::info!(entity = E::NAME, id, user_id = acting_user_id, "Picture updated");
            Ok(id)
        }
        Err(e) => {
            discard_upload(state, &stored).await;
            Err(e.into())
        }
    }
}
