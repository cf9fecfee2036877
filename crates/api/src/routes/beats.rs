//! Route definitions for the `/beats` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::beats;
use crate::state::AppState;

/// Routes mounted at `/beats`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create (producer, multipart audio)
/// GET    /my            -> list_mine (auth)
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update (owner)
/// DELETE /{id}          -> delete (owner)
/// PUT    /{id}/picture  -> update_picture (owner, multipart)
/// POST   /{id}/release  -> release (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(beats::list).post(beats::create))
        .route("/my", get(beats::list_mine))
        .route(
            "/{id}",
            get(beats::get_by_id)
                .put(beats::update)
                .delete(beats::delete),
        )
        .route("/{id}/picture", put(beats::update_picture))
        .route("/{id}/release", post(beats::release))
}
