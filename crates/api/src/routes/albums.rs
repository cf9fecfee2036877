//! Route definitions for the `/albums` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::albums;
use crate::state::AppState;

/// Routes mounted at `/albums`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create (artist)
/// GET    /my            -> list_mine (auth)
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update (owner)
/// DELETE /{id}          -> delete (owner)
/// PUT    /{id}/picture  -> update_picture (owner, multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(albums::list).post(albums::create))
        .route("/my", get(albums::list_mine))
        .route(
            "/{id}",
            get(albums::get_by_id)
                .put(albums::update)
                .delete(albums::delete),
        )
        .route("/{id}/picture", put(albums::update_picture))
}
