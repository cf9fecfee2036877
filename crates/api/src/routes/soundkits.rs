//! Route definitions for the `/soundkits` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::soundkits;
use crate::state::AppState;

/// Routes mounted at `/soundkits`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create (producer, multipart archive)
/// GET    /my            -> list_mine (auth)
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update (owner)
/// DELETE /{id}          -> delete (owner)
/// PUT    /{id}/picture  -> update_picture (owner, multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(soundkits::list).post(soundkits::create))
        .route("/my", get(soundkits::list_mine))
        .route(
            "/{id}",
            get(soundkits::get_by_id)
                .put(soundkits::update)
                .delete(soundkits::delete),
        )
        .route("/{id}/picture", put(soundkits::update_picture))
}
