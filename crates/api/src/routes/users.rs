//! Route definitions for the `/users` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /              -> list
/// GET    /me            -> me (auth)
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update (self only)
/// DELETE /{id}          -> delete (self only)
/// PUT    /{id}/picture  -> update_picture (self only, multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route("/me", get(users::me))
        .route(
            "/{id}",
            get(users::get_by_id)
                .put(users::update)
                .delete(users::delete),
        )
        .route("/{id}/picture", put(users::update_picture))
}
