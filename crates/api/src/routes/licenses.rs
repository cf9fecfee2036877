//! Route definitions for the `/licenses` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::licenses;
use crate::state::AppState;

/// Routes mounted at `/licenses`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create (producer)
/// GET    /my    -> list_mine (auth)
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update (owner)
/// DELETE /{id}  -> delete (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(licenses::list).post(licenses::create))
        .route("/my", get(licenses::list_mine))
        .route(
            "/{id}",
            get(licenses::get_by_id)
                .put(licenses::update)
                .delete(licenses::delete),
        )
}
