//! Route definitions shared by the `/artists` and `/producers` resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::profiles::{self, Profile};
use crate::state::AppState;

/// Routes mounted at `/artists` or `/producers`, depending on `P`.
///
/// ```text
/// GET    /      -> list
/// GET    /me    -> me (auth)
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update (own profile)
/// DELETE /{id}  -> delete (own profile, deactivates)
/// ```
pub fn router<P: Profile>() -> Router<AppState> {
    Router::new()
        .route("/", get(profiles::list::<P>))
        .route("/me", get(profiles::me::<P>))
        .route(
            "/{id}",
            get(profiles::get_by_id::<P>)
                .put(profiles::update::<P>)
                .delete(profiles::delete::<P>),
        )
}
