//! Route definitions for the `/subscription` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::subscriptions;
use crate::state::AppState;

/// Routes mounted at `/subscription`.
///
/// ```text
/// POST /telegram?telegram_id=                    -> create_account
/// GET  /telegram?telegram_id=                    -> get_account
/// GET  /telegram/users                           -> list_telegram_ids
/// POST /telegram/{telegram_id}/subscriptions     -> grant_subscription (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/telegram",
            get(subscriptions::get_account).post(subscriptions::create_account),
        )
        .route("/telegram/users", get(subscriptions::list_telegram_ids))
        .route(
            "/telegram/{telegram_id}/subscriptions",
            post(subscriptions::grant_subscription),
        )
}
