pub mod albums;
pub mod auth;
pub mod beats;
pub mod health;
pub mod licenses;
pub mod profiles;
pub mod soundkits;
pub mod subscriptions;
pub mod users;

use axum::Router;
use beatmarket_db::models::artist::Artist;
use beatmarket_db::models::producer::Producer;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
///
/// /users                                           list
/// /users/me                                        current user
/// /users/{id}                                      get, update, delete (self)
/// /users/{id}/picture                              upload picture (self)
///
/// /artists                                         list (user embedded)
/// /artists/me                                      caller's profile
/// /artists/{id}                                    get, update, deactivate (own)
///
/// /producers                                       list (user embedded)
/// /producers/me                                    caller's profile
/// /producers/{id}                                  get, update, deactivate (own)
///
/// /beats                                           list, upload (producer)
/// /beats/my                                        caller's beats
/// /beats/{id}                                      get, update, delete (owner)
/// /beats/{id}/picture                              upload picture (owner)
/// /beats/{id}/release                              release (owner)
///
/// /soundkits                                       list, upload (producer)
/// /soundkits/my                                    caller's soundkits
/// /soundkits/{id}                                  get, update, delete (owner)
/// /soundkits/{id}/picture                          upload picture (owner)
///
/// /albums                                          list, create (artist)
/// /albums/my                                       caller's albums
/// /albums/{id}                                     get, update, delete (owner)
/// /albums/{id}/picture                             upload picture (owner)
///
/// /licenses                                        list, create (producer)
/// /licenses/my                                     caller's licenses
/// /licenses/{id}                                   get, update, delete (owner)
///
/// /subscription/telegram                           create, get by telegram_id
/// /subscription/telegram/users                     paged telegram ids
/// /subscription/telegram/{telegram_id}/subscriptions  grant plan (admin)
/// ```
///
/// List endpoints take `?start=&size=` and return the paged envelope.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/artists", profiles::router::<Artist>())
        .nest("/producers", profiles::router::<Producer>())
        .nest("/beats", beats::router())
        .nest("/soundkits", soundkits::router())
        .nest("/albums", albums::router())
        .nest("/licenses", licenses::router())
        .nest("/subscription", subscriptions::router())
}
