//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Paged listings put a
//! [`Page`](beatmarket_core::pagination::Page) inside it.

use beatmarket_core::types::DbId;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Body returned by create and update endpoints: the affected id.
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: DbId,
}
