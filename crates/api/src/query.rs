//! Shared query parameter types for API handlers.

use beatmarket_core::error::CoreError;
use beatmarket_core::pagination::PageRequest;
use serde::Deserialize;

/// Paging parameters (`?start=&size=`) accepted by every list endpoint.
///
/// Missing values fall back to `start = 0`, `size = 10`. Out-of-range values
/// are rejected with a validation error, never clamped.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub start: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    pub fn to_request(&self) -> Result<PageRequest, CoreError> {
        PageRequest::from_params(self.start, self.size)
    }
}

/// `?telegram_id=` for the telegram account endpoints.
#[derive(Debug, Deserialize)]
pub struct TelegramIdParams {
    pub telegram_id: i64,
}
