//! Ownership rule for mutable, user-owned entities.

use crate::error::CoreError;
use crate::types::DbId;

/// Fail with [`CoreError::Forbidden`] unless `acting_user_id` owns the entity.
///
/// Callers look the entity up first, so a missing row has already surfaced as
/// `NotFound` before this check runs.
pub fn ensure_owner(
    entity: &'static str,
    id: DbId,
    owner_id: DbId,
    acting_user_id: DbId,
) -> Result<(), CoreError> {
    if owner_id == acting_user_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "{entity} {id} does not belong to user {acting_user_id}"
        )))
    }
}
