//! Owner-checked mutations and user-to-profile resolution.
//!
//! The repository's own `delete` is a silent no-op for a foreign owner. The
//! helpers here are what user-facing handlers call: they look the row up
//! first so the caller gets `NotFound` for a missing row and `Forbidden` for
//! someone else's, then issue the owner-scoped statement.
//!
//! Lookup and mutation are separate statements and are not wrapped in a
//! transaction. A row deleted in between surfaces as `NotFound` from the
//! second statement.

use beatmarket_core::error::CoreError;
use beatmarket_core::ownership::ensure_owner;
use beatmarket_core::types::DbId;

use crate::entity::{Entity, Filter};
use crate::repositories::Repository;
use crate::DbResult;

fn owner_of<E: Entity>(row: &E) -> Result<DbId, CoreError> {
    row.owner_id().ok_or_else(|| {
        CoreError::Internal(format!("{} rows have no owner", E::NAME))
    })
}

/// Update `id` on behalf of `acting_user_id`.
pub async fn update_owned<E, R>(
    repo: &R,
    id: DbId,
    acting_user_id: DbId,
    input: &E::Update,
) -> DbResult<DbId>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    let row = repo.get_by_id(id).await?;
    ensure_owner(E::NAME, id, owner_of(&row)?, acting_user_id)?;
    repo.update(id, input).await
}

/// Delete `id` on behalf of `acting_user_id`.
pub async fn delete_owned<E, R>(repo: &R, id: DbId, acting_user_id: DbId) -> DbResult<()>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    let row = repo.get_by_id(id).await?;
    let owner = owner_of(&row)?;
    ensure_owner(E::NAME, id, owner, acting_user_id)?;

    if repo.delete(id, owner).await? {
        tracing::info!(entity = E::NAME, id, user_id = acting_user_id, "Deleted");
        Ok(())
    } else {
        Err(CoreError::NotFound { entity: E::NAME, id }.into())
    }
}

/// Id of the live profile (artist, producer, ...) linked to `user_id`.
///
/// A user without a profile is `NotFoundBy`, never a null id.
pub async fn resolve_profile_id<E, R>(repo: &R, user_id: DbId) -> DbResult<DbId>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    repo.find_one(&Filter::owner(user_id))
        .await?
        .map(|profile| profile.id())
        .ok_or_else(|| {
            CoreError::NotFoundBy {
                entity: E::NAME,
                column: "user_id",
                value: user_id.to_string(),
            }
            .into()
        })
}
