//! The generic repository contract and its two implementations.
//!
//! Every entity is read and written through [`Repository<E>`]; the per-table
//! differences live in the [`Entity`] impl, not in per-table repository code.
//! [`PgRepository`] runs against Postgres and [`MemoryRepository`] keeps rows
//! in process with the same observable behavior.

use std::sync::Arc;

use async_trait::async_trait;
use beatmarket_core::pagination::{Page, PageRequest};
use beatmarket_core::types::DbId;

use crate::entity::{Entity, Filter};
use crate::models::album::Album;
use crate::models::artist::Artist;
use crate::models::beat::Beat;
use crate::models::license::License;
use crate::models::producer::Producer;
use crate::models::soundkit::Soundkit;
use crate::models::telegram::{TelegramAccount, TelegramSubscription};
use crate::models::user::User;
use crate::{DbPool, DbResult};

pub mod memory;
pub mod ownership;
pub mod postgres;

pub use memory::{MemoryEntity, MemoryRepository};
pub use ownership::{delete_owned, resolve_profile_id, update_owned};
pub use postgres::PgRepository;

/// Data access for one entity type.
///
/// Reads only ever see live rows: soft-deleted and deactivated rows are
/// invisible to every operation here, including `update` and `delete`.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Fetch a live row, or `NotFound`.
    async fn get_by_id(&self, id: DbId) -> DbResult<E>;

    /// Newest live row matching `filter`.
    async fn find_one(&self, filter: &Filter) -> DbResult<Option<E>>;

    /// Live rows among `ids`, newest first. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[DbId]) -> DbResult<Vec<E>>;

    /// One page of live rows, newest first.
    async fn list_page(&self, page: &PageRequest, filter: Option<&Filter>) -> DbResult<Vec<E>>;

    /// Number of live rows matching `filter`.
    async fn count(&self, filter: Option<&Filter>) -> DbResult<i64>;

    /// Insert a row and return its id. `created_at` and `updated_at` are equal.
    async fn create(&self, input: &E::Create) -> DbResult<DbId>;

    /// Apply the supplied fields of `input` and return the id.
    ///
    /// `updated_at` moves strictly forward whenever at least one field is
    /// supplied. Fails with `NotFound` when no live row has `id`.
    async fn update(&self, id: DbId, input: &E::Update) -> DbResult<DbId>;

    /// Remove (or retire) the row matching both `id` and `owner_id` in a
    /// single statement. Returns whether a row was affected; a mismatched
    /// owner affects nothing.
    async fn delete(&self, id: DbId, owner_id: DbId) -> DbResult<bool>;
}

/// Run the page query and the count query and combine them.
///
/// The two reads are independent statements, so `total` may be stale relative
/// to `items` under concurrent writes.
pub async fn fetch_page<E, R>(
    repo: &R,
    page: &PageRequest,
    filter: Option<&Filter>,
) -> DbResult<Page<E>>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    let items = repo.list_page(page, filter).await?;
    let total = repo.count(filter).await?;
    Ok(Page::new(page, total, items))
}

/// One repository per entity, shared by all request handlers.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn Repository<User>>,
    pub artists: Arc<dyn Repository<Artist>>,
    pub producers: Arc<dyn Repository<Producer>>,
    pub beats: Arc<dyn Repository<Beat>>,
    pub licenses: Arc<dyn Repository<License>>,
    pub soundkits: Arc<dyn Repository<Soundkit>>,
    pub albums: Arc<dyn Repository<Album>>,
    pub telegram_accounts: Arc<dyn Repository<TelegramAccount>>,
    pub telegram_subscriptions: Arc<dyn Repository<TelegramSubscription>>,
}

impl Repositories {
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            users: Arc::new(PgRepository::new(pool.clone())),
            artists: Arc::new(PgRepository::new(pool.clone())),
            producers: Arc::new(PgRepository::new(pool.clone())),
            beats: Arc::new(PgRepository::new(pool.clone())),
            licenses: Arc::new(PgRepository::new(pool.clone())),
            soundkits: Arc::new(PgRepository::new(pool.clone())),
            albums: Arc::new(PgRepository::new(pool.clone())),
            telegram_accounts: Arc::new(PgRepository::new(pool.clone())),
            telegram_subscriptions: Arc::new(PgRepository::new(pool)),
        }
    }

    /// Fresh, empty in-process repositories.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryRepository::new()),
            artists: Arc::new(MemoryRepository::new()),
            producers: Arc::new(MemoryRepository::new()),
            beats: Arc::new(MemoryRepository::new()),
            licenses: Arc::new(MemoryRepository::new()),
            soundkits: Arc::new(MemoryRepository::new()),
            albums: Arc::new(MemoryRepository::new()),
            telegram_accounts: Arc::new(MemoryRepository::new()),
            telegram_subscriptions: Arc::new(MemoryRepository::new()),
        }
    }
}
