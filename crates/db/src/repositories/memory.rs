//! In-process repository backed by a `BTreeMap` per entity.
//!
//! Used by the test suites and by the server when no `DATABASE_URL` is set.
//! Behavior matches [`PgRepository`](super::PgRepository): ids start at 1,
//! listings are id-descending, retired rows are invisible, and `updated_at`
//! moves strictly forward on every effective update.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use beatmarket_core::error::CoreError;
use beatmarket_core::pagination::PageRequest;
use beatmarket_core::types::{DbId, Timestamp};
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::entity::{Entity, Filter, Lifecycle};
use crate::repositories::Repository;
use crate::DbResult;

/// Row construction and mutation the in-memory store needs on top of
/// [`Entity`]. Postgres does the same work in SQL.
pub trait MemoryEntity: Entity {
    /// Columns that must be unique among live rows (mirrors the `uq_*`
    /// constraints of the schema).
    const UNIQUE: &'static [&'static str] = &[];

    /// Build the stored row, applying column defaults.
    fn materialize(id: DbId, input: &Self::Create, now: Timestamp) -> Self;

    fn apply_update(&mut self, input: &Self::Update);

    fn updated_at(&self) -> Timestamp;

    fn set_updated_at(&mut self, at: Timestamp);

    fn is_live(&self) -> bool {
        true
    }

    /// Mark the row as deleted in place (soft delete / deactivate).
    fn retire(&mut self, _now: Timestamp) {}
}

struct MemoryTable<E> {
    rows: BTreeMap<DbId, E>,
    next_id: DbId,
}

pub struct MemoryRepository<E> {
    table: RwLock<MemoryTable<E>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(MemoryTable {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
            _entity: PhantomData,
        }
    }
}

impl<E> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Next `updated_at`: now, but never at or before the previous value.
fn bump(previous: Timestamp) -> Timestamp {
    let now = Utc::now();
    let floor = previous + Duration::microseconds(1);
    if now > floor {
        now
    } else {
        floor
    }
}

fn check_filter<E: Entity>(filter: Option<&Filter>) -> Result<(), CoreError> {
    match filter {
        Some(f) => f.check::<E>(),
        None => Ok(()),
    }
}

fn visible<E: MemoryEntity>(row: &E, filter: Option<&Filter>) -> bool {
    row.is_live() && filter.map_or(true, |f| f.matches(row))
}

#[async_trait]
impl<E: MemoryEntity> Repository<E> for MemoryRepository<E> {
    async fn get_by_id(&self, id: DbId) -> DbResult<E> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .filter(|row| row.is_live())
            .cloned()
            .ok_or_else(|| CoreError::NotFound { entity: E::NAME, id }.into())
    }

    async fn find_one(&self, filter: &Filter) -> DbResult<Option<E>> {
        filter.check::<E>()?;
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .rev()
            .find(|row| visible(*row, Some(filter)))
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> DbResult<Vec<E>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .rev()
            .filter(|row| row.is_live() && ids.contains(&row.id()))
            .cloned()
            .collect())
    }

    async fn list_page(&self, page: &PageRequest, filter: Option<&Filter>) -> DbResult<Vec<E>> {
        check_filter::<E>(filter)?;
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .rev()
            .filter(|row| visible(*row, filter))
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: Option<&Filter>) -> DbResult<i64> {
        check_filter::<E>(filter)?;
        let table = self.table.read().await;
        let n = table.rows.values().filter(|row| visible(*row, filter)).count();
        Ok(n as i64)
    }

    async fn create(&self, input: &E::Create) -> DbResult<DbId> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        let row = E::materialize(id, input, Utc::now());

        for column in E::UNIQUE {
            let value = row.column_value(column);
            let taken = table
                .rows
                .values()
                .any(|other| other.is_live() && other.column_value(column) == value);
            if taken {
                return Err(CoreError::Conflict(format!(
                    "{} with this {column} already exists",
                    E::NAME
                ))
                .into());
            }
        }

        table.rows.insert(id, row);
        table.next_id += 1;
        tracing::debug!(entity = E::NAME, id, "Inserted in-memory row");
        Ok(id)
    }

    async fn update(&self, id: DbId, input: &E::Update) -> DbResult<DbId> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .get_mut(&id)
            .filter(|row| row.is_live())
            .ok_or(CoreError::NotFound { entity: E::NAME, id })?;

        if !E::update_fields(input).is_empty() {
            row.apply_update(input);
            let at = bump(row.updated_at());
            row.set_updated_at(at);
        }
        Ok(id)
    }

    async fn delete(&self, id: DbId, owner_id: DbId) -> DbResult<bool> {
        if E::OWNER_COLUMN.is_none() {
            return Err(CoreError::Validation(format!(
                "{} has no owner column; owner-scoped delete is not supported",
                E::NAME
            ))
            .into());
        }

        let mut table = self.table.write().await;
        let matches = table
            .rows
            .get(&id)
            .is_some_and(|row| row.is_live() && row.owner_id() == Some(owner_id));
        if !matches {
            return Ok(false);
        }

        match E::LIFECYCLE {
            Lifecycle::HardDelete => {
                table.rows.remove(&id);
            }
            Lifecycle::SoftDelete | Lifecycle::Deactivate => {
                if let Some(row) = table.rows.get_mut(&id) {
                    let now = Utc::now();
                    row.retire(now);
                    let at = bump(row.updated_at());
                    row.set_updated_at(at);
                }
            }
        }
        Ok(true)
    }
}
