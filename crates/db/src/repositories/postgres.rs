//! Postgres implementation of [`Repository`].
//!
//! Statements are assembled with `sqlx::QueryBuilder` from the entity's
//! table configuration. Column names only ever come from `Entity` constants;
//! every value is bound.

use std::marker::PhantomData;

use async_trait::async_trait;
use beatmarket_core::error::CoreError;
use beatmarket_core::pagination::PageRequest;
use beatmarket_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::entity::{Entity, Fields, Filter, Lifecycle, Value};
use crate::repositories::Repository;
use crate::DbResult;

/// `updated_at` expression that always moves forward, even when two updates
/// land inside the same transaction timestamp.
const BUMP_UPDATED_AT: &str = "updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')";

pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: Value) {
    match value {
        Value::Int(v) => builder.push_bind(v),
        Value::Text(v) => builder.push_bind(v),
        Value::Bool(v) => builder.push_bind(v),
        Value::TextList(v) => builder.push_bind(v),
        Value::Date(v) => builder.push_bind(v),
        Value::Time(v) => builder.push_bind(v),
    };
}

/// `WHERE TRUE [AND <live>] [AND <column> = $n]`
fn push_where<E: Entity>(builder: &mut QueryBuilder<'static, Postgres>, filter: Option<&Filter>) {
    builder.push(" WHERE TRUE");
    if let Some(live) = E::LIFECYCLE.live_predicate() {
        builder.push(" AND ").push(live);
    }
    if let Some(filter) = filter {
        builder.push(" AND ").push(filter.column()).push(" = ");
        push_value(builder, filter.value().clone());
    }
}

fn owner_column<E: Entity>() -> Result<&'static str, CoreError> {
    E::OWNER_COLUMN.ok_or_else(|| {
        CoreError::Validation(format!(
            "{} has no owner column; owner-scoped delete is not supported",
            E::NAME
        ))
    })
}

pub(crate) fn select_query<E: Entity>(filter: Option<&Filter>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM {}", E::COLUMNS, E::TABLE));
    push_where::<E>(&mut builder, filter);
    builder
}

pub(crate) fn by_id_query<E: Entity>(id: DbId) -> QueryBuilder<'static, Postgres> {
    let mut builder = select_query::<E>(None);
    builder.push(" AND id = ").push_bind(id);
    builder
}

pub(crate) fn page_query<E: Entity>(
    page: &PageRequest,
    filter: Option<&Filter>,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = select_query::<E>(filter);
    builder
        .push(" ORDER BY id DESC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
    builder
}

pub(crate) fn count_query<E: Entity>(filter: Option<&Filter>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", E::TABLE));
    push_where::<E>(&mut builder, filter);
    builder
}

pub(crate) fn insert_query<E: Entity>(fields: Fields) -> QueryBuilder<'static, Postgres> {
    let columns: Vec<&str> = fields.iter().map(|(c, _)| *c).collect();
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} ({}, created_at, updated_at) VALUES (",
        E::TABLE,
        columns.join(", ")
    ));
    for (i, (_, value)) in fields.into_iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        push_value(&mut builder, value);
    }
    builder.push(", NOW(), NOW()) RETURNING id");
    builder
}

/// `fields` must be non-empty.
pub(crate) fn update_query<E: Entity>(id: DbId, fields: Fields) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", E::TABLE));
    for (column, value) in fields {
        builder.push(column).push(" = ");
        push_value(&mut builder, value);
        builder.push(", ");
    }
    builder.push(BUMP_UPDATED_AT);
    builder.push(" WHERE id = ").push_bind(id);
    if let Some(live) = E::LIFECYCLE.live_predicate() {
        builder.push(" AND ").push(live);
    }
    builder.push(" RETURNING id");
    builder
}

pub(crate) fn delete_query<E: Entity>(
    id: DbId,
    owner_id: DbId,
) -> Result<QueryBuilder<'static, Postgres>, CoreError> {
    let owner = owner_column::<E>()?;
    let mut builder = match E::LIFECYCLE {
        Lifecycle::HardDelete => QueryBuilder::new(format!("DELETE FROM {}", E::TABLE)),
        Lifecycle::SoftDelete => QueryBuilder::new(format!(
            "UPDATE {} SET deleted_at = NOW(), {BUMP_UPDATED_AT}",
            E::TABLE
        )),
        Lifecycle::Deactivate => QueryBuilder::new(format!(
            "UPDATE {} SET is_active = FALSE, {BUMP_UPDATED_AT}",
            E::TABLE
        )),
    };
    builder.push(" WHERE id = ").push_bind(id);
    builder.push(" AND ").push(owner).push(" = ").push_bind(owner_id);
    if let Some(live) = E::LIFECYCLE.live_predicate() {
        builder.push(" AND ").push(live);
    }
    Ok(builder)
}

#[async_trait]
impl<E: Entity> Repository<E> for PgRepository<E> {
    async fn get_by_id(&self, id: DbId) -> DbResult<E> {
        let mut builder = by_id_query::<E>(id);
        builder
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: E::NAME, id }.into())
    }

    async fn find_one(&self, filter: &Filter) -> DbResult<Option<E>> {
        filter.check::<E>()?;
        let mut builder = select_query::<E>(Some(filter));
        builder.push(" ORDER BY id DESC LIMIT 1");
        Ok(builder
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> DbResult<Vec<E>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = select_query::<E>(None);
        builder
            .push(" AND id = ANY(")
            .push_bind(ids.to_vec())
            .push(") ORDER BY id DESC");
        Ok(builder.build_query_as::<E>().fetch_all(&self.pool).await?)
    }

    async fn list_page(&self, page: &PageRequest, filter: Option<&Filter>) -> DbResult<Vec<E>> {
        if let Some(f) = filter {
            f.check::<E>()?;
        }
        let mut builder = page_query::<E>(page, filter);
        Ok(builder.build_query_as::<E>().fetch_all(&self.pool).await?)
    }

    async fn count(&self, filter: Option<&Filter>) -> DbResult<i64> {
        if let Some(f) = filter {
            f.check::<E>()?;
        }
        let mut builder = count_query::<E>(filter);
        Ok(builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?)
    }

    async fn create(&self, input: &E::Create) -> DbResult<DbId> {
        let mut builder = insert_query::<E>(E::insert_fields(input));
        let id = builder
            .build_query_scalar::<DbId>()
            .fetch_one(&self.pool)
            .await?;
        tracing::debug!(entity = E::NAME, id, "Inserted row");
        Ok(id)
    }

    async fn update(&self, id: DbId, input: &E::Update) -> DbResult<DbId> {
        let fields = E::update_fields(input);
        if fields.is_empty() {
            // Nothing to write; still report a missing row.
            return self.get_by_id(id).await.map(|row| row.id());
        }
        let mut builder = update_query::<E>(id, fields);
        builder
            .build_query_scalar::<DbId>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: E::NAME, id }.into())
    }

    async fn delete(&self, id: DbId, owner_id: DbId) -> DbResult<bool> {
        let mut builder = delete_query::<E>(id, owner_id)?;
        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
