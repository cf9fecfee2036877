//! Per-entity configuration for the generic repositories.
//!
//! An [`Entity`] impl is everything the Postgres and in-memory repositories
//! need to know about a table: its name, column list, which column carries
//! the owning user, how rows are retired, and how create/update DTOs map onto
//! columns.

use std::fmt;

use beatmarket_core::error::CoreError;
use beatmarket_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::FromRow;

/// How a row leaves the live set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// `DELETE` the row.
    HardDelete,
    /// Set `deleted_at`; live rows have `deleted_at IS NULL`.
    SoftDelete,
    /// Clear `is_active`; live rows have `is_active = TRUE`.
    Deactivate,
}

impl Lifecycle {
    /// SQL predicate selecting live rows, if the lifecycle retires rows in place.
    pub fn live_predicate(&self) -> Option<&'static str> {
        match self {
            Lifecycle::HardDelete => None,
            Lifecycle::SoftDelete => Some("deleted_at IS NULL"),
            Lifecycle::Deactivate => Some("is_active = TRUE"),
        }
    }
}

/// A bindable column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(Option<i64>),
    Text(Option<String>),
    Bool(Option<bool>),
    TextList(Vec<String>),
    Date(Option<NaiveDate>),
    Time(Option<Timestamp>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(Some(v)) => write!(f, "{v}"),
            Value::Text(Some(v)) => f.write_str(v),
            Value::Bool(Some(v)) => write!(f, "{v}"),
            Value::TextList(v) => f.write_str(&v.join(",")),
            Value::Date(Some(v)) => write!(f, "{v}"),
            Value::Time(Some(v)) => write!(f, "{}", v.to_rfc3339()),
            Value::Int(None)
            | Value::Text(None)
            | Value::Bool(None)
            | Value::Date(None)
            | Value::Time(None) => f.write_str("null"),
        }
    }
}

macro_rules! value_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(Some(v))
            }
        }

        impl From<Option<$ty>> for Value {
            fn from(v: Option<$ty>) -> Self {
                Value::$variant(v)
            }
        }
    };
}

value_from!(Int, i64);
value_from!(Text, String);
value_from!(Bool, bool);
value_from!(Date, NaiveDate);
value_from!(Time, Timestamp);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(Some(v.to_string()))
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::TextList(v)
    }
}

/// Column/value pairs produced by the DTO mappings.
pub type Fields = Vec<(&'static str, Value)>;

/// Append `column = value` only when the partial-update field was supplied.
pub(crate) fn push_some<T>(fields: &mut Fields, column: &'static str, value: &Option<T>)
where
    T: Clone + Into<Value>,
{
    if let Some(v) = value {
        fields.push((column, v.clone().into()));
    }
}

/// Single equality predicate used to scope lookups, listings and counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    column: &'static str,
    value: Value,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    /// Rows owned by `user_id`, for entities whose owner column is `user_id`.
    pub fn owner(user_id: DbId) -> Self {
        Self::eq("user_id", user_id)
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Reject columns the entity does not declare as filterable.
    pub fn check<E: Entity>(&self) -> Result<(), CoreError> {
        if E::FILTERABLE.contains(&self.column) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "{} cannot be filtered by '{}'",
                E::NAME,
                self.column
            )))
        }
    }

    pub fn matches<E: Entity>(&self, row: &E) -> bool {
        row.column_value(self.column).as_ref() == Some(&self.value)
    }
}

/// Table-level configuration for one entity type.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Clone + Send + Sync + Unpin + 'static {
    /// DTO accepted by `create`.
    type Create: Send + Sync;
    /// Partial DTO accepted by `update`; `None` fields are left untouched.
    type Update: Send + Sync;

    /// Name used in error messages and logs.
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Comma-separated select list matching the `FromRow` struct.
    const COLUMNS: &'static str;
    /// Column holding the owning user id, for owner-scoped deletes.
    const OWNER_COLUMN: Option<&'static str>;
    const LIFECYCLE: Lifecycle;
    /// Columns accepted by [`Filter`].
    const FILTERABLE: &'static [&'static str];

    fn id(&self) -> DbId;

    fn owner_id(&self) -> Option<DbId>;

    /// Value of a filterable column, used by in-memory filtering.
    fn column_value(&self, column: &str) -> Option<Value>;

    /// Columns written on insert (timestamps are added by the repository).
    fn insert_fields(input: &Self::Create) -> Fields;

    /// Columns written on update: only the fields present in `input`.
    fn update_fields(input: &Self::Update) -> Fields;
}
