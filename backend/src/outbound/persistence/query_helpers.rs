//! Shared SQL plumbing for the resource repositories.
//!
//! Every resource table follows the same shape: an integer `id` primary key,
//! a fixed projection, optional equality filters, an accent-insensitive search
//! over a few text columns and an `{id, label}` projection for pickers. The
//! helpers here build those statements with [`QueryBuilder`], so user input is
//! always bound and never interpolated.

use chrono::NaiveDate;
use pagination::PageRequest;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Postgres, QueryBuilder};

use crate::domain::ports::{RecordPage, RepositoryError};
use crate::domain::resources::SelectOption;
use crate::domain::validation::{Change, SearchTerm};

use super::pool::DbPool;
use super::sqlx_error_mapping::map_sqlx_error;

/// Static description of a resource table.
#[derive(Debug, Clone, Copy)]
pub(super) struct Table {
    /// Table name.
    pub name: &'static str,
    /// Projection used by `SELECT` and `RETURNING`; aliases match row fields.
    pub columns: &'static str,
    /// `ORDER BY` clause for list queries.
    pub order_by: &'static str,
    /// SQL expression producing the picker label.
    pub label: &'static str,
}

/// Typed value bound into a statement.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum BindValue {
    Int(Option<i32>),
    SmallInt(Option<i16>),
    Bool(Option<bool>),
    Text(Option<String>),
    Date(Option<NaiveDate>),
}

impl BindValue {
    fn push_to(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self.clone() {
            Self::Int(value) => builder.push_bind(value),
            Self::SmallInt(value) => builder.push_bind(value),
            Self::Bool(value) => builder.push_bind(value),
            Self::Text(value) => builder.push_bind(value),
            Self::Date(value) => builder.push_bind(value),
        };
    }
}

macro_rules! bind_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for BindValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(Some(value))
                }
            }

            impl From<Option<$ty>> for BindValue {
                fn from(value: Option<$ty>) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

bind_value_from! {
    i32 => Int,
    i16 => SmallInt,
    bool => Bool,
    String => Text,
    NaiveDate => Date,
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        Self::Text(Some(value.to_owned()))
    }
}

#[derive(Debug, Clone)]
enum Condition {
    Equals(&'static str, BindValue),
    Search(&'static [&'static str], String),
}

/// Conjunction of optional conditions rendered as a `WHERE` clause.
#[derive(Debug, Clone, Default)]
pub(super) struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Require `column = value` when a value is given.
    pub fn equals<V: Into<BindValue>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(bound) = value {
            self.conditions.push(Condition::Equals(column, bound.into()));
        }
        self
    }

    /// Require any of `columns` to contain `term`, ignoring case and accents.
    pub fn search(mut self, columns: &'static [&'static str], term: Option<&SearchTerm>) -> Self {
        if let Some(search) = term {
            self.conditions
                .push(Condition::Search(columns, search.contains_pattern()));
        }
        self
    }

    fn push_to(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        for (index, condition) in self.conditions.iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });
            match condition {
                Condition::Equals(column, value) => {
                    builder.push(*column).push(" = ");
                    value.push_to(builder);
                }
                Condition::Search(columns, pattern) => {
                    builder.push("(");
                    for (position, column) in columns.iter().enumerate() {
                        if position > 0 {
                            builder.push(" OR ");
                        }
                        builder
                            .push("unaccent(")
                            .push(*column)
                            .push("::text) ILIKE unaccent(")
                            .push_bind(pattern.clone())
                            .push(")");
                    }
                    builder.push(")");
                }
            }
        }
    }
}

/// Column values for `INSERT` and `UPDATE ... SET`.
#[derive(Debug, Clone, Default)]
pub(super) struct Assignments {
    values: Vec<(&'static str, BindValue)>,
}

impl Assignments {
    /// Assign `value` to `column` unconditionally.
    pub fn value<V: Into<BindValue>>(mut self, column: &'static str, value: V) -> Self {
        self.values.push((column, value.into()));
        self
    }

    /// Assign `value` when present; `None` leaves the column untouched.
    pub fn set<V: Into<BindValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(present) => self.value(column, present),
            None => self,
        }
    }

    /// Apply a nullable-column change.
    pub fn change<T>(self, column: &'static str, change: &Change<T>) -> Self
    where
        T: Clone,
        Option<T>: Into<BindValue>,
    {
        match change.as_update() {
            Some(update) => self.value(column, update.cloned()),
            None => self,
        }
    }

    /// Whether no column is assigned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Internal row type convertible into a domain record.
pub(super) trait IntoRecord {
    type Record;

    fn into_record(self) -> Result<Self::Record, RepositoryError>;
}

fn decode_all<R: IntoRecord>(rows: Vec<R>) -> Result<Vec<R::Record>, RepositoryError> {
    rows.into_iter().map(IntoRecord::into_record).collect()
}

#[derive(Debug, FromRow)]
struct OptionRow {
    id: i32,
    label: String,
}

fn select_from(table: &Table, projection: &str) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT ");
    builder.push(projection).push(" FROM ").push(table.name);
    builder
}

/// Fetch one page of rows and the total number of matches concurrently.
pub(super) async fn fetch_page<R>(
    pool: &DbPool,
    table: &Table,
    filter: &Filter,
    page: PageRequest,
) -> Result<RecordPage<R::Record>, RepositoryError>
where
    R: IntoRecord + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let operation = format!("list {}", table.name);
    let offset = i64::try_from(page.offset())
        .map_err(|_| RepositoryError::query(format!("{operation}: offset out of range")))?;

    let mut rows_query = select_from(table, table.columns);
    filter.push_to(&mut rows_query);
    rows_query
        .push(" ORDER BY ")
        .push(table.order_by)
        .push(" LIMIT ")
        .push_bind(i64::from(page.limit()))
        .push(" OFFSET ")
        .push_bind(offset);

    let mut count_query = select_from(table, "COUNT(*)");
    filter.push_to(&mut count_query);

    let (rows, total) = tokio::try_join!(
        rows_query.build_query_as::<R>().fetch_all(pool.pg()),
        count_query.build_query_scalar::<i64>().fetch_one(pool.pg()),
    )
    .map_err(|err| map_sqlx_error(&operation, err))?;

    Ok(RecordPage {
        items: decode_all(rows)?,
        total: u64::try_from(total).unwrap_or_default(),
    })
}

/// Fetch `{id, label}` options ordered by label.
pub(super) async fn fetch_options(
    pool: &DbPool,
    table: &Table,
    filter: &Filter,
) -> Result<Vec<SelectOption>, RepositoryError> {
    let projection = format!("id, {} AS label", table.label);
    let mut query = select_from(table, &projection);
    filter.push_to(&mut query);
    query.push(" ORDER BY label, id");

    let rows = query
        .build_query_as::<OptionRow>()
        .fetch_all(pool.pg())
        .await
        .map_err(|err| map_sqlx_error(&format!("select {}", table.name), err))?;
    Ok(rows
        .into_iter()
        .map(|row| SelectOption {
            id: row.id,
            label: row.label,
        })
        .collect())
}

/// Fetch the row with `id`, if any.
pub(super) async fn fetch_by_id<R>(
    pool: &DbPool,
    table: &Table,
    id: i32,
) -> Result<Option<R::Record>, RepositoryError>
where
    R: IntoRecord + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut query = select_from(table, table.columns);
    query.push(" WHERE id = ").push_bind(id);
    query
        .build_query_as::<R>()
        .fetch_optional(pool.pg())
        .await
        .map_err(|err| map_sqlx_error(&format!("get {}", table.name), err))?
        .map(IntoRecord::into_record)
        .transpose()
}

/// Insert a row and return it as stored.
pub(super) async fn insert<R>(
    pool: &DbPool,
    table: &Table,
    values: &Assignments,
) -> Result<R::Record, RepositoryError>
where
    R: IntoRecord + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut query = QueryBuilder::<Postgres>::new("INSERT INTO ");
    query.push(table.name).push(" (");
    {
        let mut columns = query.separated(", ");
        for (column, _) in &values.values {
            columns.push(*column);
        }
    }
    query.push(") VALUES (");
    for (index, (_, value)) in values.values.iter().enumerate() {
        if index > 0 {
            query.push(", ");
        }
        value.push_to(&mut query);
    }
    query.push(") RETURNING ").push(table.columns);

    query
        .build_query_as::<R>()
        .fetch_one(pool.pg())
        .await
        .map_err(|err| map_sqlx_error(&format!("create {}", table.name), err))?
        .into_record()
}

/// Update the row with `id`, returning it as stored, or `None` when absent.
pub(super) async fn update<R>(
    pool: &DbPool,
    table: &Table,
    id: i32,
    values: &Assignments,
) -> Result<Option<R::Record>, RepositoryError>
where
    R: IntoRecord + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    if values.is_empty() {
        return fetch_by_id::<R>(pool, table, id).await;
    }
    let mut query = QueryBuilder::<Postgres>::new("UPDATE ");
    query.push(table.name).push(" SET ");
    for (index, (column, value)) in values.values.iter().enumerate() {
        if index > 0 {
            query.push(", ");
        }
        query.push(*column).push(" = ");
        value.push_to(&mut query);
    }
    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" RETURNING ")
        .push(table.columns);

    query
        .build_query_as::<R>()
        .fetch_optional(pool.pg())
        .await
        .map_err(|err| map_sqlx_error(&format!("update {}", table.name), err))?
        .map(IntoRecord::into_record)
        .transpose()
}

/// Delete the row with `id`, reporting whether it existed.
pub(super) async fn delete(pool: &DbPool, table: &Table, id: i32) -> Result<bool, RepositoryError> {
    let mut query = QueryBuilder::<Postgres>::new("DELETE FROM ");
    query.push(table.name).push(" WHERE id = ").push_bind(id);
    let outcome = query
        .build()
        .execute(pool.pg())
        .await
        .map_err(|err| map_sqlx_error(&format!("delete {}", table.name), err))?;
    Ok(outcome.rows_affected() > 0)
}
