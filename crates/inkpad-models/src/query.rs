//! Lazy, restartable equality queries over a record table.
//!
//! A [`Query`] only describes which rows are wanted. Nothing touches the
//! database until one of the execution methods runs, and every execution
//! issues a fresh `SELECT`, so the same query value can be iterated any
//! number of times and always reflects the current table contents.

use std::fmt;
use std::marker::PhantomData;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use crate::error::ModelError;

/// A filterable column of a record table.
pub trait Column: Copy + fmt::Debug {
    /// The SQL column name.
    fn name(self) -> &'static str;
}

/// A row type stored in its own table.
pub trait Record: Sized {
    /// The columns a [`Query`] may filter on.
    type Field: Column;

    /// Table name.
    const TABLE: &'static str;

    /// Comma-separated column list, in the order [`Record::from_row`] reads it.
    const COLUMNS: &'static str;

    /// Builds a record from a row selected with [`Record::COLUMNS`].
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// A conjunction of `column = value` filters on `R`'s table.
pub struct Query<R: Record> {
    filters: Vec<(R::Field, Value)>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Query<R> {
    /// A query matching every row.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            _record: PhantomData,
        }
    }

    /// Narrows the query to rows where `field` equals `value` exactly.
    pub fn filter_by(mut self, field: R::Field, value: impl Into<Value>) -> Self {
        self.filters.push((field, value.into()));
        self
    }

    fn where_clause(&self) -> String {
        if self.filters.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .filters
            .iter()
            .enumerate()
            .map(|(idx, (field, _))| format!("{} = ?{}", field.name(), idx + 1))
            .collect();
        format!(" WHERE {}", parts.join(" AND "))
    }

    fn select_sql(&self, limit: Option<u32>) -> String {
        let mut sql = format!(
            "SELECT {} FROM {}{} ORDER BY id ASC",
            R::COLUMNS,
            R::TABLE,
            self.where_clause()
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        sql
    }

    fn params(&self) -> impl Iterator<Item = &Value> {
        self.filters.iter().map(|(_, value)| value)
    }

    /// Runs the query and collects every matching record.
    pub fn all(&self, conn: &Connection) -> Result<Vec<R>, ModelError> {
        let mut records = Vec::new();
        self.for_each(conn, |record| records.push(record))?;
        Ok(records)
    }

    /// Runs the query and returns the lowest-id match, if any.
    pub fn first(&self, conn: &Connection) -> Result<Option<R>, ModelError> {
        let record = conn
            .query_row(
                &self.select_sql(Some(1)),
                params_from_iter(self.params()),
                R::from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Counts matching rows without materializing them.
    pub fn count(&self, conn: &Connection) -> Result<i64, ModelError> {
        let sql = format!("SELECT COUNT(*) FROM {}{}", R::TABLE, self.where_clause());
        let count = conn.query_row(&sql, params_from_iter(self.params()), |row| row.get(0))?;
        Ok(count)
    }

    /// Streams matching records to `f` one row at a time.
    ///
    /// Returns how many records were visited.
    pub fn for_each<F>(&self, conn: &Connection, mut f: F) -> Result<usize, ModelError>
    where
        F: FnMut(R),
    {
        let mut stmt = conn.prepare(&self.select_sql(None))?;
        let rows = stmt.query_map(params_from_iter(self.params()), R::from_row)?;
        let mut visited = 0;
        for row in rows {
            f(row?);
            visited += 1;
        }
        Ok(visited)
    }
}

impl<R: Record> Default for Query<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Clone for Query<R> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> fmt::Debug for Query<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("table", &R::TABLE)
            .field("filters", &self.filters)
            .finish()
    }
}
