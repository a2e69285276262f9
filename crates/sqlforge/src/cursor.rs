//! Result cursors.
//!
//! A [`Cursor`] is either buffered (every row read up front, random access
//! allowed) or unbuffered (rows streamed from the connection one at a time,
//! forward only). The mode is fixed when the cursor is created.

use crate::driver::RowSource;
use crate::error::{DbError, DbResult};
use crate::row::{Field, FromRow, Row};
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;


enum Source<'s> {
    Buffered {
        rows: Vec<Vec<Value>>,
        position: usize,
    },
    Unbuffered {
        stream: Box<dyn RowSource + Send + 's>,
        read: u64,
        done: bool,
    },
}

/// Rows returned by a query.
///
/// Unbuffered cursors borrow the session that produced them, so no other
/// statement can run until the cursor is dropped.
pub struct Cursor<'s> {
    fields: Arc<[Field]>,
    source: Source<'s>,
    freed: bool,
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("fields", &self.fields)
            .field("buffered", &self.is_buffered())
            .field("freed", &self.freed)
            .finish()
    }
}

impl Cursor<'static> {
    /// A buffered cursor over rows already in memory.
    pub fn buffered(fields: impl Into<Arc<[Field]>>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            fields: fields.into(),
            source: Source::Buffered { rows, position: 0 },
            freed: false,
        }
    }
}

impl<'s> Cursor<'s> {
    /// A forward-only cursor reading from `stream`.
    pub fn unbuffered(stream: Box<dyn RowSource + Send + 's>) -> Self {
        Self {
            fields: stream.fields(),
            source: Source::Unbuffered {
                stream,
                read: 0,
                done: false,
            },
            freed: false,
        }
    }

    fn ensure_open(&self) -> DbResult<()> {
        if self.freed {
            return Err(DbError::logic("Result is already free"));
        }
        Ok(())
    }

    pub fn is_buffered(&self) -> bool {
        matches!(self.source, Source::Buffered { .. })
    }

    /// Number of rows. For unbuffered cursors this is the number of rows
    /// streamed so far.
    pub fn num_rows(&self) -> DbResult<u64> {
        self.ensure_open()?;
        Ok(match &self.source {
            Source::Buffered { rows, .. } => rows.len() as u64,
            Source::Unbuffered { read, .. } => *read,
        })
    }

    /// Column metadata, available before any row is fetched.
    pub fn fetch_fields(&self) -> DbResult<&[Field]> {
        self.ensure_open()?;
        Ok(&self.fields)
    }

    /// Position the cursor so the next fetch returns row `offset`.
    pub fn move_cursor(&mut self, offset: i64) -> DbResult<()> {
        self.ensure_open()?;
        match &mut self.source {
            Source::Buffered { rows, position } => {
                let index = usize::try_from(offset)
                    .ok()
                    .filter(|i| *i < rows.len())
                    .ok_or_else(|| {
                        DbError::out_of_range(format!("Invalid cursor offset: {offset}"))
                    })?;
                *position = index;
                Ok(())
            }
            Source::Unbuffered { .. } => Err(DbError::logic(
                "Cursor cannot be moved on unbuffered results",
            )),
        }
    }

    async fn next_values(&mut self) -> DbResult<Option<Vec<Value>>> {
        self.ensure_open()?;
        match &mut self.source {
            Source::Buffered { rows, position } => {
                let row = rows.get(*position).cloned();
                if row.is_some() {
                    *position += 1;
                }
                Ok(row)
            }
            Source::Unbuffered { stream, read, done } => {
                if *done {
                    return Ok(None);
                }
                match stream.next_row().await? {
                    Some(values) => {
                        *read += 1;
                        Ok(Some(values))
                    }
                    None => {
                        *done = true;
                        Ok(None)
                    }
                }
            }
        }
    }

    fn row(&self, values: Vec<Value>) -> Row {
        Row::new(Arc::clone(&self.fields), values)
    }

    /// Next row, or `None` at the end of the result.
    pub async fn fetch(&mut self) -> DbResult<Option<Row>> {
        let values = self.next_values().await?;
        Ok(values.map(|v| self.row(v)))
    }

    /// Next row as a column name to value map.
    pub async fn fetch_array(&mut self) -> DbResult<Option<BTreeMap<String, Value>>> {
        Ok(self.fetch().await?.map(Row::into_map))
    }

    /// Next row mapped through [`FromRow`].
    pub async fn fetch_as<T: FromRow>(&mut self) -> DbResult<Option<T>> {
        match self.fetch().await? {
            Some(row) => Ok(Some(T::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Remaining rows from the current position.
    pub async fn fetch_all(&mut self) -> DbResult<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    pub async fn fetch_array_all(&mut self) -> DbResult<Vec<BTreeMap<String, Value>>> {
        let rows = self.fetch_all().await?;
        Ok(rows.into_iter().map(Row::into_map).collect())
    }

    pub async fn fetch_all_as<T: FromRow>(&mut self) -> DbResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.fetch_as().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Row at `index`. The cursor is left right after it.
    pub async fn fetch_row(&mut self, index: i64) -> DbResult<Option<Row>> {
        self.move_cursor(index)?;
        self.fetch().await
    }

    pub async fn fetch_array_row(
        &mut self,
        index: i64,
    ) -> DbResult<Option<BTreeMap<String, Value>>> {
        Ok(self.fetch_row(index).await?.map(Row::into_map))
    }

    /// Release the result. Unread streamed rows are drained so the
    /// connection can run the next statement.
    pub async fn free(&mut self) -> DbResult<()> {
        self.ensure_open()?;
        match &mut self.source {
            Source::Buffered { rows, position } => {
                rows.clear();
                *position = 0;
            }
            Source::Unbuffered { stream, done, .. } => {
                while !*done {
                    *done = stream.next_row().await?.is_none();
                }
            }
        }
        self.freed = true;
        Ok(())
    }

    /// Map every row fetched from now on with `ctor`.
    pub fn set_fetch_class<T, F>(self, ctor: F) -> ClassCursor<'s, T, F>
    where
        F: FnMut(Row) -> DbResult<T>,
    {
        ClassCursor {
            cursor: self,
            ctor,
        }
    }
}

/// A cursor that materializes rows into a caller-supplied type.
pub struct ClassCursor<'s, T, F>
where
    F: FnMut(Row) -> DbResult<T>,
{
    cursor: Cursor<'s>,
    ctor: F,
}

impl<'s, T, F> ClassCursor<'s, T, F>
where
    F: FnMut(Row) -> DbResult<T>,
{
    pub async fn fetch(&mut self) -> DbResult<Option<T>> {
        match self.cursor.fetch().await? {
            Some(row) => Ok(Some((self.ctor)(row)?)),
            None => Ok(None),
        }
    }

    pub async fn fetch_all(&mut self) -> DbResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.fetch().await? {
            items.push(item);
        }
        Ok(items)
    }

    pub async fn fetch_row(&mut self, index: i64) -> DbResult<Option<T>> {
        self.cursor.move_cursor(index)?;
        self.fetch().await
    }

    /// The underlying cursor, for positioning and metadata.
    pub fn cursor(&mut self) -> &mut Cursor<'s> {
        &mut self.cursor
    }

    /// Drop the row constructor and return the plain cursor.
    pub fn into_inner(self) -> Cursor<'s> {
        self.cursor
    }
}
