//! The network boundary.
//!
//! A [`Connector`] opens a [`Driver`] for one credential set; the driver runs
//! SQL text and hands back either a row stream or a completion summary. The
//! session and cursor layers only talk to these traits, so a different wire
//! client (or an in-memory double in tests) can be plugged in.

use crate::error::DbResult;
use crate::row::Field;
use crate::value::Value;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "mysql")]
mod mysql;

#[cfg(feature = "mysql")]
pub use mysql::MysqlConnector;

/// TLS settings for one connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TlsParams {
    pub enabled: bool,
    /// When `false`, the channel stays encrypted but certificates are not
    /// checked.
    pub verify: bool,
}

/// Fully resolved parameters of one connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub username: String,
    pub password: String,
    pub schema: Option<String>,
    pub host: String,
    pub port: u16,
    pub socket: Option<String>,
    pub tls: TlsParams,
    /// Decode numeric columns into numbers; `false` keeps them as text.
    pub int_and_float_native: bool,
    pub connect_timeout: Option<Duration>,
}

/// Outcome of running one statement.
pub enum Reply<'a> {
    /// The statement produced a result set.
    Rows(Box<dyn RowSource + Send + 'a>),
    /// The statement completed without a result set.
    Done {
        affected_rows: u64,
        last_insert_id: Option<u64>,
        warnings: u16,
    },
}

/// Server-side handle of a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedHandle {
    pub id: u32,
    pub param_count: usize,
}

/// Opens connections.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, params: &ConnectParams) -> DbResult<Box<dyn Driver>>;
}

/// One open connection.
#[async_trait]
pub trait Driver: Send {
    /// Run SQL text.
    async fn query<'a>(&'a mut self, sql: &str) -> DbResult<Reply<'a>>;

    /// Prepare a statement with `?` placeholders.
    async fn prepare(&mut self, sql: &str) -> DbResult<PreparedHandle>;

    /// Run a prepared statement with positional parameters.
    async fn execute_prepared<'a>(
        &'a mut self,
        handle: &PreparedHandle,
        params: &[Value],
    ) -> DbResult<Reply<'a>>;

    async fn close_prepared(&mut self, handle: &PreparedHandle) -> DbResult<()>;

    async fn disconnect(self: Box<Self>) -> DbResult<()>;
}

/// A result set streamed from the server.
#[async_trait]
pub trait RowSource: Send {
    fn fields(&self) -> Arc<[Field]>;

    /// Next row, or `None` once the result set is exhausted.
    async fn next_row(&mut self) -> DbResult<Option<Vec<Value>>>;

    /// Warnings reported with the result set.
    fn warnings(&self) -> u16 {
        0
    }
}

/// A [`RowSource`] over rows already in memory.
#[derive(Debug, Clone)]
pub struct MemoryRows {
    fields: Arc<[Field]>,
    rows: std::collections::VecDeque<Vec<Value>>,
}

impl MemoryRows {
    pub fn new(fields: impl Into<Arc<[Field]>>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            fields: fields.into(),
            rows: rows.into(),
        }
    }
}

#[async_trait]
impl RowSource for MemoryRows {
    fn fields(&self) -> Arc<[Field]> {
        Arc::clone(&self.fields)
    }

    async fn next_row(&mut self) -> DbResult<Option<Vec<Value>>> {
        Ok(self.rows.pop_front())
    }
}
