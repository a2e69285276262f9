//! Connection and transaction management.
//!
//! A [`Session`] owns one server connection. Statements run one at a time:
//! every operation takes `&mut self`, and an unbuffered cursor keeps the
//! session borrowed until it is dropped.
//!
//! ```ignore
//! use sqlforge::prelude::*;
//!
//! let config = ConnectionConfig::new("app", "secret")
//!     .schema("shop")
//!     .failover(Failover::new("app_ro", "other"));
//! let mut session = Session::connect(config).await?;
//!
//! let mut q = select();
//! q.from("orders").where_equal("status", "open");
//! let mut cursor = q.run(&mut session).await?;
//! while let Some(row) = cursor.fetch().await? {
//!     println!("{}", row.to_json());
//! }
//!
//! session
//!     .transaction(async |s| {
//!         s.execute("UPDATE orders SET status = 'closed'").await?;
//!         Ok(())
//!     })
//!     .await?;
//! ```

use crate::config::ConnectionConfig;
use crate::cursor::Cursor;
use crate::driver::{ConnectParams, Connector, Driver, PreparedHandle, Reply, RowSource};
use crate::error::{DbError, DbResult, ServerError};
use crate::escape::protect_identifier;
use crate::row::Field;
use crate::value::Value;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

mod prepared;


pub use prepared::PreparedStatement;

/// One statement sent to the server.
#[derive(Clone, Copy)]
enum Command<'q> {
    Text(&'q str),
    Prepared(&'q PreparedHandle, &'q [Value]),
}

impl Command<'_> {
    async fn send<'d>(self, driver: &'d mut dyn Driver) -> DbResult<Reply<'d>> {
        match self {
            Command::Text(sql) => driver.query(sql).await,
            Command::Prepared(handle, params) => driver.execute_prepared(handle, params).await,
        }
    }
}

/// Buffered result of one statement.
struct Buffered {
    fields: Arc<[Field]>,
    rows: Vec<Vec<Value>>,
    warnings: u16,
}

/// Completion summary of one statement.
struct Completion {
    affected_rows: u64,
    last_insert_id: Option<u64>,
    warnings: u16,
}

/// A connection to a MySQL or MariaDB server.
pub struct Session {
    connector: Arc<dyn Connector>,
    config: ConnectionConfig,
    driver: Option<Box<dyn Driver>>,
    diagnostics: Vec<ServerError>,
    last_query: Option<String>,
    insert_id: u64,
    warnings: u16,
    in_transaction: bool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.config.host)
            .field("username", &self.config.username)
            .field("connected", &self.driver.is_some())
            .field("in_transaction", &self.in_transaction)
            .finish_non_exhaustive()
    }
}

fn closed() -> DbError {
    DbError::logic("Session is closed")
}

fn no_result(sql: &str) -> DbError {
    DbError::invalid_argument(format!("Statement does not return result: {sql}"))
}

/// Streamed rows that report back to the session: server errors raised
/// mid-stream go to the error log, and the warning count is taken once the
/// result set is exhausted.
struct Tracked<'s> {
    inner: Box<dyn RowSource + Send + 's>,
    diagnostics: &'s mut Vec<ServerError>,
    warnings: &'s mut u16,
}

#[async_trait]
impl RowSource for Tracked<'_> {
    fn fields(&self) -> Arc<[Field]> {
        self.inner.fields()
    }

    async fn next_row(&mut self) -> DbResult<Option<Vec<Value>>> {
        match self.inner.next_row().await {
            Ok(Some(row)) => Ok(Some(row)),
            Ok(None) => {
                *self.warnings = self.inner.warnings();
                Ok(None)
            }
            Err(err) => {
                if let DbError::Server(server) = &err {
                    self.diagnostics.push(server.clone());
                }
                Err(err)
            }
        }
    }

    fn warnings(&self) -> u16 {
        self.inner.warnings()
    }
}

async fn connect_once(
    connector: &dyn Connector,
    params: &ConnectParams,
) -> DbResult<Box<dyn Driver>> {
    match params.connect_timeout {
        Some(limit) => tokio::time::timeout(limit, connector.connect(params))
            .await
            .map_err(|_| {
                DbError::Connection(format!(
                    "Timed out after {}ms connecting to {}:{}",
                    limit.as_millis(),
                    params.host,
                    params.port
                ))
            })?,
        None => connector.connect(params).await,
    }
}

/// Try every credential set in order. Returns the open driver together
/// with the server errors of the attempts that failed before it.
async fn open(
    connector: &dyn Connector,
    config: &ConnectionConfig,
) -> DbResult<(Box<dyn Driver>, Vec<ServerError>)> {
    let mut failures = Vec::new();
    let mut last_error = None;

    for (attempt, params) in config.credential_sets().iter().enumerate() {
        match connect_once(connector, params).await {
            Ok(driver) => {
                tracing::info!(
                    attempt,
                    host = %params.host,
                    user = %params.username,
                    "connected"
                );
                return Ok((driver, failures));
            }
            Err(err @ (DbError::Server(_) | DbError::Connection(_))) => {
                tracing::warn!(
                    attempt,
                    host = %params.host,
                    user = %params.username,
                    error = %err,
                    "connection attempt failed"
                );
                if let DbError::Server(server) = &err {
                    failures.push(server.clone());
                }
                last_error = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_error.unwrap_or_else(|| DbError::Connection("No credentials to try".to_string())))
}

impl Session {
    /// Connect with the `mysql_async` driver.
    #[cfg(feature = "mysql")]
    pub async fn connect(config: ConnectionConfig) -> DbResult<Self> {
        Self::connect_with(Arc::new(crate::driver::MysqlConnector), config).await
    }

    /// Connect through `connector`, falling back to each failover entry when
    /// an attempt fails. Only the last attempt's error is returned.
    pub async fn connect_with(
        connector: Arc<dyn Connector>,
        config: ConnectionConfig,
    ) -> DbResult<Self> {
        config.validate()?;
        let (driver, diagnostics) = open(connector.as_ref(), &config).await?;
        Ok(Self {
            connector,
            config,
            driver: Some(driver),
            diagnostics,
            last_query: None,
            insert_id: 0,
            warnings: 0,
            in_transaction: false,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.driver.is_none()
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Id generated by the most recent insert on this session.
    pub fn insert_id(&self) -> u64 {
        self.insert_id
    }

    /// Warning count of the most recent statement. For an unbuffered query
    /// the count is known once every row has been read.
    pub fn warnings(&self) -> u16 {
        self.warnings
    }

    /// Every server error reported since the session was opened or reset.
    pub fn errors(&self) -> &[ServerError] {
        &self.diagnostics
    }

    /// The most recent server error.
    pub fn error(&self) -> Option<&ServerError> {
        self.diagnostics.last()
    }

    /// SQL text of the most recent statement.
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    fn start(&mut self, sql: &str, kind: &'static str) -> DbResult<()> {
        if self.driver.is_none() {
            return Err(closed());
        }
        tracing::debug!(target: "sqlforge.sql", sql = %sql, kind, "sending statement");
        self.last_query = Some(sql.to_string());
        Ok(())
    }

    fn track<T>(&mut self, result: DbResult<T>) -> DbResult<T> {
        if let Err(DbError::Server(server)) = &result {
            self.diagnostics.push(server.clone());
        }
        result
    }

    fn complete(&mut self, completion: &Completion) {
        self.warnings = completion.warnings;
        if let Some(id) = completion.last_insert_id.filter(|id| *id != 0) {
            self.insert_id = id;
        }
    }

    async fn run_count(&mut self, command: Command<'_>) -> DbResult<u64> {
        let driver = self.driver.as_deref_mut().ok_or_else(closed)?;
        let outcome = match command.send(driver).await {
            Ok(Reply::Done {
                affected_rows,
                last_insert_id,
                warnings,
            }) => Ok(Completion {
                affected_rows,
                last_insert_id,
                warnings,
            }),
            Ok(Reply::Rows(mut rows)) => {
                let mut count = 0;
                let mut drained = Ok(());
                loop {
                    match rows.next_row().await {
                        Ok(Some(_)) => count += 1,
                        Ok(None) => break,
                        Err(err) => {
                            drained = Err(err);
                            break;
                        }
                    }
                }
                drained.map(|()| Completion {
                    affected_rows: count,
                    last_insert_id: None,
                    warnings: rows.warnings(),
                })
            }
            Err(err) => Err(err),
        };
        let completion = self.track(outcome)?;
        self.complete(&completion);
        Ok(completion.affected_rows)
    }

    async fn run_buffered(&mut self, command: Command<'_>, sql: &str) -> DbResult<Cursor<'static>> {
        let driver = self.driver.as_deref_mut().ok_or_else(closed)?;
        let outcome = match command.send(driver).await {
            Ok(Reply::Rows(mut source)) => {
                let mut rows = Vec::new();
                let mut drained = Ok(());
                loop {
                    match source.next_row().await {
                        Ok(Some(values)) => rows.push(values),
                        Ok(None) => break,
                        Err(err) => {
                            drained = Err(err);
                            break;
                        }
                    }
                }
                drained.map(|()| Buffered {
                    fields: source.fields(),
                    rows,
                    warnings: source.warnings(),
                })
            }
            Ok(Reply::Done { .. }) => Err(no_result(sql)),
            Err(err) => Err(err),
        };
        let buffered = self.track(outcome)?;
        self.warnings = buffered.warnings;
        Ok(Cursor::buffered(buffered.fields, buffered.rows))
    }

    /// Run a statement and return the affected-row count. Statements that
    /// return rows are drained and their row count is returned.
    pub async fn execute(&mut self, sql: &str) -> DbResult<u64> {
        self.start(sql, "execute")?;
        self.run_count(Command::Text(sql)).await
    }

    /// Run a statement that returns rows and buffer the whole result.
    pub async fn query(&mut self, sql: &str) -> DbResult<Cursor<'static>> {
        self.start(sql, "query")?;
        self.run_buffered(Command::Text(sql), sql).await
    }

    /// Run a statement that returns rows and stream the result.
    pub async fn query_unbuffered(&mut self, sql: &str) -> DbResult<Cursor<'_>> {
        self.start(sql, "query_unbuffered")?;
        let Self {
            driver,
            diagnostics,
            warnings,
            ..
        } = self;
        let driver = driver.as_deref_mut().ok_or_else(closed)?;
        match driver.query(sql).await {
            Ok(Reply::Rows(stream)) => {
                *warnings = 0;
                Ok(Cursor::unbuffered(Box::new(Tracked {
                    inner: stream,
                    diagnostics,
                    warnings,
                })))
            }
            Ok(Reply::Done { .. }) => Err(no_result(sql)),
            Err(err) => {
                if let DbError::Server(server) = &err {
                    diagnostics.push(server.clone());
                }
                Err(err)
            }
        }
    }

    /// Prepare a statement with `?` placeholders for repeated execution.
    pub async fn prepare(&mut self, sql: &str) -> DbResult<PreparedStatement> {
        self.start(sql, "prepare")?;
        let driver = self.driver.as_deref_mut().ok_or_else(closed)?;
        let handle = driver.prepare(sql).await;
        let handle = self.track(handle)?;
        Ok(PreparedStatement::new(handle, sql))
    }

    /// Switch the default schema.
    pub async fn use_schema(&mut self, schema: &str) -> DbResult<()> {
        self.execute(&format!("USE {}", protect_identifier(schema)))
            .await
            .map(|_| ())
    }

    /// Start a transaction.
    pub async fn begin(&mut self) -> DbResult<()> {
        if self.driver.is_none() {
            return Err(closed());
        }
        if self.in_transaction {
            return Err(DbError::logic("Transaction already is active"));
        }
        self.execute("START TRANSACTION").await?;
        self.in_transaction = true;
        Ok(())
    }

    pub async fn commit(&mut self) -> DbResult<()> {
        self.finish_transaction("COMMIT").await
    }

    pub async fn rollback(&mut self) -> DbResult<()> {
        self.finish_transaction("ROLLBACK").await
    }

    async fn finish_transaction(&mut self, sql: &str) -> DbResult<()> {
        if self.driver.is_none() {
            return Err(closed());
        }
        if !self.in_transaction {
            return Err(DbError::logic("Transaction is not active"));
        }
        let result = self.execute(sql).await;
        self.in_transaction = false;
        result.map(|_| ())
    }

    /// Run `work` inside a transaction.
    ///
    /// Commits when `work` returns `Ok`. On `Err` the transaction is rolled
    /// back and the error from `work` is returned unchanged.
    pub async fn transaction<T, F>(&mut self, work: F) -> DbResult<T>
    where
        F: AsyncFnOnce(&mut Session) -> DbResult<T>,
    {
        self.begin().await?;
        match work(self).await {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) = self.rollback().await {
                    tracing::error!(
                        error = %error,
                        rollback_error = %rollback_error,
                        "rollback failed"
                    );
                }
                Err(error)
            }
        }
    }

    /// Reconnect, clearing the error log and per-statement state.
    pub async fn reset(&mut self) -> DbResult<()> {
        if let Some(driver) = self.driver.take() {
            if let Err(err) = driver.disconnect().await {
                tracing::warn!(error = %err, "disconnect failed during reset");
            }
        }
        self.in_transaction = false;
        self.last_query = None;
        self.insert_id = 0;
        self.warnings = 0;
        let (driver, diagnostics) = open(self.connector.as_ref(), &self.config).await?;
        self.driver = Some(driver);
        self.diagnostics = diagnostics;
        Ok(())
    }

    /// Disconnect. Every later operation fails.
    pub async fn close(&mut self) -> DbResult<()> {
        let driver = self.driver.take().ok_or_else(closed)?;
        self.in_transaction = false;
        driver.disconnect().await
    }

    async fn execute_prepared(
        &mut self,
        handle: &PreparedHandle,
        sql: &str,
        params: &[Value],
    ) -> DbResult<u64> {
        self.start(sql, "execute_prepared")?;
        self.run_count(Command::Prepared(handle, params)).await
    }

    async fn query_prepared(
        &mut self,
        handle: &PreparedHandle,
        sql: &str,
        params: &[Value],
    ) -> DbResult<Cursor<'static>> {
        self.start(sql, "query_prepared")?;
        self.run_buffered(Command::Prepared(handle, params), sql).await
    }

    async fn close_prepared(&mut self, handle: &PreparedHandle) -> DbResult<()> {
        let driver = self.driver.as_deref_mut().ok_or_else(closed)?;
        driver.close_prepared(handle).await
    }
}
