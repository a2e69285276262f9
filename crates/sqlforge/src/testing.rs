//! Scripted in-memory connector for unit tests.

use crate::driver::{ConnectParams, Connector, Driver, MemoryRows, PreparedHandle, Reply, RowSource};
use crate::error::{DbError, DbResult, ServerError};
use crate::row::Field;
use crate::value::Value;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Rows(Vec<Field>, Vec<Vec<Value>>),
    /// Rows followed by either a closing warning count or a server error.
    Stream {
        fields: Vec<Field>,
        rows: Vec<Vec<Value>>,
        warnings: u16,
        failure: Option<ServerError>,
    },
    Done {
        affected_rows: u64,
        last_insert_id: Option<u64>,
        warnings: u16,
    },
    Error(ServerError),
}

impl Scripted {
    pub(crate) fn rows(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let fields = columns.iter().map(|c| Field::new(*c, "var_string")).collect();
        Self::Rows(fields, rows)
    }

    pub(crate) fn stream(
        columns: &[&str],
        rows: Vec<Vec<Value>>,
        warnings: u16,
        failure: Option<ServerError>,
    ) -> Self {
        let fields = columns.iter().map(|c| Field::new(*c, "var_string")).collect();
        Self::Stream {
            fields,
            rows,
            warnings,
            failure,
        }
    }

    pub(crate) fn affected(affected_rows: u64) -> Self {
        Self::Done {
            affected_rows,
            last_insert_id: None,
            warnings: 0,
        }
    }

    pub(crate) fn inserted(affected_rows: u64, id: u64) -> Self {
        Self::Done {
            affected_rows,
            last_insert_id: Some(id),
            warnings: 0,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    transcript: Mutex<Vec<String>>,
    attempts: Mutex<Vec<String>>,
    committed_rows: Mutex<u64>,
}

/// Accepts a fixed set of accounts and answers SQL from a script.
///
/// Transaction control statements and `USE` succeed unless scripted
/// otherwise; any other unscripted SQL is rejected as a syntax error.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockConnector {
    accounts: Vec<(String, String)>,
    script: HashMap<String, Scripted>,
    delay: Option<Duration>,
    shared: Arc<Shared>,
}

impl MockConnector {
    pub(crate) fn new() -> Self {
        Self::default().account("root", "secret")
    }

    pub(crate) fn account(mut self, user: &str, password: &str) -> Self {
        self.accounts.push((user.to_string(), password.to_string()));
        self
    }

    pub(crate) fn script(mut self, sql: &str, reply: Scripted) -> Self {
        self.script.insert(sql.to_string(), reply);
        self
    }

    pub(crate) fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// SQL received by every connection, in order.
    pub(crate) fn transcript(&self) -> Vec<String> {
        lock(&self.shared.transcript).clone()
    }

    /// Rows inserted outside a transaction or by a committed one.
    pub(crate) fn committed_rows(&self) -> u64 {
        *lock(&self.shared.committed_rows)
    }

    /// `user@host` of every connection attempt.
    pub(crate) fn attempts(&self) -> Vec<String> {
        lock(&self.shared.attempts).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, params: &ConnectParams) -> DbResult<Box<dyn Driver>> {
        lock(&self.shared.attempts).push(format!("{}@{}", params.username, params.host));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let known = self
            .accounts
            .iter()
            .any(|(user, password)| *user == params.username && *password == params.password);
        if !known {
            return Err(ServerError::new(
                1045,
                "28000",
                format!(
                    "Access denied for user '{}'@'localhost' (using password: {})",
                    params.username,
                    if params.password.is_empty() { "NO" } else { "YES" }
                ),
            )
            .into());
        }
        Ok(Box::new(MockDriver {
            script: self.script.clone(),
            shared: Arc::clone(&self.shared),
            prepared: HashMap::new(),
            next_id: 1,
            pending_rows: None,
        }))
    }
}

struct MockDriver {
    script: HashMap<String, Scripted>,
    shared: Arc<Shared>,
    prepared: HashMap<u32, String>,
    next_id: u32,
    /// Rows inserted by the open transaction, if any.
    pending_rows: Option<u64>,
}

impl MockDriver {
    fn count_rows(&mut self, sql: &str, affected_rows: u64) {
        match sql {
            "START TRANSACTION" => self.pending_rows = Some(0),
            "COMMIT" => {
                if let Some(rows) = self.pending_rows.take() {
                    *lock(&self.shared.committed_rows) += rows;
                }
            }
            "ROLLBACK" => self.pending_rows = None,
            _ if sql.starts_with("INSERT") => match &mut self.pending_rows {
                Some(pending) => *pending += affected_rows,
                None => *lock(&self.shared.committed_rows) += affected_rows,
            },
            _ => {}
        }
    }

    fn reply(&mut self, sql: &str) -> DbResult<Reply<'static>> {
        lock(&self.shared.transcript).push(sql.to_string());
        let scripted = match self.script.get(sql) {
            Some(scripted) => scripted.clone(),
            None if is_control(sql) => Scripted::affected(0),
            None => Scripted::Error(ServerError::new(
                1064,
                "42000",
                format!("You have an error in your SQL syntax near '{sql}'"),
            )),
        };
        match scripted {
            Scripted::Rows(fields, rows) => Ok(Reply::Rows(Box::new(MemoryRows::new(fields, rows)))),
            Scripted::Stream {
                fields,
                rows,
                warnings,
                failure,
            } => Ok(Reply::Rows(Box::new(StreamRows {
                fields: fields.into(),
                rows: rows.into(),
                warnings,
                failure,
                finished: false,
            }))),
            Scripted::Done {
                affected_rows,
                last_insert_id,
                warnings,
            } => {
                self.count_rows(sql, affected_rows);
                Ok(Reply::Done {
                    affected_rows,
                    last_insert_id,
                    warnings,
                })
            }
            Scripted::Error(err) => Err(err.into()),
        }
    }
}

/// Reports warnings only after the last row, as the server does.
struct StreamRows {
    fields: Arc<[Field]>,
    rows: VecDeque<Vec<Value>>,
    warnings: u16,
    failure: Option<ServerError>,
    finished: bool,
}

#[async_trait]
impl RowSource for StreamRows {
    fn fields(&self) -> Arc<[Field]> {
        Arc::clone(&self.fields)
    }

    async fn next_row(&mut self) -> DbResult<Option<Vec<Value>>> {
        if let Some(row) = self.rows.pop_front() {
            return Ok(Some(row));
        }
        if let Some(failure) = self.failure.take() {
            return Err(failure.into());
        }
        self.finished = true;
        Ok(None)
    }

    fn warnings(&self) -> u16 {
        if self.finished { self.warnings } else { 0 }
    }
}

fn is_control(sql: &str) -> bool {
    matches!(sql, "START TRANSACTION" | "COMMIT" | "ROLLBACK") || sql.starts_with("USE ")
}

#[async_trait]
impl Driver for MockDriver {
    async fn query<'a>(&'a mut self, sql: &str) -> DbResult<Reply<'a>> {
        self.reply(sql)
    }

    async fn prepare(&mut self, sql: &str) -> DbResult<PreparedHandle> {
        let handle = PreparedHandle {
            id: self.next_id,
            param_count: sql.matches('?').count(),
        };
        self.next_id += 1;
        self.prepared.insert(handle.id, sql.to_string());
        Ok(handle)
    }

    async fn execute_prepared<'a>(
        &'a mut self,
        handle: &PreparedHandle,
        params: &[Value],
    ) -> DbResult<Reply<'a>> {
        let Some(sql) = self.prepared.get(&handle.id) else {
            return Err(DbError::logic("Prepared statement is closed"));
        };
        let rendered = params.iter().try_fold(sql.clone(), |sql, value| {
            crate::escape::quote(value).map(|quoted| sql.replacen('?', &quoted, 1))
        })?;
        self.reply(&rendered)
    }

    async fn close_prepared(&mut self, handle: &PreparedHandle) -> DbResult<()> {
        self.prepared.remove(&handle.id);
        Ok(())
    }

    async fn disconnect(self: Box<Self>) -> DbResult<()> {
        Ok(())
    }
}
