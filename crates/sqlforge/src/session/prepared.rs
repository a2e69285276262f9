use super::Session;
use crate::cursor::Cursor;
use crate::driver::PreparedHandle;
use crate::error::{DbError, DbResult};
use crate::value::Value;

/// A server-side prepared statement.
///
/// Parameters bind positionally to the `?` placeholders. The statement
/// belongs to the session that prepared it and is invalidated when that
/// session is reset or closed.
#[derive(Debug, Clone)]
pub struct PreparedStatement {
    handle: PreparedHandle,
    sql: String,
}

impl PreparedStatement {
    pub(super) fn new(handle: PreparedHandle, sql: &str) -> Self {
        Self {
            handle,
            sql: sql.to_string(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of `?` placeholders.
    pub fn param_count(&self) -> usize {
        self.handle.param_count
    }

    fn check(&self, params: &[Value]) -> DbResult<()> {
        if params.len() != self.handle.param_count {
            return Err(DbError::invalid_argument(format!(
                "Statement expects {} parameters, got {}: {}",
                self.handle.param_count,
                params.len(),
                self.sql
            )));
        }
        Ok(())
    }

    /// Run with `params` and return the affected-row count.
    pub async fn execute(&self, session: &mut Session, params: &[Value]) -> DbResult<u64> {
        self.check(params)?;
        session
            .execute_prepared(&self.handle, &self.sql, params)
            .await
    }

    /// Run with `params` and buffer the result rows.
    pub async fn query(
        &self,
        session: &mut Session,
        params: &[Value],
    ) -> DbResult<Cursor<'static>> {
        self.check(params)?;
        session.query_prepared(&self.handle, &self.sql, params).await
    }

    /// Release the statement on the server.
    pub async fn close(self, session: &mut Session) -> DbResult<()> {
        session.close_prepared(&self.handle).await
    }
}
