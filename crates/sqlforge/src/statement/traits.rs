use crate::cursor::Cursor;
use crate::error::DbResult;
use crate::session::Session;
use std::future::Future;

/// Anything that renders to one SQL statement.
///
/// Implementors can be embedded in other statements through
/// [`Expr::subquery`](crate::Expr::subquery).
pub trait Statement: Send + Sync {
    /// Render the statement. Rendering validates every clause, so builder
    /// mistakes surface here before any network activity.
    fn sql(&self) -> DbResult<String>;
}

/// Statements that produce a result set.
pub trait ResultStatement: Statement {
    /// Render and run the statement, returning a buffered cursor.
    fn run(&self, session: &mut Session) -> impl Future<Output = DbResult<Cursor<'static>>> + Send {
        async move {
            let sql = self.sql()?;
            session.query(&sql).await
        }
    }
}

/// Statements that report an affected-row count.
pub trait CountStatement: Statement {
    /// Render and run the statement, returning the affected-row count.
    fn run(&self, session: &mut Session) -> impl Future<Output = DbResult<u64>> + Send {
        async move {
            let sql = self.sql()?;
            session.execute(&sql).await
        }
    }
}
