//! Transaction helpers.
//!
//! [`Session::transaction`](crate::Session::transaction) takes an async
//! closure. The [`transaction!`] macro gives the same commit/rollback
//! contract for an inline block:
//!
//! ```ignore
//! use sqlforge::{DbResult, Session};
//!
//! # async fn demo(session: &mut Session) -> DbResult<()> {
//! sqlforge::transaction!(session, tx, {
//!     tx.execute("UPDATE accounts SET balance = balance - 100 WHERE id = 1").await?;
//!     tx.execute("UPDATE accounts SET balance = balance + 100 WHERE id = 2").await?;
//!     Ok(())
//! })?;
//! # Ok(()) }
//! ```

use crate::error::DbError;

/// Runs the given block inside a transaction on a `&mut Session`.
///
/// - Starts the transaction with `$session.begin().await`.
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)` and evaluates to the block's error.
///
/// The block must evaluate to `sqlforge::DbResult<T>`.
#[macro_export]
macro_rules! transaction {
    ($session:expr, $tx:ident, $body:block) => {{
        let $tx: &mut $crate::Session = $session;
        $tx.begin().await?;

        let __sqlforge_tx_body_result = async { $body }.await;
        match __sqlforge_tx_body_result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_err) = $tx.rollback().await {
                    $crate::transaction::__rollback_failed(&error, &rollback_err);
                }
                Err(error)
            }
        }
    }};
}

/// Report a rollback that failed after the transaction body failed.
///
/// Used by the [`transaction!`] macro. Not intended for direct use.
#[doc(hidden)]
pub fn __rollback_failed(error: &DbError, rollback_error: &DbError) {
    tracing::error!(
        error = %error,
        rollback_error = %rollback_error,
        "rollback failed"
    );
}
