//! # sqlforge
//!
//! A MySQL/MariaDB client engine: safe identifier and value escaping,
//! composable statement builders, a session with credential failover and
//! transactions, and buffered or streaming result cursors.
//!
//! ## Features
//!
//! - **Builders render on demand**: mutate a builder and call `sql()` again
//! - **Validation before the network**: bad JOIN types, options, operators
//!   and missing clauses fail at render time
//! - **Subqueries**: any statement builder can be embedded as an [`Expr`]
//! - **Failover**: alternate credential sets are tried in order on connect
//! - **Cursors**: buffered (random access) or unbuffered (streaming)
//! - **Typed rows**: map rows to structs through [`FromRow`]
//!
//! ## Example
//!
//! ```ignore
//! use sqlforge::prelude::*;
//!
//! let mut session = Session::connect(ConnectionConfig::from_env()?).await?;
//!
//! let mut insert = insert_into("users");
//! insert.columns(["name", "email"]).values(["alice", "alice@example.com"]);
//! insert.run(&mut session).await?;
//! let id = session.insert_id();
//!
//! let mut q = select();
//! q.columns(["id", "name"]).from("users").where_equal("id", id);
//! let user: Option<User> = q.run(&mut session).await?.fetch_as().await?;
//! ```

pub mod clause;
pub mod config;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod escape;
pub mod expr;
pub mod prelude;
pub mod row;
pub mod session;
pub mod statement;
pub mod transaction;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use clause::{
    FromBuilder, GroupByBuilder, HavingBuilder, JoinBuilder, LimitBuilder, Operand,
    OptionsBuilder, OrderByBuilder, WhereBuilder,
};
pub use config::{ConnectionConfig, Failover, SessionOptions, TlsConfig};
pub use cursor::{ClassCursor, Cursor};
pub use driver::{Connector, Driver, MemoryRows, Reply, RowSource};
pub use error::{DbError, DbResult, ServerError};
pub use escape::{protect_identifier, quote};
pub use expr::{AliasedReference, Expr, Reference};
pub use row::{Field, FromRow, Row};
pub use session::{PreparedStatement, Session};
pub use statement::{
    CountStatement, Delete, Insert, InsertBuilder, LoadData, Replace, ResultStatement, Select,
    Statement, Update, With, delete_from, insert_into, load_data, replace_into, select, update,
    with,
};
pub use value::{FromValue, Value};

#[cfg(feature = "mysql")]
pub use driver::MysqlConnector;

#[cfg(feature = "derive")]
pub use sqlforge_derive::FromRow;
