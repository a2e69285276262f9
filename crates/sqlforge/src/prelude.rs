//! Convenient imports for typical `sqlforge` usage.
//!
//! ```ignore
//! use sqlforge::prelude::*;
//! ```

pub use crate::{
    ConnectionConfig, CountStatement, Cursor, DbError, DbResult, Expr, Failover, FromBuilder,
    FromRow, GroupByBuilder, HavingBuilder, InsertBuilder, JoinBuilder, LimitBuilder,
    OptionsBuilder, OrderByBuilder, ResultStatement, Row, Session, Statement, Value,
    WhereBuilder, delete_from, insert_into, load_data, replace_into, select, update, with,
};
