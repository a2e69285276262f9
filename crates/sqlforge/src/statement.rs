//! Statement builders.
//!
//! Builders mutate in place and chain through `&mut Self`, and render on
//! demand with [`Statement::sql`]:
//!
//! ```ignore
//! use sqlforge::prelude::*;
//!
//! let mut users = select();
//! users
//!     .columns(["id", "name"])
//!     .from("users")
//!     .where_equal("status", "active")
//!     .order_by_desc("created_at")
//!     .limit(10);
//!
//! assert_eq!(
//!     users.sql()?,
//!     "SELECT `id`, `name` FROM `users` WHERE `status` = 'active' ORDER BY `created_at` DESC LIMIT 10"
//! );
//! let mut cursor = users.run(&mut session).await?;
//! ```

mod delete;
mod insert;
mod load_data;
mod select;
mod traits;
mod update;
mod with;

#[cfg(test)]
mod tests;

pub use delete::Delete;
pub use insert::{Insert, InsertBody, InsertBuilder, Replace};
pub use load_data::LoadData;
pub use select::Select;
pub use traits::{CountStatement, ResultStatement, Statement};
pub use update::Update;
pub use with::With;

/// Start building a SELECT statement.
pub fn select() -> Select {
    Select::new()
}

/// Start building an INSERT statement into `table`.
pub fn insert_into(table: impl Into<String>) -> Insert {
    let mut insert = Insert::new();
    insert.into_table(table);
    insert
}

/// Start building a REPLACE statement into `table`.
pub fn replace_into(table: impl Into<String>) -> Replace {
    let mut replace = Replace::new();
    replace.into_table(table);
    replace
}

/// Start building an UPDATE statement for `table`.
pub fn update(table: impl Into<crate::expr::AliasedReference>) -> Update {
    let mut update = Update::new();
    update.table(table);
    update
}

/// Start building a DELETE statement from `table`.
pub fn delete_from(table: impl Into<crate::expr::AliasedReference>) -> Delete {
    use crate::clause::FromBuilder;

    let mut delete = Delete::new();
    delete.from(table);
    delete
}

/// Start building a LOAD DATA statement reading `file`.
pub fn load_data(file: impl Into<String>) -> LoadData {
    let mut load = LoadData::new();
    load.infile(file);
    load
}

/// Start building a WITH statement.
pub fn with() -> With {
    With::new()
}
