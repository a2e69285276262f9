//! Clause builders shared by the statement builders.
//!
//! Each clause owns its own fragment of statement state and renders to
//! `Option<String>`: `None` when the clause is absent, otherwise the
//! fragment with its own leading space. Statements expose clauses through
//! the `*Builder` traits, which provide the chaining methods.

mod assignments;
mod conditions;
mod from;
mod join;
mod limit;
mod options;
mod order;


pub use assignments::Assignments;
pub use conditions::{Conditions, Glue, HavingBuilder, Operand, WhereBuilder};
pub use from::{FromBuilder, FromClause};
pub use join::{JoinBuilder, JoinClause, JoinCondition};
pub use limit::{Limit, LimitBuilder};
pub use options::{
    DELETE_OPTIONS, INSERT_OPTIONS, LOAD_DATA_OPTIONS, OptionSet, Options, OptionsBuilder,
    REPLACE_OPTIONS, SELECT_OPTIONS, UPDATE_OPTIONS, WITH_OPTIONS,
};
pub use order::{ColumnOrder, GroupByBuilder, OrderByBuilder};
