use super::traits::{CountStatement, Statement};
use crate::clause::{
    ColumnOrder, Conditions, DELETE_OPTIONS, FromBuilder, FromClause, JoinBuilder, JoinClause,
    Limit, LimitBuilder, OrderByBuilder, Options, OptionsBuilder, WhereBuilder,
};
use crate::error::{DbError, DbResult};
use crate::expr::{AliasedReference, render_list};

/// DELETE statement builder.
///
/// Renders `DELETE{options}[ {tables}] FROM ...{join}{where}{order by}{limit}`.
/// The table list before FROM is only needed for multi-table deletes.
#[derive(Debug, Clone)]
pub struct Delete {
    options: Options,
    tables: Vec<AliasedReference>,
    from: FromClause,
    join: JoinClause,
    conditions: Conditions,
    order_by: ColumnOrder,
    limit: Limit,
}

impl Default for Delete {
    fn default() -> Self {
        Self::new()
    }
}

impl Delete {
    pub fn new() -> Self {
        Self {
            options: Options::new(&DELETE_OPTIONS),
            tables: Vec::new(),
            from: FromClause::default(),
            join: JoinClause::default(),
            conditions: Conditions::new("WHERE"),
            order_by: ColumnOrder::new("ORDER BY"),
            limit: Limit::default(),
        }
    }

    /// Tables to delete rows from in a multi-table delete.
    pub fn tables<T: Into<AliasedReference>>(
        &mut self,
        tables: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }
}

impl Statement for Delete {
    fn sql(&self) -> DbResult<String> {
        let mut sql = String::from("DELETE");
        if let Some(options) = self.options.render()? {
            sql.push_str(&options);
        }
        if !self.tables.is_empty() {
            sql.push(' ');
            sql.push_str(&render_list(&self.tables)?);
        }
        let Some(from) = self.from.render()? else {
            return Err(DbError::logic("FROM table references must be set"));
        };
        sql.push_str(&from);
        for fragment in [
            self.join.render()?,
            self.conditions.render()?,
            self.order_by.render()?,
            self.limit.render()?,
        ]
        .into_iter()
        .flatten()
        {
            sql.push_str(&fragment);
        }
        Ok(sql)
    }
}

impl CountStatement for Delete {}

impl OptionsBuilder for Delete {
    fn options_clause(&mut self) -> &mut Options {
        &mut self.options
    }
}

impl FromBuilder for Delete {
    fn from_clause(&mut self) -> &mut FromClause {
        &mut self.from
    }
}

impl JoinBuilder for Delete {
    fn join_clause(&mut self) -> &mut JoinClause {
        &mut self.join
    }
}

impl WhereBuilder for Delete {
    fn where_conditions(&mut self) -> &mut Conditions {
        &mut self.conditions
    }
}

impl OrderByBuilder for Delete {
    fn order_by_clause(&mut self) -> &mut ColumnOrder {
        &mut self.order_by
    }
}

impl LimitBuilder for Delete {
    fn limit_clause(&mut self) -> &mut Limit {
        &mut self.limit
    }
}
