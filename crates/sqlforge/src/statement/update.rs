use super::traits::{CountStatement, Statement};
use crate::clause::{
    Assignments, ColumnOrder, Conditions, JoinBuilder, JoinClause, Limit, LimitBuilder, Operand,
    OrderByBuilder, Options, OptionsBuilder, UPDATE_OPTIONS, WhereBuilder,
};
use crate::error::{DbError, DbResult};
use crate::expr::{AliasedReference, render_list};

/// UPDATE statement builder.
///
/// Renders `UPDATE{options} {tables}{join} SET {assignments}{where}{order by}{limit}`.
#[derive(Debug, Clone)]
pub struct Update {
    options: Options,
    tables: Vec<AliasedReference>,
    join: JoinClause,
    set: Assignments,
    conditions: Conditions,
    order_by: ColumnOrder,
    limit: Limit,
}

impl Default for Update {
    fn default() -> Self {
        Self::new()
    }
}

impl Update {
    pub fn new() -> Self {
        Self {
            options: Options::new(&UPDATE_OPTIONS),
            tables: Vec::new(),
            join: JoinClause::default(),
            set: Assignments::default(),
            conditions: Conditions::new("WHERE"),
            order_by: ColumnOrder::new("ORDER BY"),
            limit: Limit::default(),
        }
    }

    /// Set the table reference, replacing previous ones.
    pub fn table(&mut self, table: impl Into<AliasedReference>) -> &mut Self {
        self.tables = vec![table.into()];
        self
    }

    /// Set several table references for a multi-table update.
    pub fn tables<T: Into<AliasedReference>>(
        &mut self,
        tables: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Append `` `column` = value `` to the SET list.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Operand>) -> &mut Self {
        self.set.push(column, value.into());
        self
    }
}

impl Statement for Update {
    fn sql(&self) -> DbResult<String> {
        let mut sql = String::from("UPDATE");
        if let Some(options) = self.options.render()? {
            sql.push_str(&options);
        }
        if self.tables.is_empty() {
            return Err(DbError::logic("Table references must be set"));
        }
        sql.push(' ');
        sql.push_str(&render_list(&self.tables)?);
        if let Some(join) = self.join.render()? {
            sql.push_str(&join);
        }
        if self.set.is_empty() {
            return Err(DbError::logic("SET clause must be set"));
        }
        sql.push_str(" SET ");
        sql.push_str(&self.set.render()?);
        for fragment in [
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

impl CountStatement for Update {}

impl OptionsBuilder for Update {
    fn options_clause(&mut self) -> &mut Options {
        &mut self.options
    }
}

impl JoinBuilder for Update {
    fn join_clause(&mut self) -> &mut JoinClause {
        &mut self.join
    }
}

impl WhereBuilder for Update {
    fn where_conditions(&mut self) -> &mut Conditions {
        &mut self.conditions
    }
}

impl OrderByBuilder for Update {
    fn order_by_clause(&mut self) -> &mut ColumnOrder {
        &mut self.order_by
    }
}

impl LimitBuilder for Update {
    fn limit_clause(&mut self) -> &mut Limit {
        &mut self.limit
    }
}
