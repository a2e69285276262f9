use super::traits::{ResultStatement, Statement};
use crate::clause::{
    ColumnOrder, Conditions, FromBuilder, FromClause, GroupByBuilder, HavingBuilder, JoinBuilder,
    JoinClause, Limit, LimitBuilder, OrderByBuilder, Options, OptionsBuilder, SELECT_OPTIONS,
    WhereBuilder,
};
use crate::error::DbResult;
use crate::expr::{AliasedReference, render_list};

/// SELECT statement builder.
///
/// Renders `SELECT{options} {columns}{from}{join}{where}{group by}{having}{order by}{limit}{lock}`.
/// JOIN, WHERE, GROUP BY and HAVING need a FROM clause.
#[derive(Debug, Clone)]
pub struct Select {
    options: Options,
    columns: Vec<AliasedReference>,
    from: FromClause,
    join: JoinClause,
    conditions: Conditions,
    group_by: ColumnOrder,
    having: Conditions,
    order_by: ColumnOrder,
    limit: Limit,
    lock: Option<&'static str>,
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl Select {
    pub fn new() -> Self {
        Self {
            options: Options::new(&SELECT_OPTIONS),
            columns: Vec::new(),
            from: FromClause::default(),
            join: JoinClause::default(),
            conditions: Conditions::new("WHERE"),
            group_by: ColumnOrder::new("GROUP BY"),
            having: Conditions::new("HAVING"),
            order_by: ColumnOrder::new("ORDER BY"),
            limit: Limit::default(),
            lock: None,
        }
    }

    /// Replace the column list. An empty list renders `*`.
    pub fn columns<T: Into<AliasedReference>>(
        &mut self,
        columns: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one column.
    pub fn column(&mut self, column: impl Into<AliasedReference>) -> &mut Self {
        self.columns.push(column.into());
        self
    }

    /// Append ` FOR UPDATE`.
    pub fn lock_for_update(&mut self) -> &mut Self {
        self.lock = Some(" FOR UPDATE");
        self
    }

    /// Append ` LOCK IN SHARE MODE`.
    pub fn lock_in_share_mode(&mut self) -> &mut Self {
        self.lock = Some(" LOCK IN SHARE MODE");
        self
    }
}

impl Statement for Select {
    fn sql(&self) -> DbResult<String> {
        let mut sql = String::from("SELECT");
        if let Some(options) = self.options.render()? {
            sql.push_str(&options);
        }
        sql.push(' ');
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&render_list(&self.columns)?);
        }
        if let Some(from) = self.from.render()? {
            sql.push_str(&from);
        }
        for (clause, fragment) in [
            ("JOIN", self.join.render()?),
            ("WHERE", self.conditions.render()?),
            ("GROUP BY", self.group_by.render()?),
            ("HAVING", self.having.render()?),
        ] {
            if let Some(fragment) = fragment {
                self.from.require(clause)?;
                sql.push_str(&fragment);
            }
        }
        if let Some(order_by) = self.order_by.render()? {
            sql.push_str(&order_by);
        }
        if let Some(limit) = self.limit.render()? {
            sql.push_str(&limit);
        }
        if let Some(lock) = self.lock {
            sql.push_str(lock);
        }
        Ok(sql)
    }
}

impl ResultStatement for Select {}

impl OptionsBuilder for Select {
    fn options_clause(&mut self) -> &mut Options {
        &mut self.options
    }
}

impl FromBuilder for Select {
    fn from_clause(&mut self) -> &mut FromClause {
        &mut self.from
    }
}

impl JoinBuilder for Select {
    fn join_clause(&mut self) -> &mut JoinClause {
        &mut self.join
    }
}

impl WhereBuilder for Select {
    fn where_conditions(&mut self) -> &mut Conditions {
        &mut self.conditions
    }
}

impl GroupByBuilder for Select {
    fn group_by_clause(&mut self) -> &mut ColumnOrder {
        &mut self.group_by
    }
}

impl HavingBuilder for Select {
    fn having_conditions(&mut self) -> &mut Conditions {
        &mut self.having
    }
}

impl OrderByBuilder for Select {
    fn order_by_clause(&mut self) -> &mut ColumnOrder {
        &mut self.order_by
    }
}

impl LimitBuilder for Select {
    fn limit_clause(&mut self) -> &mut Limit {
        &mut self.limit
    }
}
