use super::traits::{ResultStatement, Statement};
use crate::clause::{Options, OptionsBuilder, WITH_OPTIONS};
use crate::error::{DbError, DbResult};
use crate::escape::protect_identifier;
use crate::expr::Expr;

#[derive(Debug, Clone)]
struct CommonTable {
    name: String,
    columns: Vec<String>,
    query: Expr,
}

/// WITH (common table expression) statement builder.
///
/// Renders `WITH{ RECURSIVE} name AS (query), ... SELECT ...`.
#[derive(Debug, Clone)]
pub struct With {
    options: Options,
    tables: Vec<CommonTable>,
    select: Option<Expr>,
}

impl Default for With {
    fn default() -> Self {
        Self::new()
    }
}

impl With {
    pub fn new() -> Self {
        Self {
            options: Options::new(&WITH_OPTIONS),
            tables: Vec::new(),
            select: None,
        }
    }

    /// Add `` `name` AS (query) ``.
    pub fn reference(&mut self, name: impl Into<String>, query: Expr) -> &mut Self {
        self.reference_with_columns(name, Vec::<String>::new(), query)
    }

    /// Add `` `name` (`c1`, `c2`) AS (query) ``.
    pub fn reference_with_columns<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
        query: Expr,
    ) -> &mut Self {
        self.tables.push(CommonTable {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            query,
        });
        self
    }

    /// Set the final query.
    pub fn select(&mut self, query: Expr) -> &mut Self {
        self.select = Some(query);
        self
    }
}

impl Statement for With {
    fn sql(&self) -> DbResult<String> {
        let mut sql = String::from("WITH");
        if let Some(options) = self.options.render()? {
            sql.push_str(&options);
        }
        if self.tables.is_empty() {
            return Err(DbError::logic("WITH must have a reference"));
        }
        let mut tables = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            let mut part = protect_identifier(&table.name);
            if !table.columns.is_empty() {
                let columns: Vec<String> =
                    table.columns.iter().map(|c| protect_identifier(c)).collect();
                part.push_str(&format!(" ({})", columns.join(", ")));
            }
            part.push_str(" AS ");
            part.push_str(&table.query.render()?);
            tables.push(part);
        }
        sql.push(' ');
        sql.push_str(&tables.join(", "));

        let Some(select) = &self.select else {
            return Err(DbError::logic("SELECT must be set"));
        };
        sql.push(' ');
        sql.push_str(&select.render_bare()?);
        Ok(sql)
    }
}

impl ResultStatement for With {}

impl OptionsBuilder for With {
    fn options_clause(&mut self) -> &mut Options {
        &mut self.options
    }
}
