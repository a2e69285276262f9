use super::traits::{CountStatement, Statement};
use crate::clause::{
    Assignments, INSERT_OPTIONS, Operand, OptionSet, Options, OptionsBuilder, REPLACE_OPTIONS,
};
use crate::error::{DbError, DbResult};
use crate::escape::protect_identifier;
use crate::expr::Expr;

/// State shared by INSERT and REPLACE: target table, column list and one
/// row source (VALUES rows, a SET list or a SELECT).
#[derive(Debug, Clone)]
pub struct InsertBody {
    keyword: &'static str,
    options: Options,
    table: Option<String>,
    columns: Vec<String>,
    rows: Vec<Vec<Operand>>,
    set: Assignments,
    select: Option<Expr>,
}

impl InsertBody {
    fn new(keyword: &'static str, options: &'static OptionSet) -> Self {
        Self {
            keyword,
            options: Options::new(options),
            table: None,
            columns: Vec::new(),
            rows: Vec::new(),
            set: Assignments::default(),
            select: None,
        }
    }

    fn render(&self) -> DbResult<String> {
        let mut sql = String::from(self.keyword);
        if let Some(options) = self.options.render()? {
            sql.push_str(&options);
        }

        let Some(table) = &self.table else {
            return Err(DbError::logic("INTO table must be set"));
        };
        sql.push_str(" INTO ");
        sql.push_str(&protect_identifier(table));

        if !self.columns.is_empty() {
            let columns: Vec<String> = self.columns.iter().map(|c| protect_identifier(c)).collect();
            sql.push_str(" (");
            sql.push_str(&columns.join(", "));
            sql.push(')');
        }

        let sources = [!self.rows.is_empty(), !self.set.is_empty(), self.select.is_some()];
        match sources.iter().filter(|used| **used).count() {
            0 => {
                return Err(DbError::logic(format!(
                    "{} must have VALUES, SET or SELECT",
                    self.keyword
                )));
            }
            1 => {}
            _ => {
                return Err(DbError::logic(format!(
                    "{} accepts only one of VALUES, SET or SELECT",
                    self.keyword
                )));
            }
        }

        if !self.rows.is_empty() {
            let mut rendered = Vec::with_capacity(self.rows.len());
            for (index, row) in self.rows.iter().enumerate() {
                if !self.columns.is_empty() && row.len() != self.columns.len() {
                    return Err(DbError::invalid_argument(format!(
                        "VALUES row {} has {} values, expected {}",
                        index + 1,
                        row.len(),
                        self.columns.len()
                    )));
                }
                let mut values = Vec::with_capacity(row.len());
                for value in row {
                    values.push(value.render()?);
                }
                rendered.push(format!("({})", values.join(", ")));
            }
            sql.push_str(" VALUES ");
            sql.push_str(&rendered.join(", "));
        } else if !self.set.is_empty() {
            if !self.columns.is_empty() {
                return Err(DbError::logic("SET cannot be used with a column list"));
            }
            sql.push_str(" SET ");
            sql.push_str(&self.set.render()?);
        } else if let Some(select) = &self.select {
            sql.push(' ');
            sql.push_str(&select.render_bare()?);
        }

        Ok(sql)
    }
}

/// Methods shared by INSERT and REPLACE.
pub trait InsertBuilder: Sized {
    fn insert_body(&mut self) -> &mut InsertBody;

    fn into_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.insert_body().table = Some(table.into());
        self
    }

    /// Replace the column list.
    fn columns<S: Into<String>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.insert_body().columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one VALUES row.
    fn values<V: Into<Operand>>(&mut self, row: impl IntoIterator<Item = V>) -> &mut Self {
        let row = row.into_iter().map(Into::into).collect();
        self.insert_body().rows.push(row);
        self
    }

    /// Append `` `column` = value `` to the SET list.
    fn set(&mut self, column: impl Into<String>, value: impl Into<Operand>) -> &mut Self {
        self.insert_body().set.push(column, value.into());
        self
    }

    /// Use a query as the row source, e.g. `Expr::subquery(select)`.
    fn select(&mut self, query: Expr) -> &mut Self {
        self.insert_body().select = Some(query);
        self
    }
}

/// INSERT statement builder.
///
/// ```ignore
/// let mut insert = insert_into("t1");
/// insert.columns(["id", "name"]).values([Operand::from(1), "a".into()]);
/// assert_eq!(insert.sql()?, "INSERT INTO `t1` (`id`, `name`) VALUES (1, 'a')");
/// ```
#[derive(Debug, Clone)]
pub struct Insert {
    body: InsertBody,
    on_duplicate: Assignments,
}

impl Default for Insert {
    fn default() -> Self {
        Self::new()
    }
}

impl Insert {
    pub fn new() -> Self {
        Self {
            body: InsertBody::new("INSERT", &INSERT_OPTIONS),
            on_duplicate: Assignments::default(),
        }
    }

    /// Append to `ON DUPLICATE KEY UPDATE`.
    pub fn on_duplicate_key_update(
        &mut self,
        column: impl Into<String>,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.on_duplicate.push(column, value.into());
        self
    }
}

impl Statement for Insert {
    fn sql(&self) -> DbResult<String> {
        let mut sql = self.body.render()?;
        if !self.on_duplicate.is_empty() {
            sql.push_str(" ON DUPLICATE KEY UPDATE ");
            sql.push_str(&self.on_duplicate.render()?);
        }
        Ok(sql)
    }
}

impl CountStatement for Insert {}

impl InsertBuilder for Insert {
    fn insert_body(&mut self) -> &mut InsertBody {
        &mut self.body
    }
}

impl OptionsBuilder for Insert {
    fn options_clause(&mut self) -> &mut Options {
        &mut self.body.options
    }
}

/// REPLACE statement builder. Same row sources as [`Insert`].
#[derive(Debug, Clone)]
pub struct Replace {
    body: InsertBody,
}

impl Default for Replace {
    fn default() -> Self {
        Self::new()
    }
}

impl Replace {
    pub fn new() -> Self {
        Self {
            body: InsertBody::new("REPLACE", &REPLACE_OPTIONS),
        }
    }
}

impl Statement for Replace {
    fn sql(&self) -> DbResult<String> {
        self.body.render()
    }
}

impl CountStatement for Replace {}

impl InsertBuilder for Replace {
    fn insert_body(&mut self) -> &mut InsertBody {
        &mut self.body
    }
}

impl OptionsBuilder for Replace {
    fn options_clause(&mut self) -> &mut Options {
        &mut self.body.options
    }
}
