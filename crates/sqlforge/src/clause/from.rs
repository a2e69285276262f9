use crate::error::{DbError, DbResult};
use crate::expr::{AliasedReference, render_list};

/// FROM clause state.
///
/// A call to [`FromClause::set`] replaces the previous list.
#[derive(Debug, Clone, Default)]
pub struct FromClause {
    tables: Vec<AliasedReference>,
}

impl FromClause {
    pub fn set(&mut self, tables: Vec<AliasedReference>) {
        self.tables = tables;
    }

    pub fn is_set(&self) -> bool {
        !self.tables.is_empty()
    }

    /// Fail unless FROM was set; `clause` names the dependent clause.
    pub fn require(&self, clause: &str) -> DbResult<()> {
        if self.is_set() {
            Ok(())
        } else {
            Err(DbError::logic(format!("Clause {clause} only works with FROM")))
        }
    }

    pub fn render(&self) -> DbResult<Option<String>> {
        if self.tables.is_empty() {
            return Ok(None);
        }
        Ok(Some(format!(" FROM {}", render_list(&self.tables)?)))
    }
}

/// Statements with a FROM clause.
pub trait FromBuilder: Sized {
    fn from_clause(&mut self) -> &mut FromClause;

    /// Set FROM to a single reference.
    fn from(&mut self, table: impl Into<AliasedReference>) -> &mut Self {
        self.from_clause().set(vec![table.into()]);
        self
    }

    /// Set FROM to a list of references, e.g. `from_tables(["t1", "t2"])`.
    fn from_tables<T: Into<AliasedReference>>(
        &mut self,
        tables: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.from_clause()
            .set(tables.into_iter().map(Into::into).collect());
        self
    }
}
