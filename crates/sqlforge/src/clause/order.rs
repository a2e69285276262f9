use crate::error::{DbError, DbResult};
use crate::expr::Reference;

/// ORDER BY or GROUP BY clause state. Columns accumulate in call order.
#[derive(Debug, Clone)]
pub struct ColumnOrder {
    keyword: &'static str,
    items: Vec<(Reference, Option<String>)>,
}

impl ColumnOrder {
    pub fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, column: Reference, direction: Option<&str>) {
        self.items.push((column, direction.map(str::to_string)));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render(&self) -> DbResult<Option<String>> {
        if self.items.is_empty() {
            return Ok(None);
        }
        let mut parts = Vec::with_capacity(self.items.len());
        for (column, direction) in &self.items {
            let mut part = column.render()?;
            if let Some(direction) = direction {
                let normalized = direction.trim().to_uppercase();
                if normalized != "ASC" && normalized != "DESC" {
                    return Err(DbError::invalid_argument(format!(
                        "Invalid {} direction: {direction}",
                        self.keyword
                    )));
                }
                part.push(' ');
                part.push_str(&normalized);
            }
            parts.push(part);
        }
        Ok(Some(format!(" {} {}", self.keyword, parts.join(", "))))
    }
}

/// Statements with an ORDER BY clause.
pub trait OrderByBuilder: Sized {
    fn order_by_clause(&mut self) -> &mut ColumnOrder;

    /// Append a column; `direction` is `ASC` or `DESC` (case-insensitive).
    fn order_by(&mut self, column: impl Into<Reference>, direction: Option<&str>) -> &mut Self {
        self.order_by_clause().push(column.into(), direction);
        self
    }

    fn order_by_asc(&mut self, column: impl Into<Reference>) -> &mut Self {
        self.order_by(column, Some("ASC"))
    }

    fn order_by_desc(&mut self, column: impl Into<Reference>) -> &mut Self {
        self.order_by(column, Some("DESC"))
    }
}

/// Statements with a GROUP BY clause.
pub trait GroupByBuilder: Sized {
    fn group_by_clause(&mut self) -> &mut ColumnOrder;

    fn group_by(&mut self, column: impl Into<Reference>) -> &mut Self {
        self.group_by_clause().push(column.into(), None);
        self
    }
}
