use super::Operand;
use crate::error::DbResult;
use crate::escape::protect_identifier;

/// `` `column` = value `` pairs for SET and ON DUPLICATE KEY UPDATE.
#[derive(Debug, Clone, Default)]
pub struct Assignments {
    items: Vec<(String, Operand)>,
}

impl Assignments {
    pub fn push(&mut self, column: impl Into<String>, value: Operand) {
        self.items.push((column.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the list without a keyword.
    pub fn render(&self) -> DbResult<String> {
        let mut parts = Vec::with_capacity(self.items.len());
        for (column, value) in &self.items {
            parts.push(format!("{} = {}", protect_identifier(column), value.render()?));
        }
        Ok(parts.join(", "))
    }
}
