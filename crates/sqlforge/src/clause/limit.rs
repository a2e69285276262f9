use crate::error::{DbError, DbResult};

/// LIMIT clause state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Limit {
    limit: Option<(u64, Option<u64>)>,
}

impl Limit {
    pub fn set(&mut self, limit: u64, offset: Option<u64>) {
        self.limit = Some((limit, offset));
    }

    pub fn render(&self) -> DbResult<Option<String>> {
        match self.limit {
            None => Ok(None),
            Some((0, _)) => Err(DbError::invalid_argument("LIMIT must be greater than 0")),
            Some((limit, None)) => Ok(Some(format!(" LIMIT {limit}"))),
            Some((limit, Some(offset))) => Ok(Some(format!(" LIMIT {limit} OFFSET {offset}"))),
        }
    }
}

/// Statements with a LIMIT clause.
pub trait LimitBuilder: Sized {
    fn limit_clause(&mut self) -> &mut Limit;

    fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit_clause().set(limit, None);
        self
    }

    fn limit_offset(&mut self, limit: u64, offset: u64) -> &mut Self {
        self.limit_clause().set(limit, Some(offset));
        self
    }
}
