use crate::error::{DbError, DbResult};
use crate::expr::{AliasedReference, Expr, Reference};

const JOIN_TYPES: &[&str] = &[
    "",
    "CROSS",
    "INNER",
    "LEFT",
    "LEFT OUTER",
    "RIGHT",
    "RIGHT OUTER",
    "NATURAL",
    "NATURAL LEFT",
    "NATURAL LEFT OUTER",
    "NATURAL RIGHT",
    "NATURAL RIGHT OUTER",
];

/// Conditional part of a JOIN.
#[derive(Debug, Clone)]
pub enum JoinCondition {
    /// `ON (<expr>)`
    On(Expr),
    /// `` USING (`a`, `b`) ``
    Using(Vec<Reference>),
}

impl JoinCondition {
    pub fn using<R: Into<Reference>>(columns: impl IntoIterator<Item = R>) -> Self {
        JoinCondition::Using(columns.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
struct JoinSpec {
    table: AliasedReference,
    kind: String,
    clause: Option<String>,
    condition: Option<JoinCondition>,
}

/// JOIN clause state. Holds a single join; a later call replaces it.
///
/// Arguments are validated when the statement is rendered.
#[derive(Debug, Clone, Default)]
pub struct JoinClause {
    join: Option<JoinSpec>,
}

impl JoinClause {
    pub fn set(
        &mut self,
        table: AliasedReference,
        kind: &str,
        clause: Option<&str>,
        condition: Option<JoinCondition>,
    ) {
        self.join = Some(JoinSpec {
            table,
            kind: kind.to_string(),
            clause: clause.map(str::to_string),
            condition,
        });
    }

    pub fn is_set(&self) -> bool {
        self.join.is_some()
    }

    pub fn render(&self) -> DbResult<Option<String>> {
        let Some(join) = &self.join else {
            return Ok(None);
        };

        let kind = normalize(&join.kind);
        if !JOIN_TYPES.contains(&kind.as_str()) {
            return Err(DbError::invalid_argument(format!(
                "Invalid JOIN type: {}",
                join.kind
            )));
        }
        if kind.starts_with("NATURAL") && (join.clause.is_some() || join.condition.is_some()) {
            return Err(DbError::invalid_argument(format!(
                "{kind} JOIN has not condition"
            )));
        }

        let mut sql = String::from(" ");
        if !kind.is_empty() {
            sql.push_str(&kind);
            sql.push(' ');
        }
        sql.push_str("JOIN ");
        sql.push_str(&join.table.render()?);

        let clause = match &join.clause {
            Some(clause) => {
                let normalized = normalize(clause);
                if normalized != "ON" && normalized != "USING" {
                    return Err(DbError::invalid_argument(format!(
                        "Invalid JOIN condition clause: {clause}"
                    )));
                }
                Some(normalized)
            }
            None => None,
        };

        match (clause.as_deref(), &join.condition) {
            (None, None) => {}
            (Some("ON") | None, Some(JoinCondition::On(expr))) => {
                sql.push_str(" ON ");
                sql.push_str(&expr.render()?);
            }
            (Some("USING") | None, Some(JoinCondition::Using(columns))) => {
                if columns.is_empty() {
                    return Err(DbError::invalid_argument(
                        "JOIN USING requires at least one column",
                    ));
                }
                let mut rendered = Vec::with_capacity(columns.len());
                for column in columns {
                    rendered.push(column.render()?);
                }
                sql.push_str(" USING (");
                sql.push_str(&rendered.join(", "));
                sql.push(')');
            }
            (Some(clause), None) => {
                return Err(DbError::invalid_argument(format!(
                    "JOIN condition clause {clause} requires a condition"
                )));
            }
            (Some(clause), Some(_)) => {
                return Err(DbError::invalid_argument(format!(
                    "JOIN condition does not match clause {clause}"
                )));
            }
        }

        Ok(Some(sql))
    }
}

fn normalize(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

macro_rules! join_pair {
    ($on:ident, $using:ident, $kind:literal) => {
        #[doc = concat!("`", $kind, " JOIN table ON (condition)`")]
        fn $on(&mut self, table: impl Into<AliasedReference>, condition: Expr) -> &mut Self {
            self.join(table, $kind, Some("ON"), Some(JoinCondition::On(condition)))
        }

        #[doc = concat!("`", $kind, " JOIN table USING (columns)`")]
        fn $using<R: Into<Reference>>(
            &mut self,
            table: impl Into<AliasedReference>,
            columns: impl IntoIterator<Item = R>,
        ) -> &mut Self {
            self.join(
                table,
                $kind,
                Some("USING"),
                Some(JoinCondition::using(columns)),
            )
        }
    };
}

macro_rules! natural_join {
    ($name:ident, $kind:literal) => {
        #[doc = concat!("`", $kind, " JOIN table`")]
        fn $name(&mut self, table: impl Into<AliasedReference>) -> &mut Self {
            self.join(table, $kind, None, None)
        }
    };
}

/// Statements with a JOIN clause.
pub trait JoinBuilder: Sized {
    fn join_clause(&mut self) -> &mut JoinClause;

    /// Set the JOIN. `kind` is one of the JOIN types (empty for a plain
    /// `JOIN`) and `clause` is `ON` or `USING`, both case-insensitive.
    fn join(
        &mut self,
        table: impl Into<AliasedReference>,
        kind: &str,
        clause: Option<&str>,
        condition: Option<JoinCondition>,
    ) -> &mut Self {
        self.join_clause()
            .set(table.into(), kind, clause, condition);
        self
    }

    join_pair!(join_on, join_using, "");
    join_pair!(inner_join_on, inner_join_using, "INNER");
    join_pair!(cross_join_on, cross_join_using, "CROSS");
    join_pair!(left_join_on, left_join_using, "LEFT");
    join_pair!(left_outer_join_on, left_outer_join_using, "LEFT OUTER");
    join_pair!(right_join_on, right_join_using, "RIGHT");
    join_pair!(right_outer_join_on, right_outer_join_using, "RIGHT OUTER");

    natural_join!(natural_join, "NATURAL");
    natural_join!(natural_left_join, "NATURAL LEFT");
    natural_join!(natural_left_outer_join, "NATURAL LEFT OUTER");
    natural_join!(natural_right_join, "NATURAL RIGHT");
    natural_join!(natural_right_outer_join, "NATURAL RIGHT OUTER");
}
