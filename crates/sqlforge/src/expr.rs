//! Sub-expressions and references used inside clauses.

use crate::error::DbResult;
use crate::escape::protect_identifier;
use crate::statement::Statement;
use std::fmt;
use std::sync::Arc;

/// A nested SQL fragment: either raw SQL text or a statement builder.
///
/// Inside a clause an expression renders parenthesized, e.g. `(NOW())` or
/// `(SELECT ...)`. The inner statement is rendered again every time the
/// outer statement renders.
#[derive(Clone)]
pub enum Expr {
    Raw(String),
    Statement(Arc<dyn Statement>),
}

impl Expr {
    /// Raw SQL, inserted without escaping.
    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    /// A statement builder used as a subquery.
    pub fn subquery(statement: impl Statement + 'static) -> Self {
        Expr::Statement(Arc::new(statement))
    }

    /// Render without surrounding parentheses.
    pub fn render_bare(&self) -> DbResult<String> {
        match self {
            Expr::Raw(sql) => Ok(sql.clone()),
            Expr::Statement(statement) => statement.sql(),
        }
    }

    /// Render as `(<expr>)`.
    pub fn render(&self) -> DbResult<String> {
        Ok(format!("({})", self.render_bare()?))
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Raw(sql) => f.debug_tuple("Raw").field(sql).finish(),
            Expr::Statement(statement) => f
                .debug_tuple("Statement")
                .field(&statement.sql().unwrap_or_else(|e| format!("<{e}>")))
                .finish(),
        }
    }
}

/// Something a clause can name: an identifier or a sub-expression.
#[derive(Debug, Clone)]
pub enum Reference {
    Ident(String),
    Expr(Expr),
}

impl Reference {
    pub fn render(&self) -> DbResult<String> {
        match self {
            Reference::Ident(name) => Ok(protect_identifier(name)),
            Reference::Expr(expr) => expr.render(),
        }
    }
}

impl From<&str> for Reference {
    fn from(name: &str) -> Self {
        Reference::Ident(name.to_string())
    }
}

impl From<String> for Reference {
    fn from(name: String) -> Self {
        Reference::Ident(name)
    }
}

impl From<&String> for Reference {
    fn from(name: &String) -> Self {
        Reference::Ident(name.clone())
    }
}

impl From<Expr> for Reference {
    fn from(expr: Expr) -> Self {
        Reference::Expr(expr)
    }
}

/// A reference with optional aliases, as accepted by FROM, JOIN, column
/// lists and table lists.
///
/// `Aliased` holds one or more `(alias, reference)` pairs; each renders as
/// `` <reference> AS `alias` ``.
#[derive(Debug, Clone)]
pub enum AliasedReference {
    Plain(Reference),
    Aliased(Vec<(String, Reference)>),
}

impl AliasedReference {
    /// `` <reference> AS `alias` ``
    pub fn alias(alias: impl Into<String>, reference: impl Into<Reference>) -> Self {
        AliasedReference::Aliased(vec![(alias.into(), reference.into())])
    }

    /// Several aliased references given as `(alias, reference)` pairs.
    pub fn aliases<A, R>(pairs: impl IntoIterator<Item = (A, R)>) -> Self
    where
        A: Into<String>,
        R: Into<Reference>,
    {
        AliasedReference::Aliased(
            pairs
                .into_iter()
                .map(|(alias, reference)| (alias.into(), reference.into()))
                .collect(),
        )
    }

    /// References aliased by their position, starting at `` `0` ``.
    pub fn positional<R: Into<Reference>>(references: impl IntoIterator<Item = R>) -> Self {
        AliasedReference::Aliased(
            references
                .into_iter()
                .enumerate()
                .map(|(index, reference)| (index.to_string(), reference.into()))
                .collect(),
        )
    }

    pub fn render(&self) -> DbResult<String> {
        match self {
            AliasedReference::Plain(reference) => reference.render(),
            AliasedReference::Aliased(pairs) => {
                let mut parts = Vec::with_capacity(pairs.len());
                for (alias, reference) in pairs {
                    parts.push(format!(
                        "{} AS {}",
                        reference.render()?,
                        protect_identifier(alias)
                    ));
                }
                Ok(parts.join(", "))
            }
        }
    }
}

macro_rules! impl_plain_reference {
    ($($t:ty),*) => {
        $(impl From<$t> for AliasedReference {
            fn from(reference: $t) -> Self {
                AliasedReference::Plain(reference.into())
            }
        })*
    };
}

impl_plain_reference!(&str, String, &String, Expr, Reference);

/// Render a comma separated list of references.
pub(crate) fn render_list(items: &[AliasedReference]) -> DbResult<String> {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        parts.push(item.render()?);
    }
    Ok(parts.join(", "))
}
