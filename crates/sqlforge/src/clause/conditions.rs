use crate::error::{DbError, DbResult};
use crate::escape::quote;
use crate::expr::{Expr, Reference};
use crate::value::Value;

/// Right-hand side of a condition or an assignment.
#[derive(Debug, Clone)]
pub enum Operand {
    Value(Value),
    Expr(Expr),
}

impl Operand {
    pub fn render(&self) -> DbResult<String> {
        match self {
            Operand::Value(value) => quote(value),
            Operand::Expr(expr) => expr.render(),
        }
    }
}

macro_rules! impl_operand_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Operand {
            fn from(v: $t) -> Self {
                Operand::Value(Value::from(v))
            }
        })*
    };
}

impl_operand_from!(
    i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, bool, &str, String, &String, Vec<u8>
);

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(Value::from(v))
    }
}

impl From<Expr> for Operand {
    fn from(expr: Expr) -> Self {
        Operand::Expr(expr)
    }
}

/// How a condition joins the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glue {
    And,
    Or,
}

impl Glue {
    fn as_str(self) -> &'static str {
        match self {
            Glue::And => "AND",
            Glue::Or => "OR",
        }
    }
}

enum Arity {
    None,
    One,
    Two,
    AtLeastOne,
}

fn arity(operator: &str) -> Option<Arity> {
    Some(match operator {
        "=" | "<=>" | "!=" | "<>" | ">" | ">=" | "<" | "<=" | "LIKE" | "NOT LIKE" => Arity::One,
        "IN" | "NOT IN" => Arity::AtLeastOne,
        "BETWEEN" | "NOT BETWEEN" => Arity::Two,
        "IS NULL" | "IS NOT NULL" => Arity::None,
        _ => return None,
    })
}

#[derive(Debug, Clone)]
struct Condition {
    glue: Glue,
    column: Reference,
    operator: String,
    operands: Vec<Operand>,
}

impl Condition {
    fn render(&self) -> DbResult<String> {
        let operator = self
            .operator
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        let Some(arity) = arity(&operator) else {
            return Err(DbError::invalid_argument(format!(
                "Invalid comparison operator: {}",
                self.operator
            )));
        };
        let column = self.column.render()?;

        match arity {
            Arity::None => {
                self.expect_count(&operator, 0)?;
                Ok(format!("{column} {operator}"))
            }
            Arity::One => {
                self.expect_count(&operator, 1)?;
                Ok(format!("{column} {operator} {}", self.operands[0].render()?))
            }
            Arity::Two => {
                self.expect_count(&operator, 2)?;
                Ok(format!(
                    "{column} {operator} {} AND {}",
                    self.operands[0].render()?,
                    self.operands[1].render()?
                ))
            }
            Arity::AtLeastOne => {
                if let [Operand::Expr(expr)] = self.operands.as_slice() {
                    return Ok(format!("{column} {operator} {}", expr.render()?));
                }
                let mut items = Vec::with_capacity(self.operands.len());
                for operand in &self.operands {
                    match operand {
                        Operand::Value(Value::List(values)) => {
                            for value in values {
                                items.push(quote(value)?);
                            }
                        }
                        other => items.push(other.render()?),
                    }
                }
                if items.is_empty() {
                    return Err(DbError::invalid_argument(format!(
                        "Operator {operator} requires at least one value"
                    )));
                }
                Ok(format!("{column} {operator} ({})", items.join(", ")))
            }
        }
    }

    fn expect_count(&self, operator: &str, count: usize) -> DbResult<()> {
        if self.operands.len() == count {
            Ok(())
        } else {
            Err(DbError::invalid_argument(format!(
                "Operator {operator} requires {count} value(s), got {}",
                self.operands.len()
            )))
        }
    }
}

/// WHERE or HAVING clause state. Conditions accumulate in call order.
#[derive(Debug, Clone)]
pub struct Conditions {
    keyword: &'static str,
    items: Vec<Condition>,
}

impl Conditions {
    pub fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            items: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        glue: Glue,
        column: Reference,
        operator: &str,
        operands: Vec<Operand>,
    ) {
        self.items.push(Condition {
            glue,
            column,
            operator: operator.to_string(),
            operands,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render(&self) -> DbResult<Option<String>> {
        if self.items.is_empty() {
            return Ok(None);
        }
        let mut sql = format!(" {} ", self.keyword);
        for (i, condition) in self.items.iter().enumerate() {
            if i > 0 {
                sql.push(' ');
                sql.push_str(condition.glue.as_str());
                sql.push(' ');
            }
            sql.push_str(&condition.render()?);
        }
        Ok(Some(sql))
    }
}

macro_rules! comparison {
    ($accessor:ident; $and:ident, $or:ident, $op:literal) => {
        #[doc = concat!("`column ", $op, " value`, joined with AND.")]
        fn $and(&mut self, column: impl Into<Reference>, value: impl Into<Operand>) -> &mut Self {
            self.$accessor()
                .push(Glue::And, column.into(), $op, vec![value.into()]);
            self
        }

        #[doc = concat!("`column ", $op, " value`, joined with OR.")]
        fn $or(&mut self, column: impl Into<Reference>, value: impl Into<Operand>) -> &mut Self {
            self.$accessor()
                .push(Glue::Or, column.into(), $op, vec![value.into()]);
            self
        }
    };
}

macro_rules! list_comparison {
    ($accessor:ident; $and:ident, $or:ident, $op:literal) => {
        #[doc = concat!("`column ", $op, " (values)`, joined with AND.")]
        fn $and<V: Into<Operand>>(
            &mut self,
            column: impl Into<Reference>,
            values: impl IntoIterator<Item = V>,
        ) -> &mut Self {
            let values = values.into_iter().map(Into::into).collect();
            self.$accessor().push(Glue::And, column.into(), $op, values);
            self
        }

        #[doc = concat!("`column ", $op, " (values)`, joined with OR.")]
        fn $or<V: Into<Operand>>(
            &mut self,
            column: impl Into<Reference>,
            values: impl IntoIterator<Item = V>,
        ) -> &mut Self {
            let values = values.into_iter().map(Into::into).collect();
            self.$accessor().push(Glue::Or, column.into(), $op, values);
            self
        }
    };
}

macro_rules! range_comparison {
    ($accessor:ident; $and:ident, $or:ident, $op:literal) => {
        #[doc = concat!("`column ", $op, " low AND high`, joined with AND.")]
        fn $and(
            &mut self,
            column: impl Into<Reference>,
            low: impl Into<Operand>,
            high: impl Into<Operand>,
        ) -> &mut Self {
            self.$accessor()
                .push(Glue::And, column.into(), $op, vec![low.into(), high.into()]);
            self
        }

        #[doc = concat!("`column ", $op, " low AND high`, joined with OR.")]
        fn $or(
            &mut self,
            column: impl Into<Reference>,
            low: impl Into<Operand>,
            high: impl Into<Operand>,
        ) -> &mut Self {
            self.$accessor()
                .push(Glue::Or, column.into(), $op, vec![low.into(), high.into()]);
            self
        }
    };
}

macro_rules! null_comparison {
    ($accessor:ident; $and:ident, $or:ident, $op:literal) => {
        #[doc = concat!("`column ", $op, "`, joined with AND.")]
        fn $and(&mut self, column: impl Into<Reference>) -> &mut Self {
            self.$accessor()
                .push(Glue::And, column.into(), $op, Vec::new());
            self
        }

        #[doc = concat!("`column ", $op, "`, joined with OR.")]
        fn $or(&mut self, column: impl Into<Reference>) -> &mut Self {
            self.$accessor()
                .push(Glue::Or, column.into(), $op, Vec::new());
            self
        }
    };
}

/// Statements with a WHERE clause.
///
/// ```ignore
/// select.from("users")
///     .where_equal("status", "active")
///     .or_where_in("role", ["admin", "owner"]);
/// ```
pub trait WhereBuilder: Sized {
    fn where_conditions(&mut self) -> &mut Conditions;

    /// Add a condition with an explicit operator, joined with AND.
    fn where_cond<V: Into<Operand>>(
        &mut self,
        column: impl Into<Reference>,
        operator: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.where_conditions()
            .push(Glue::And, column.into(), operator, values);
        self
    }

    /// Add a condition with an explicit operator, joined with OR.
    fn or_where_cond<V: Into<Operand>>(
        &mut self,
        column: impl Into<Reference>,
        operator: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.where_conditions()
            .push(Glue::Or, column.into(), operator, values);
        self
    }

    comparison!(where_conditions; where_equal, or_where_equal, "=");
    comparison!(where_conditions; where_not_equal, or_where_not_equal, "!=");
    comparison!(where_conditions; where_null_safe_equal, or_where_null_safe_equal, "<=>");
    comparison!(where_conditions; where_less_than, or_where_less_than, "<");
    comparison!(where_conditions; where_less_than_or_equal, or_where_less_than_or_equal, "<=");
    comparison!(where_conditions; where_greater_than, or_where_greater_than, ">");
    comparison!(where_conditions; where_greater_than_or_equal, or_where_greater_than_or_equal, ">=");
    comparison!(where_conditions; where_like, or_where_like, "LIKE");
    comparison!(where_conditions; where_not_like, or_where_not_like, "NOT LIKE");
    list_comparison!(where_conditions; where_in, or_where_in, "IN");
    list_comparison!(where_conditions; where_not_in, or_where_not_in, "NOT IN");
    range_comparison!(where_conditions; where_between, or_where_between, "BETWEEN");
    range_comparison!(where_conditions; where_not_between, or_where_not_between, "NOT BETWEEN");
    null_comparison!(where_conditions; where_is_null, or_where_is_null, "IS NULL");
    null_comparison!(where_conditions; where_is_not_null, or_where_is_not_null, "IS NOT NULL");
}

/// Statements with a HAVING clause.
pub trait HavingBuilder: Sized {
    fn having_conditions(&mut self) -> &mut Conditions;

    /// Add a condition with an explicit operator, joined with AND.
    fn having<V: Into<Operand>>(
        &mut self,
        column: impl Into<Reference>,
        operator: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.having_conditions()
            .push(Glue::And, column.into(), operator, values);
        self
    }

    /// Add a condition with an explicit operator, joined with OR.
    fn or_having<V: Into<Operand>>(
        &mut self,
        column: impl Into<Reference>,
        operator: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.having_conditions()
            .push(Glue::Or, column.into(), operator, values);
        self
    }

    comparison!(having_conditions; having_equal, or_having_equal, "=");
    comparison!(having_conditions; having_not_equal, or_having_not_equal, "!=");
    comparison!(having_conditions; having_less_than, or_having_less_than, "<");
    comparison!(having_conditions; having_greater_than, or_having_greater_than, ">");
    list_comparison!(having_conditions; having_in, or_having_in, "IN");
    range_comparison!(having_conditions; having_between, or_having_between, "BETWEEN");
    null_comparison!(having_conditions; having_is_null, or_having_is_null, "IS NULL");
}
