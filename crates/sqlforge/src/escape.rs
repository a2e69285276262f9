//! Identifier and literal escaping for the MySQL/MariaDB dialect.
//!
//! Both functions are pure: they never consult a connection.
//!
//! # Example
//! ```ignore
//! use sqlforge::{protect_identifier, quote, Value};
//!
//! assert_eq!(protect_identifier("db.users.*"), "`db`.`users`.*");
//! assert_eq!(quote(&Value::from("O'Hara"))?, r"'O\'Hara'");
//! # Ok::<(), sqlforge::DbError>(())
//! ```

use crate::error::{DbError, DbResult};
use crate::value::Value;

/// Character used to quote identifiers.
pub const IDENTIFIER_QUOTE: char = '`';

/// Quote an identifier, splitting on `.` for qualified names.
///
/// Every segment except a bare `*` is wrapped in backticks with embedded
/// backticks doubled. The function is not content aware: quoting an already
/// quoted name doubles its quotes again.
pub fn protect_identifier(name: &str) -> String {
    if name == "*" {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 2);
    for (i, segment) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        if segment == "*" {
            out.push('*');
            continue;
        }
        out.push(IDENTIFIER_QUOTE);
        for c in segment.chars() {
            if c == IDENTIFIER_QUOTE {
                out.push(IDENTIFIER_QUOTE);
            }
            out.push(c);
        }
        out.push(IDENTIFIER_QUOTE);
    }
    out
}

/// Render a value as an SQL literal.
///
/// Numbers pass through, booleans and null become keywords and strings are
/// escaped and single quoted. Byte strings and lists fail with
/// [`DbError::Type`].
pub fn quote(value: &Value) -> DbResult<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(true) => Ok("TRUE".to_string()),
        Value::Bool(false) => Ok("FALSE".to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::UInt(u) => Ok(u.to_string()),
        Value::Float(f) if f.is_finite() => Ok(f.to_string()),
        Value::Float(f) => Err(DbError::invalid_argument(format!(
            "Cannot quote non-finite float: {f}"
        ))),
        Value::String(s) => Ok(quote_str(s)),
        other => Err(DbError::Type(format!(
            "Value of type {} cannot be quoted",
            other.type_name()
        ))),
    }
}

/// Escape and single quote a string literal.
pub fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    escape_into(&mut out, s);
    out.push('\'');
    out
}

/// Escape a string the way the server's `real_escape_string` does, without
/// the surrounding quotes.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s);
    out
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\x1a' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests;
