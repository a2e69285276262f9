//! [`Driver`] backed by `mysql_async`.

use super::{ConnectParams, Connector, Driver, PreparedHandle, Reply, RowSource};
use crate::error::{DbError, DbResult, ServerError};
use crate::row::Field;
use crate::value::Value;
use async_trait::async_trait;
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::prelude::Queryable;
use mysql_async::{BinaryProtocol, Column, Conn, OptsBuilder, Params, QueryResult, SslOpts, TextProtocol};
use std::collections::HashMap;
use std::sync::Arc;

/// Collation id of the `binary` character set.
const BINARY_CHARSET: u16 = 63;

/// Connects through `mysql_async`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlConnector;

#[async_trait]
impl Connector for MysqlConnector {
    async fn connect(&self, params: &ConnectParams) -> DbResult<Box<dyn Driver>> {
        let mut opts = OptsBuilder::default()
            .ip_or_hostname(params.host.clone())
            .tcp_port(params.port)
            .user(Some(params.username.clone()))
            .pass(Some(params.password.clone()))
            .db_name(params.schema.clone())
            .socket(params.socket.clone());
        if params.tls.enabled {
            let ssl = SslOpts::default()
                .with_danger_accept_invalid_certs(!params.tls.verify)
                .with_danger_skip_domain_validation(!params.tls.verify);
            opts = opts.ssl_opts(Some(ssl));
        }
        let conn = Conn::new(opts).await.map_err(map_error)?;
        Ok(Box::new(MysqlDriver {
            conn,
            native: params.int_and_float_native,
            statements: HashMap::new(),
        }))
    }
}

struct MysqlDriver {
    conn: Conn,
    native: bool,
    statements: HashMap<u32, mysql_async::Statement>,
}

#[async_trait]
impl Driver for MysqlDriver {
    async fn query<'a>(&'a mut self, sql: &str) -> DbResult<Reply<'a>> {
        let native = self.native;
        let result = self
            .conn
            .query_iter(sql.to_string())
            .await
            .map_err(map_error)?;
        TextRows::reply(result, native).await
    }

    async fn prepare(&mut self, sql: &str) -> DbResult<PreparedHandle> {
        let statement = self.conn.prep(sql.to_string()).await.map_err(map_error)?;
        let handle = PreparedHandle {
            id: statement.id(),
            param_count: usize::from(statement.num_params()),
        };
        self.statements.insert(handle.id, statement);
        Ok(handle)
    }

    async fn execute_prepared<'a>(
        &'a mut self,
        handle: &PreparedHandle,
        params: &[Value],
    ) -> DbResult<Reply<'a>> {
        let statement = self
            .statements
            .get(&handle.id)
            .cloned()
            .ok_or_else(|| DbError::logic("Prepared statement is closed"))?;
        let params = if params.is_empty() {
            Params::Empty
        } else {
            Params::Positional(params.iter().map(to_mysql_value).collect::<DbResult<_>>()?)
        };
        let native = self.native;
        let result = self
            .conn
            .exec_iter(statement, params)
            .await
            .map_err(map_error)?;
        BinaryRows::reply(result, native).await
    }

    async fn close_prepared(&mut self, handle: &PreparedHandle) -> DbResult<()> {
        if let Some(statement) = self.statements.remove(&handle.id) {
            self.conn.close(statement).await.map_err(map_error)?;
        }
        Ok(())
    }

    async fn disconnect(self: Box<Self>) -> DbResult<()> {
        self.conn.disconnect().await.map_err(map_error)
    }
}

/// Per-column decoding hints.
#[derive(Debug, Clone, Copy)]
struct Decoding {
    numeric: bool,
    unsigned: bool,
    binary: bool,
}

impl Decoding {
    fn of(column: &Column) -> Self {
        Self {
            numeric: is_numeric(column.column_type()),
            unsigned: column.flags().contains(ColumnFlags::UNSIGNED_FLAG),
            binary: column.character_set() == BINARY_CHARSET,
        }
    }
}

macro_rules! row_stream {
    ($name:ident, $protocol:ty) => {
        struct $name<'a> {
            result: QueryResult<'a, 'static, $protocol>,
            fields: Arc<[Field]>,
            decoding: Vec<Decoding>,
            native: bool,
        }

        impl<'a> $name<'a> {
            /// Wrap `result`, or finish it when it has no result set.
            async fn reply(
                result: QueryResult<'a, 'static, $protocol>,
                native: bool,
            ) -> DbResult<Reply<'a>> {
                if result.columns_ref().is_empty() {
                    let reply = Reply::Done {
                        affected_rows: result.affected_rows(),
                        last_insert_id: result.last_insert_id(),
                        warnings: result.warnings(),
                    };
                    result.drop_result().await.map_err(map_error)?;
                    return Ok(reply);
                }
                let columns = result.columns_ref();
                let fields: Arc<[Field]> = columns.iter().map(field_from).collect();
                let decoding = columns.iter().map(Decoding::of).collect();
                Ok(Reply::Rows(Box::new(Self {
                    result,
                    fields,
                    decoding,
                    native,
                })))
            }
        }

        #[async_trait]
        impl RowSource for $name<'_> {
            fn fields(&self) -> Arc<[Field]> {
                Arc::clone(&self.fields)
            }

            async fn next_row(&mut self) -> DbResult<Option<Vec<Value>>> {
                let Some(row) = self.result.next().await.map_err(map_error)? else {
                    return Ok(None);
                };
                let values = mysql_async::Row::unwrap(row)
                    .into_iter()
                    .zip(&self.decoding)
                    .map(|(value, decoding)| from_mysql_value(value, *decoding, self.native))
                    .collect();
                Ok(Some(values))
            }

            fn warnings(&self) -> u16 {
                self.result.warnings()
            }
        }
    };
}

row_stream!(TextRows, TextProtocol);
row_stream!(BinaryRows, BinaryProtocol);

fn field_from(column: &Column) -> Field {
    let flags = column.flags();
    Field {
        name: column.name_str().into_owned(),
        type_name: type_name(column.column_type()),
        max_length: max_length(column),
        primary_key: flags.contains(ColumnFlags::PRI_KEY_FLAG),
        auto_increment: flags.contains(ColumnFlags::AUTO_INCREMENT_FLAG),
    }
}

/// Only fixed-width string columns report a length; numeric display widths
/// and variable-length types report 0.
fn max_length(column: &Column) -> u64 {
    match column.column_type() {
        ColumnType::MYSQL_TYPE_STRING => u64::from(column.column_length()),
        _ => 0,
    }
}

/// `MYSQL_TYPE_VAR_STRING` becomes `var_string`.
fn type_name(column_type: ColumnType) -> String {
    let name = format!("{column_type:?}");
    name.strip_prefix("MYSQL_TYPE_")
        .unwrap_or(&name)
        .to_lowercase()
}

fn is_numeric(column_type: ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::MYSQL_TYPE_TINY
            | ColumnType::MYSQL_TYPE_SHORT
            | ColumnType::MYSQL_TYPE_LONG
            | ColumnType::MYSQL_TYPE_LONGLONG
            | ColumnType::MYSQL_TYPE_INT24
            | ColumnType::MYSQL_TYPE_YEAR
            | ColumnType::MYSQL_TYPE_FLOAT
            | ColumnType::MYSQL_TYPE_DOUBLE
    )
}

/// Text protocol values arrive as bytes; with native decoding enabled,
/// integer and floating point columns are parsed into numbers.
fn from_mysql_value(value: mysql_async::Value, decoding: Decoding, native: bool) -> Value {
    use mysql_async::Value as My;

    match value {
        My::NULL => Value::Null,
        My::Int(i) if native => Value::Int(i),
        My::UInt(u) if native => Value::UInt(u),
        My::Float(f) if native => Value::Float(f64::from(f)),
        My::Double(f) if native => Value::Float(f),
        My::Int(i) => Value::String(i.to_string()),
        My::UInt(u) => Value::String(u.to_string()),
        My::Float(f) => Value::String(f.to_string()),
        My::Double(f) => Value::String(f.to_string()),
        My::Bytes(bytes) if decoding.binary => Value::Bytes(bytes),
        My::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) if native && decoding.numeric => {
                parse_number(&text, decoding.unsigned).unwrap_or(Value::String(text))
            }
            Ok(text) => Value::String(text),
            Err(err) => Value::Bytes(err.into_bytes()),
        },
        other => Value::String(other.as_sql(true).trim_matches('\'').to_string()),
    }
}

fn parse_number(text: &str, unsigned: bool) -> Option<Value> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::Int(i));
    }
    if unsigned {
        if let Ok(u) = text.parse::<u64>() {
            return Some(Value::UInt(u));
        }
    }
    text.parse::<f64>().ok().map(Value::Float)
}

fn to_mysql_value(value: &Value) -> DbResult<mysql_async::Value> {
    use mysql_async::Value as My;

    Ok(match value {
        Value::Null => My::NULL,
        Value::Bool(b) => My::Int(i64::from(*b)),
        Value::Int(i) => My::Int(*i),
        Value::UInt(u) => My::UInt(*u),
        Value::Float(f) => My::Double(*f),
        Value::String(s) => My::Bytes(s.clone().into_bytes()),
        Value::Bytes(b) => My::Bytes(b.clone()),
        Value::List(_) => {
            return Err(DbError::Type(
                "Value of type list cannot be bound as a parameter".to_string(),
            ));
        }
    })
}

fn map_error(err: mysql_async::Error) -> DbError {
    match err {
        mysql_async::Error::Server(server) => DbError::Server(ServerError {
            code: server.code,
            sqlstate: server.state,
            message: server.message,
        }),
        other => DbError::Connection(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mysql_async::Value as My;

    const TEXT: Decoding = Decoding {
        numeric: false,
        unsigned: false,
        binary: false,
    };
    const INT: Decoding = Decoding {
        numeric: true,
        unsigned: false,
        binary: false,
    };

    #[test]
    fn type_names_are_lowercase() {
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_LONG), "long");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_VAR_STRING), "var_string");
    }

    #[test]
    fn max_length_is_zero_unless_fixed_width() {
        let id = Column::new(ColumnType::MYSQL_TYPE_LONG)
            .with_flags(ColumnFlags::PRI_KEY_FLAG | ColumnFlags::AUTO_INCREMENT_FLAG)
            .with_column_length(11);
        let field = field_from(&id);
        assert_eq!(field.max_length, 0);
        assert!(field.primary_key);
        assert!(field.auto_increment);

        let label = Column::new(ColumnType::MYSQL_TYPE_VAR_STRING).with_column_length(1020);
        assert_eq!(field_from(&label).max_length, 0);

        let blob = Column::new(ColumnType::MYSQL_TYPE_BLOB).with_column_length(65535);
        assert_eq!(field_from(&blob).max_length, 0);

        let code = Column::new(ColumnType::MYSQL_TYPE_STRING).with_column_length(8);
        assert_eq!(field_from(&code).max_length, 8);
    }

    #[test]
    fn text_protocol_numbers() {
        assert_eq!(from_mysql_value(My::Bytes(b"42".to_vec()), INT, true), Value::Int(42));
        assert_eq!(
            from_mysql_value(My::Bytes(b"42".to_vec()), INT, false),
            Value::String("42".into())
        );
        assert_eq!(
            from_mysql_value(My::Bytes(b"42".to_vec()), TEXT, true),
            Value::String("42".into())
        );
        assert_eq!(from_mysql_value(My::NULL, INT, true), Value::Null);
    }

    #[test]
    fn binary_protocol_numbers() {
        assert_eq!(from_mysql_value(My::Int(-3), INT, true), Value::Int(-3));
        assert_eq!(from_mysql_value(My::Int(-3), INT, false), Value::String("-3".into()));
        assert_eq!(from_mysql_value(My::Double(1.5), INT, true), Value::Float(1.5));
    }

    #[test]
    fn binary_columns_keep_bytes() {
        let binary = Decoding {
            binary: true,
            ..TEXT
        };
        assert_eq!(
            from_mysql_value(My::Bytes(vec![0xff, 0x00]), binary, true),
            Value::Bytes(vec![0xff, 0x00])
        );
    }

    #[test]
    fn unsigned_overflowing_i64() {
        let unsigned = Decoding {
            unsigned: true,
            ..INT
        };
        assert_eq!(
            from_mysql_value(My::Bytes(b"18446744073709551615".to_vec()), unsigned, true),
            Value::UInt(u64::MAX)
        );
    }

    #[test]
    fn lists_cannot_be_bound() {
        assert!(matches!(
            to_mysql_value(&Value::List(vec![])),
            Err(DbError::Type(_))
        ));
        assert_eq!(to_mysql_value(&Value::Bool(true)).unwrap(), My::Int(1));
    }
}
