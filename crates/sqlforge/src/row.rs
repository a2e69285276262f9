//! Result rows and row mapping traits.

use crate::error::{DbError, DbResult};
use crate::value::{FromValue, Value, decode};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Column metadata of a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    /// Lowercase server type name, e.g. `long` or `var_string`.
    pub type_name: String,
    /// Declared length of fixed-width string columns; 0 for every other type.
    pub max_length: u64,
    pub primary_key: bool,
    pub auto_increment: bool,
}

impl Field {
    /// A field with just a name and type, the flags cleared.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            max_length: 0,
            primary_key: false,
            auto_increment: false,
        }
    }
}

/// One result row. Values are accessible by column name or position.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    fields: Arc<[Field]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(fields: Arc<[Field]>, values: Vec<Value>) -> Self {
        Self { fields, values }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == column)
    }

    /// Value of `column`, if the row has it.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).and_then(|i| self.values.get(i))
    }

    /// Value at `index`.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Decode `column` into `T`.
    pub fn try_get<T: FromValue>(&self, column: &str) -> DbResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| DbError::decode(column, "column not found"))?;
        decode(column, value)
    }

    /// Decode the value at `index` into `T`.
    pub fn try_get_index<T: FromValue>(&self, index: usize) -> DbResult<T> {
        let name = self
            .fields
            .get(index)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| index.to_string());
        let value = self
            .values
            .get(index)
            .ok_or_else(|| DbError::decode(&name, "column index out of range"))?;
        decode(&name, value)
    }

    /// Column name to value mapping. A later duplicate name wins.
    pub fn into_map(self) -> BTreeMap<String, Value> {
        self.fields
            .iter()
            .map(|f| f.name.clone())
            .zip(self.values)
            .collect()
    }

    /// Convert to a JSON object keyed by column name.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .zip(&self.values)
            .map(|(field, value)| (field.name.clone(), value.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Serialize for Row {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.fields.iter().zip(&self.values) {
            map.serialize_entry(&field.name, value)?;
        }
        map.end()
    }
}

/// Trait for types that can be constructed from a result row.
///
/// Derive it with `#[derive(FromRow)]` (feature `derive`):
///
/// ```ignore
/// #[derive(FromRow)]
/// struct Item {
///     #[sqlforge(column = "c1")]
///     id: i64,
///     #[sqlforge(column = "c2")]
///     label: Option<String>,
/// }
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> DbResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(row.clone())
    }
}

impl FromRow for BTreeMap<String, Value> {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(row.clone().into_map())
    }
}
