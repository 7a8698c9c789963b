//! Conversions between SQLite values and JSON.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow, SqliteValueRef};
use sqlx::{Column, Decode, Row, Sqlite, TypeInfo, ValueRef};

use crate::Error;

fn decode<'r, T: Decode<'r, Sqlite>>(value: SqliteValueRef<'r>) -> Result<T, Error> {
   T::decode(value).map_err(|e| Error::Sqlx(sqlx::Error::Decode(e)))
}

/// Convert a raw SQLite value to JSON based on its storage class.
///
/// BLOBs become standard base64 strings.
pub(crate) fn to_json(value: SqliteValueRef<'_>) -> Result<JsonValue, Error> {
   if value.is_null() {
      return Ok(JsonValue::Null);
   }

   let type_name = value.type_info().name().to_string();
   match type_name.as_str() {
      "INTEGER" => Ok(JsonValue::from(decode::<i64>(value)?)),
      "REAL" => {
         let number = decode::<f64>(value)?;
         // NaN and infinities have no JSON representation
         Ok(serde_json::Number::from_f64(number).map_or(JsonValue::Null, JsonValue::Number))
      }
      "TEXT" => Ok(JsonValue::String(decode::<String>(value)?)),
      "BLOB" => Ok(JsonValue::String(STANDARD.encode(decode::<Vec<u8>>(value)?))),
      _ => Err(Error::UnsupportedDatatype(type_name)),
   }
}

/// Decode SQLite rows into JSON objects keyed by column name, preserving
/// column order.
pub(crate) fn decode_rows(rows: Vec<SqliteRow>) -> Result<Vec<IndexMap<String, JsonValue>>, Error> {
   let mut decoded = Vec::with_capacity(rows.len());
   for row in rows {
      let mut object = IndexMap::with_capacity(row.columns().len());
      for (i, column) in row.columns().iter().enumerate() {
         let raw = row.try_get_raw(i)?;
         object.insert(column.name().to_string(), to_json(raw)?);
      }
      decoded.push(object);
   }
   Ok(decoded)
}

/// Bind a JSON value as the closest SQLite storage class.
///
/// Integers stay integers so cursor values compare exactly against INTEGER
/// columns. Arrays and objects are bound as JSON text.
pub(crate) fn bind_value<'a>(
   query: Query<'a, Sqlite, SqliteArguments<'a>>,
   value: JsonValue,
) -> Query<'a, Sqlite, SqliteArguments<'a>> {
   match value {
      JsonValue::Null => query.bind(None::<String>),
      JsonValue::Bool(flag) => query.bind(flag),
      JsonValue::String(text) => query.bind(text),
      JsonValue::Number(number) => {
         if let Some(int_val) = number.as_i64() {
            query.bind(int_val)
         } else {
            // u64 beyond i64::MAX or a float
            query.bind(number.as_f64().unwrap_or_default())
         }
      }
      other => query.bind(other),
   }
}
