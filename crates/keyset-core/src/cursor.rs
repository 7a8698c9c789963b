//! Boundary cursors and their opaque token encoding.
//!
//! A [`Cursor`] holds the values of the ordering keys at one row. The
//! compiler only ever reads those values; turning them into something a
//! client can hold on to is the job of a [`CursorCodec`].

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::order::KeysetColumn;
use crate::{Error, Result};

/// Values of the ordering keys at a boundary row.
///
/// A cursor with a single value compares against the primary ordering key
/// only. A cursor with one value per ordering key compares lexicographically
/// against the whole keyset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor {
   values: Vec<JsonValue>,
}

impl Cursor {
   /// Cursor on the primary ordering key.
   pub fn new(value: impl Into<JsonValue>) -> Self {
      Self {
         values: vec![value.into()],
      }
   }

   /// Cursor carrying one value per ordering key, primary first.
   pub fn from_values(values: Vec<JsonValue>) -> Self {
      Self { values }
   }

   /// Build a cursor from a row by looking up every keyset column.
   ///
   /// Fails with [`Error::CursorColumnNotFound`] on the first column the row
   /// does not contain.
   pub fn from_row<'r, F>(columns: &[KeysetColumn], mut lookup: F) -> Result<Self>
   where
      F: FnMut(&str) -> Option<&'r JsonValue>,
   {
      let mut values = Vec::with_capacity(columns.len());
      for column in columns {
         let value =
            lookup(column.name.as_str()).ok_or_else(|| Error::CursorColumnNotFound {
               column: column.name.clone(),
            })?;
         values.push(value.clone());
      }
      Ok(Self { values })
   }

   /// The boundary values, primary key first.
   pub fn values(&self) -> &[JsonValue] {
      &self.values
   }

   /// Number of boundary values.
   pub fn len(&self) -> usize {
      self.values.len()
   }

   /// Whether the cursor carries no values at all.
   pub fn is_empty(&self) -> bool {
      self.values.is_empty()
   }

   /// Consume the cursor and return its values.
   pub fn into_values(self) -> Vec<JsonValue> {
      self.values
   }
}

/// Converts cursors to and from opaque client-facing tokens.
pub trait CursorCodec: Send + Sync {
   /// Encode a cursor into an opaque token.
   fn encode(&self, cursor: &Cursor) -> String;

   /// Decode a token produced by [`CursorCodec::encode`].
   fn decode(&self, token: &str) -> Result<Cursor>;
}

/// Codec producing URL-safe, unpadded base64 of the JSON value array.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64JsonCodec;

impl CursorCodec for Base64JsonCodec {
   fn encode(&self, cursor: &Cursor) -> String {
      // Serializing a Vec<Value> cannot fail
      let json = serde_json::to_vec(&cursor.values).unwrap_or_default();
      URL_SAFE_NO_PAD.encode(json)
   }

   fn decode(&self, token: &str) -> Result<Cursor> {
      let bytes = URL_SAFE_NO_PAD
         .decode(token)
         .map_err(|e| Error::CursorDecode(e.to_string()))?;

      let values: Vec<JsonValue> =
         serde_json::from_slice(&bytes).map_err(|e| Error::CursorDecode(e.to_string()))?;

      if values.is_empty() {
         return Err(Error::CursorDecode("cursor carries no values".into()));
      }

      Ok(Cursor { values })
   }
}
