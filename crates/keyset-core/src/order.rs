//! Ordering keys and their normalization.
//!
//! A request describes its ordering as a list of [`OrderKey`]s. A key
//! deserialized without a direction sorts ascending relative to the
//! request's `ascending` flag. [`normalize`] turns
//! that list into an [`OrderSpec`] of validated [`KeysetColumn`]s, falling
//! back to a single ascending key on the row identifier when no ordering is
//! given.
//!
//! # Example
//!
//! ```
//! use keyset_core::order::{OrderKey, normalize};
//!
//! let order = normalize(&[OrderKey::desc("score"), OrderKey::asc("id")], "id").unwrap();
//! assert_eq!(order.len(), 2);
//!
//! let fallback = normalize(&[], "id").unwrap();
//! assert_eq!(fallback.primary().name, "id");
//! ```

use std::collections::HashSet;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifier column used when a request carries no ordering.
pub const DEFAULT_IDENTIFIER: &str = "id";

/// Sort direction for a keyset column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
   /// Ascending order (smallest first)
   #[default]
   Asc,
   /// Descending order (largest first)
   Desc,
}

impl SortDirection {
   /// Return the opposite sort direction.
   pub fn reversed(self) -> Self {
      match self {
         SortDirection::Asc => SortDirection::Desc,
         SortDirection::Desc => SortDirection::Asc,
      }
   }
}

/// Placement of NULL values within a sorted column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NullsOrder {
   /// NULLs sort before every non-null value
   First,
   /// NULLs sort after every non-null value
   Last,
   /// Leave placement to the store's default for the column's direction
   #[default]
   Unspecified,
}

impl NullsOrder {
   /// Return the mirrored placement.
   ///
   /// `Unspecified` stays unspecified: stores that leave NULL placement to
   /// their default already mirror it when the direction flips.
   pub fn reversed(self) -> Self {
      match self {
         NullsOrder::First => NullsOrder::Last,
         NullsOrder::Last => NullsOrder::First,
         NullsOrder::Unspecified => NullsOrder::Unspecified,
      }
   }
}

/// An ordering key as supplied by a pagination request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderKey {
   /// Column or attribute name
   pub field: String,
   /// Sort direction, relative to the request's `ascending` flag
   #[serde(default)]
   pub direction: SortDirection,
   /// NULL placement
   #[serde(default)]
   pub nulls: NullsOrder,
}

impl OrderKey {
   /// Create an ascending ordering key.
   pub fn asc(field: impl Into<String>) -> Self {
      Self {
         field: field.into(),
         direction: SortDirection::Asc,
         nulls: NullsOrder::Unspecified,
      }
   }

   /// Create a descending ordering key.
   pub fn desc(field: impl Into<String>) -> Self {
      Self {
         field: field.into(),
         direction: SortDirection::Desc,
         nulls: NullsOrder::Unspecified,
      }
   }

   /// Place NULLs before non-null values.
   pub fn nulls_first(mut self) -> Self {
      self.nulls = NullsOrder::First;
      self
   }

   /// Place NULLs after non-null values.
   pub fn nulls_last(mut self) -> Self {
      self.nulls = NullsOrder::Last;
      self
   }
}

/// A validated column of an [`OrderSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeysetColumn {
   /// Column name as it appears in the query result set
   pub name: String,
   /// Sort direction for this column
   pub direction: SortDirection,
   /// NULL placement for this column
   pub nulls: NullsOrder,
}

impl KeysetColumn {
   /// Create a keyset column with ascending sort direction.
   pub fn asc(name: impl Into<String>) -> Self {
      Self {
         name: name.into(),
         direction: SortDirection::Asc,
         nulls: NullsOrder::Unspecified,
      }
   }

   /// Create a keyset column with descending sort direction.
   pub fn desc(name: impl Into<String>) -> Self {
      Self {
         name: name.into(),
         direction: SortDirection::Desc,
         nulls: NullsOrder::Unspecified,
      }
   }

   /// Return this column with direction and explicit NULL placement mirrored.
   pub fn reversed(&self) -> Self {
      Self {
         name: self.name.clone(),
         direction: self.direction.reversed(),
         nulls: self.nulls.reversed(),
      }
   }
}

/// A non-empty, validated ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderSpec(Vec<KeysetColumn>);

impl OrderSpec {
   /// The primary (first) ordering column.
   pub fn primary(&self) -> &KeysetColumn {
      // Construction guarantees at least one column.
      &self.0[0]
   }

   /// The ordering columns, primary first.
   pub fn columns(&self) -> &[KeysetColumn] {
      &self.0
   }

   /// Column names, primary first.
   pub fn names(&self) -> impl Iterator<Item = &str> {
      self.0.iter().map(|c| c.name.as_str())
   }

   /// Create an ordering with every column reversed.
   ///
   /// Explicit NULL placement is mirrored too, so the result enumerates rows
   /// in exactly the opposite sequence.
   pub fn reversed(&self) -> Self {
      Self(self.0.iter().map(KeysetColumn::reversed).collect())
   }

   /// Apply a request-level direction: descending flips every column's
   /// direction while keeping its declared NULL placement.
   pub(crate) fn with_request_direction(self, ascending: bool) -> Self {
      if ascending {
         return self;
      }

      Self(
         self
            .0
            .into_iter()
            .map(|c| KeysetColumn {
               direction: c.direction.reversed(),
               ..c
            })
            .collect(),
      )
   }
}

impl Deref for OrderSpec {
   type Target = [KeysetColumn];

   fn deref(&self) -> &Self::Target {
      &self.0
   }
}

/// Validate an ordering, substituting the identifier key when it is empty.
///
/// `identifier` is the name of the column whose values are unique per row.
/// Fails if any key has an empty field or repeats a field.
pub fn normalize(spec: &[OrderKey], identifier: &str) -> Result<OrderSpec> {
   if spec.is_empty() {
      if identifier.is_empty() {
         return Err(Error::EmptyIdentifier);
      }
      return Ok(OrderSpec(vec![KeysetColumn::asc(identifier)]));
   }

   let mut seen = HashSet::with_capacity(spec.len());
   let mut columns = Vec::with_capacity(spec.len());

   for (position, key) in spec.iter().enumerate() {
      if key.field.is_empty() {
         return Err(Error::EmptyOrderField { position });
      }
      if !seen.insert(key.field.as_str()) {
         return Err(Error::DuplicateOrderField {
            field: key.field.clone(),
         });
      }

      columns.push(KeysetColumn {
         name: key.field.clone(),
         direction: key.direction,
         nulls: key.nulls,
      });
   }

   Ok(OrderSpec(columns))
}
