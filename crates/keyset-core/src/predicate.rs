//! Boundary predicates.
//!
//! The builder turns `after`/`before` cursors into a typed [`Predicate`] tree
//! that selects rows strictly beyond the boundary. The tree carries operands
//! as values, never as query text; a store-specific renderer decides how to
//! bind them.
//!
//! # Comparison shape
//!
//! For a cursor with one value only the primary ordering key is compared:
//!
//! ```text
//! after  (id ASC)  -> id > $v
//! before (id ASC)  -> id < $v
//! ```
//!
//! For a cursor with one value per ordering key the comparison is
//! lexicographic. Uniform directions use a row-value comparison, mixed
//! directions the expanded OR form:
//!
//! ```text
//! (a ASC, b ASC)          -> (a, b) > ($1, $2)
//! (a ASC, b DESC, c ASC)  -> (a > $1) OR (a = $2 AND b < $3) OR (a = $4 AND b = $5 AND c > $6)
//! ```
//!
//! # NULLs
//!
//! A key with declared NULL placement always takes the expanded form, since
//! a strict comparison never matches a NULL row. Paging toward the NULL
//! block adds an `IS NULL` alternative; a NULL cursor value ties on
//! `IS NULL` and bounds the non-null rows with `IS NOT NULL`:
//!
//! ```text
//! (due ASC NULLS LAST, id ASC)
//!   after (7, 3)     -> (due > $1 OR due IS NULL) OR (due = $2 AND id > $3)
//!   after (NULL, 3)  -> due IS NULL AND id > $1
//! ```
//!
//! A NULL cursor value on a key without declared placement is rejected.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::cursor::Cursor;
use crate::order::{KeysetColumn, NullsOrder, OrderSpec, SortDirection};
use crate::{Error, Result};

/// Comparison operator of a boundary predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
   /// Equal
   Eq,
   /// Strictly less than
   Lt,
   /// Strictly greater than
   Gt,
}

impl Operator {
   /// Conventional infix symbol.
   pub fn symbol(self) -> &'static str {
      match self {
         Operator::Eq => "=",
         Operator::Lt => "<",
         Operator::Gt => ">",
      }
   }

   fn accepts(self, ordering: Ordering) -> bool {
      match self {
         Operator::Eq => ordering == Ordering::Equal,
         Operator::Lt => ordering == Ordering::Less,
         Operator::Gt => ordering == Ordering::Greater,
      }
   }
}

/// A typed filter selecting the rows beyond a pagination boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
   /// `field <operator> operand`
   Comparison {
      field: String,
      operator: Operator,
      operand: JsonValue,
   },
   /// Row-value comparison `(f1, f2, …) <operator> (v1, v2, …)`
   Tuple {
      fields: Vec<String>,
      operator: Operator,
      operands: Vec<JsonValue>,
   },
   /// `field IS NULL`
   IsNull { field: String },
   /// `field IS NOT NULL`
   IsNotNull { field: String },
   /// Matches no row
   Never,
   /// Both sides must hold
   And(Box<Predicate>, Box<Predicate>),
   /// Either side must hold
   Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
   /// Single-field comparison.
   pub fn comparison(field: impl Into<String>, operator: Operator, operand: JsonValue) -> Self {
      Predicate::Comparison {
         field: field.into(),
         operator,
         operand,
      }
   }

   /// `field IS NULL`
   pub fn is_null(field: impl Into<String>) -> Self {
      Predicate::IsNull {
         field: field.into(),
      }
   }

   /// `field IS NOT NULL`
   pub fn is_not_null(field: impl Into<String>) -> Self {
      Predicate::IsNotNull {
         field: field.into(),
      }
   }

   /// Conjunction of two predicates.
   pub fn and(left: Predicate, right: Predicate) -> Self {
      Predicate::And(Box::new(left), Box::new(right))
   }

   /// Disjunction of two predicates.
   pub fn or(left: Predicate, right: Predicate) -> Self {
      Predicate::Or(Box::new(left), Box::new(right))
   }

   /// Evaluate the predicate against a row.
   ///
   /// Follows SQL semantics for missing data: a comparison involving a
   /// missing or NULL value does not match, and a missing field counts as
   /// NULL for `IS NULL`. Values are ordered with
   /// [`compare_values`], which may differ from a store's collation for
   /// text.
   pub fn evaluate<'r, F>(&self, lookup: &F) -> bool
   where
      F: Fn(&str) -> Option<&'r JsonValue>,
   {
      match self {
         Predicate::Comparison {
            field,
            operator,
            operand,
         } => lookup(field.as_str())
            .and_then(|value| compare_values(value, operand))
            .is_some_and(|ordering| operator.accepts(ordering)),
         Predicate::Tuple {
            fields,
            operator,
            operands,
         } => {
            let mut ordering = Ordering::Equal;
            for (field, operand) in fields.iter().zip(operands) {
               let Some(step) =
                  lookup(field.as_str()).and_then(|value| compare_values(value, operand))
               else {
                  return false;
               };
               if step != Ordering::Equal {
                  ordering = step;
                  break;
               }
            }
            operator.accepts(ordering)
         }
         Predicate::IsNull { field } => lookup(field.as_str()).is_none_or(JsonValue::is_null),
         Predicate::IsNotNull { field } => lookup(field.as_str()).is_some_and(|v| !v.is_null()),
         Predicate::Never => false,
         Predicate::And(left, right) => left.evaluate(lookup) && right.evaluate(lookup),
         Predicate::Or(left, right) => left.evaluate(lookup) || right.evaluate(lookup),
      }
   }
}

impl fmt::Display for Predicate {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         Predicate::Comparison {
            field,
            operator,
            operand,
         } => write!(f, "{} {} {}", field, operator.symbol(), operand),
         Predicate::Tuple {
            fields,
            operator,
            operands,
         } => {
            let operands: Vec<String> = operands.iter().map(JsonValue::to_string).collect();
            write!(
               f,
               "({}) {} ({})",
               fields.join(", "),
               operator.symbol(),
               operands.join(", ")
            )
         }
         Predicate::IsNull { field } => write!(f, "{} IS NULL", field),
         Predicate::IsNotNull { field } => write!(f, "{} IS NOT NULL", field),
         Predicate::Never => f.write_str("FALSE"),
         Predicate::And(left, right) => write!(f, "({}) AND ({})", left, right),
         Predicate::Or(left, right) => write!(f, "({}) OR ({})", left, right),
      }
   }
}

/// Order two JSON values of the same type.
///
/// Numbers compare numerically, strings by code point, booleans with
/// `false < true`. Mixed types and NULLs are incomparable.
pub fn compare_values(left: &JsonValue, right: &JsonValue) -> Option<Ordering> {
   match (left, right) {
      (JsonValue::Number(a), JsonValue::Number(b)) => match (a.as_i64(), b.as_i64()) {
         (Some(a), Some(b)) => Some(a.cmp(&b)),
         _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
      },
      (JsonValue::String(a), JsonValue::String(b)) => Some(a.cmp(b)),
      (JsonValue::Bool(a), JsonValue::Bool(b)) => Some(a.cmp(b)),
      _ => None,
   }
}

/// Build the boundary predicate for a request.
///
/// `order` is the logical ordering (request direction applied, not flipped
/// for backward fetches): `after` selects rows that come later in it,
/// `before` rows that come earlier. Returns `None` when there is no cursor.
pub fn build(
   order: &OrderSpec,
   after: Option<&Cursor>,
   before: Option<&Cursor>,
) -> Result<Option<Predicate>> {
   let after = after.map(|c| boundary(order, c, true)).transpose()?;
   let before = before.map(|c| boundary(order, c, false)).transpose()?;

   Ok(match (after, before) {
      (Some(a), Some(b)) => Some(Predicate::and(a, b)),
      (a, b) => a.or(b),
   })
}

/// Operator selecting rows beyond a boundary on a single column.
fn beyond(direction: SortDirection, forward: bool) -> Operator {
   match (direction, forward) {
      (SortDirection::Asc, true) | (SortDirection::Desc, false) => Operator::Gt,
      (SortDirection::Asc, false) | (SortDirection::Desc, true) => Operator::Lt,
   }
}

/// Whether the key's NULL block lies beyond its non-null values when moving
/// forward (`after`) or backward (`before`) through the logical order.
fn nulls_beyond(key: &KeysetColumn, forward: bool) -> bool {
   match key.nulls {
      NullsOrder::Last => forward,
      NullsOrder::First => !forward,
      NullsOrder::Unspecified => false,
   }
}

/// Rows strictly beyond `value` on one key, or `None` if there are none.
fn beyond_value(key: &KeysetColumn, value: &JsonValue, forward: bool) -> Option<Predicate> {
   let nulls_beyond = nulls_beyond(key, forward);

   // Every NULL ties with a NULL boundary; only the non-null block can lie beyond it.
   if value.is_null() {
      return (!nulls_beyond).then(|| Predicate::is_not_null(key.name.clone()));
   }

   let comparison = Predicate::comparison(
      key.name.clone(),
      beyond(key.direction, forward),
      value.clone(),
   );
   Some(if nulls_beyond {
      Predicate::or(comparison, Predicate::is_null(key.name.clone()))
   } else {
      comparison
   })
}

/// Rows tying with `value` on one key.
fn tie(key: &KeysetColumn, value: &JsonValue) -> Predicate {
   if value.is_null() {
      Predicate::is_null(key.name.clone())
   } else {
      Predicate::comparison(key.name.clone(), Operator::Eq, value.clone())
   }
}

fn boundary(order: &OrderSpec, cursor: &Cursor, forward: bool) -> Result<Predicate> {
   let values = cursor.values();

   // A single value only ever bounds the primary key.
   let keys: &[KeysetColumn] = if values.len() == 1 {
      &order[..1]
   } else if values.len() == order.len() {
      order.columns()
   } else {
      return Err(Error::CursorLengthMismatch {
         cursor_len: values.len(),
         keyset_len: order.len(),
      });
   };

   if let Some((key, _)) = keys
      .iter()
      .zip(values)
      .find(|(k, v)| v.is_null() && k.nulls == NullsOrder::Unspecified)
   {
      return Err(Error::NullCursorValue {
         field: key.name.clone(),
      });
   }

   let direction = keys[0].direction;
   if keys.len() > 1
      && keys
         .iter()
         .all(|k| k.direction == direction && k.nulls == NullsOrder::Unspecified)
   {
      return Ok(Predicate::Tuple {
         fields: keys.iter().map(|k| k.name.clone()).collect(),
         operator: beyond(direction, forward),
         operands: values.to_vec(),
      });
   }

   // One OR branch per key, each pinning the keys before it.
   let mut branches = Vec::with_capacity(keys.len());
   for level in 0..keys.len() {
      let Some(step) = beyond_value(&keys[level], &values[level], forward) else {
         continue;
      };
      let mut parts: Vec<Predicate> = keys[..level]
         .iter()
         .zip(values)
         .map(|(key, value)| tie(key, value))
         .collect();
      parts.push(step);
      branches.extend(parts.into_iter().reduce(Predicate::and));
   }

   Ok(branches
      .into_iter()
      .reduce(Predicate::or)
      .unwrap_or(Predicate::Never))
}
