//! Abstract pagination requests.

use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::order::OrderKey;

/// A client pagination request in Relay-style terms.
///
/// `first`/`last` select the page size and traversal direction; `after`/
/// `before` bound the window and may be combined with either.
///
/// ```
/// use keyset_core::{Cursor, OrderKey, PageRequest};
///
/// let request = PageRequest::new()
///    .last(2)
///    .before(Cursor::new(4))
///    .order_by(vec![OrderKey::asc("id")]);
///
/// assert_eq!(request.last, Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
   /// Page size when paging forward
   #[serde(default)]
   pub first: Option<usize>,
   /// Page size when paging backward
   #[serde(default)]
   pub last: Option<usize>,
   /// Return rows strictly after this boundary
   #[serde(default)]
   pub after: Option<Cursor>,
   /// Return rows strictly before this boundary
   #[serde(default)]
   pub before: Option<Cursor>,
   /// Ordering keys; empty means "by identifier"
   #[serde(default)]
   pub order_by: Vec<OrderKey>,
   /// Request-level direction; `false` reverses every key
   #[serde(default = "default_ascending")]
   pub ascending: bool,
}

fn default_ascending() -> bool {
   true
}

impl Default for PageRequest {
   fn default() -> Self {
      Self {
         first: None,
         last: None,
         after: None,
         before: None,
         order_by: Vec::new(),
         ascending: true,
      }
   }
}

impl PageRequest {
   /// An ascending request with no bounds, sizes or explicit ordering.
   pub fn new() -> Self {
      Self::default()
   }

   /// Fetch the first `n` rows of the window.
   pub fn first(mut self, n: usize) -> Self {
      self.first = Some(n);
      self
   }

   /// Fetch the last `n` rows of the window.
   pub fn last(mut self, n: usize) -> Self {
      self.last = Some(n);
      self
   }

   /// Start the window after a boundary row.
   pub fn after(mut self, cursor: Cursor) -> Self {
      self.after = Some(cursor);
      self
   }

   /// End the window before a boundary row.
   pub fn before(mut self, cursor: Cursor) -> Self {
      self.before = Some(cursor);
      self
   }

   /// Set the ordering keys.
   pub fn order_by(mut self, keys: Vec<OrderKey>) -> Self {
      self.order_by = keys;
      self
   }

   /// Set the request-level direction.
   pub fn ascending(mut self, ascending: bool) -> Self {
      self.ascending = ascending;
      self
   }
}
