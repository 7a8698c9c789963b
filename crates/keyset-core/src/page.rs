//! Page assembly from fetched rows.

use std::ops::Deref;

use serde::Serialize;

use crate::plan::FetchWindow;

/// One page of rows in logical order, with continuation flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<R> {
   /// The rows in this page, in the requested (unflipped) order
   pub rows: Vec<R>,
   /// Whether rows exist after the last row of this page
   pub has_next_page: bool,
   /// Whether rows exist before the first row of this page
   pub has_previous_page: bool,
}

impl<R> Page<R> {
   /// First row of the page, the source of a start cursor.
   pub fn first(&self) -> Option<&R> {
      self.rows.first()
   }

   /// Last row of the page, the source of an end cursor.
   pub fn last(&self) -> Option<&R> {
      self.rows.last()
   }

   /// Transform every row, keeping the page flags.
   pub fn map<T>(self, f: impl FnMut(R) -> T) -> Page<T> {
      Page {
         rows: self.rows.into_iter().map(f).collect(),
         has_next_page: self.has_next_page,
         has_previous_page: self.has_previous_page,
      }
   }
}

// Allow using pages like a regular slice for ergonomics.
impl<R> Deref for Page<R> {
   type Target = [R];

   fn deref(&self) -> &Self::Target {
      &self.rows
   }
}

/// Turn rows fetched in plan order into a page.
///
/// `rows` must be sorted per the plan's order and hold at most
/// `requested_limit + 1` rows; anything else is a store contract violation.
/// The lookahead row is dropped and flipped fetches are reversed back into
/// logical order.
pub fn finish<R>(mut rows: Vec<R>, window: FetchWindow) -> Page<R> {
   if window.requested_limit == 0 {
      return Page {
         rows,
         has_next_page: false,
         has_previous_page: false,
      };
   }

   // Determine has_more by checking if we got more rows than requested
   let has_more = rows.len() > window.requested_limit;
   if has_more {
      rows.truncate(window.requested_limit);
   }

   // Restore the original sort order after a flipped fetch
   if window.flipped {
      rows.reverse();
   }

   let (has_next_page, has_previous_page) = if window.flipped {
      (window.back_boundary, has_more)
   } else {
      (has_more, window.back_boundary)
   };

   Page {
      rows,
      has_next_page,
      has_previous_page,
   }
}
