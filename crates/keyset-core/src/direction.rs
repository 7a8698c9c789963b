//! Effective fetch direction for a request.
//!
//! "Last N" is executed as "first N of the reversed order", so backward
//! traversal reuses exactly the same ordering and tie-breaking as forward
//! traversal. The page assembler undoes the reversal afterwards.

use crate::request::PageRequest;
use crate::{Error, Result};

/// Outcome of resolving a request's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
   /// Direction rows are fetched in
   pub ascending: bool,
   /// Requested page size; 0 means unbounded
   pub limit: usize,
   /// Whether the fetch order is the reverse of the logical order
   pub flipped: bool,
}

impl Resolution {
   /// Number of rows to ask the store for: one lookahead row beyond the
   /// page, or 0 for an unbounded fetch.
   pub fn fetch_limit(&self) -> Result<usize> {
      if self.limit == 0 {
         return Ok(0);
      }
      self.limit.checked_add(1).ok_or(Error::InvalidPageSize)
   }
}

/// Determine the effective direction, page size and flip of a request.
///
/// Fails if both `first` and `last` are set or either is zero.
pub fn resolve(req: &PageRequest) -> Result<Resolution> {
   match (req.first, req.last) {
      (Some(_), Some(_)) => Err(Error::ConflictingPageSizes),
      (Some(0), None) | (None, Some(0)) => Err(Error::InvalidPageSize),
      (Some(first), None) => Ok(Resolution {
         ascending: req.ascending,
         limit: first,
         flipped: false,
      }),
      (None, Some(last)) => Ok(Resolution {
         ascending: !req.ascending,
         limit: last,
         flipped: true,
      }),
      (None, None) => Ok(Resolution {
         ascending: req.ascending,
         limit: 0,
         flipped: false,
      }),
   }
}
