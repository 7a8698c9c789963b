//! Plan assembly.
//!
//! [`compile`] is the single entry point collaborators use to turn a
//! [`PageRequest`] into a store-agnostic [`Plan`]. It performs no I/O and is
//! deterministic: equal requests always produce equal plans.

use serde::Serialize;
use tracing::debug;

use crate::Result;
use crate::direction::resolve;
use crate::order::{DEFAULT_IDENTIFIER, OrderSpec, normalize};
use crate::page::{Page, finish};
use crate::predicate::{Predicate, build};
use crate::request::PageRequest;

/// What the page assembler needs to know about how rows were fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchWindow {
   /// Page size the client asked for; 0 means unbounded
   pub requested_limit: usize,
   /// Whether rows arrive in reverse logical order
   pub flipped: bool,
   /// Whether a cursor bounds the side opposite to the fetch direction
   pub back_boundary: bool,
}

/// An immutable, store-agnostic execution plan for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
   predicate: Option<Predicate>,
   order: OrderSpec,
   limit: usize,
   window: FetchWindow,
}

impl Plan {
   /// Boundary filter to AND with any caller filters, if a cursor was given.
   pub fn predicate(&self) -> Option<&Predicate> {
      self.predicate.as_ref()
   }

   /// Total ordering rows must be fetched in.
   pub fn order(&self) -> &OrderSpec {
      &self.order
   }

   /// Maximum rows to fetch, including the lookahead row; 0 means unbounded.
   pub fn limit(&self) -> usize {
      self.limit
   }

   /// Fetch parameters for [`finish`].
   pub fn window(&self) -> FetchWindow {
      self.window
   }

   /// Assemble the page from rows fetched with this plan.
   pub fn finish<R>(&self, rows: Vec<R>) -> Page<R> {
      finish(rows, self.window)
   }
}

/// Compile a request using [`DEFAULT_IDENTIFIER`] as the fallback ordering.
pub fn compile(req: &PageRequest) -> Result<Plan> {
   compile_with(req, DEFAULT_IDENTIFIER)
}

/// Compile a request, ordering by `identifier` when it names no keys.
///
/// The boundary predicate is built against the logical order; the plan's
/// order is that same order reversed (directions and explicit NULL
/// placement) when the request pages backward with `last`.
pub fn compile_with(req: &PageRequest, identifier: &str) -> Result<Plan> {
   let logical = normalize(&req.order_by, identifier)?.with_request_direction(req.ascending);
   let resolution = resolve(req)?;
   let predicate = build(&logical, req.after.as_ref(), req.before.as_ref())?;
   let limit = resolution.fetch_limit()?;

   let back_boundary = if resolution.flipped {
      req.before.is_some()
   } else {
      req.after.is_some()
   };

   let order = if resolution.flipped {
      logical.reversed()
   } else {
      logical
   };

   let names: Vec<&str> = order.names().collect();
   debug!(
      order = ?names,
      ascending = resolution.ascending,
      flipped = resolution.flipped,
      limit,
      bounded = predicate.is_some(),
      "Compiled pagination plan"
   );

   Ok(Plan {
      predicate,
      order,
      limit,
      window: FetchWindow {
         requested_limit: resolution.limit,
         flipped: resolution.flipped,
         back_boundary,
      },
   })
}
