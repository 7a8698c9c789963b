//! # keyset-core
//!
//! A store-agnostic keyset (cursor) pagination compiler.
//!
//! Given a [`PageRequest`] (`first`/`last`, `after`/`before`, ordering keys
//! with per-key NULL placement) [`compile`] produces an immutable [`Plan`]:
//! a boundary [`Predicate`], a total ordering and a fetch limit that includes
//! one lookahead row. Whoever executes the plan hands the fetched rows to
//! [`Plan::finish`] (or [`finish`]) to get a [`Page`] in logical order with
//! `has_next_page`/`has_previous_page` flags.
//!
//! ## Core Types
//!
//! - **[`OrderKey`] / [`OrderSpec`]**: requested and validated orderings
//! - **[`Cursor`] / [`CursorCodec`]**: boundary values and their opaque tokens
//! - **[`Predicate`]**: typed boundary filter, never rendered as text here
//! - **[`Plan`] / [`Page`]**: compiled plan and assembled result
//! - **[`Error`]**: compile-time failures, classified by [`ErrorKind`]
//!
//! ## Example
//!
//! ```
//! use keyset_core::{Cursor, OrderKey, PageRequest, compile};
//!
//! let request = PageRequest::new()
//!    .last(2)
//!    .before(Cursor::new(4))
//!    .order_by(vec![OrderKey::asc("id")]);
//!
//! let plan = compile(&request).unwrap();
//! assert_eq!(plan.predicate().unwrap().to_string(), "id < 4");
//! assert_eq!(plan.limit(), 3);
//!
//! // The store returns rows in plan order (id DESC)
//! let page = plan.finish(vec![3, 2, 1]);
//! assert_eq!(page.rows, vec![2, 3]);
//! assert!(page.has_previous_page);
//! ```

pub mod cursor;
pub mod direction;
mod error;
pub mod order;
pub mod page;
pub mod plan;
pub mod predicate;
pub mod request;

pub use cursor::{Base64JsonCodec, Cursor, CursorCodec};
pub use direction::{Resolution, resolve};
pub use error::{Error, ErrorKind, Result};
pub use order::{
   DEFAULT_IDENTIFIER, KeysetColumn, NullsOrder, OrderKey, OrderSpec, SortDirection, normalize,
};
pub use page::{Page, finish};
pub use plan::{FetchWindow, Plan, compile, compile_with};
pub use predicate::{Operator, Predicate, compare_values};
pub use request::PageRequest;
