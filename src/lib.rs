//! # keyset-pagination
//!
//! Keyset (cursor) pagination with a page-size policy on top.
//!
//! - [`keyset_core`] compiles a [`PageRequest`] into a store-agnostic
//!   [`Plan`] and assembles fetched rows into a [`Page`].
//! - `keyset_sqlite` (feature `sqlite`, on by default) executes plans against
//!   a sqlx SQLite pool and returns pages with opaque cursors.
//! - [`Paginator`] applies a [`PaginationConfig`] (default and maximum page
//!   sizes, identifier column) before either of them runs.
//!
//! # Example
//!
//! ```
//! use keyset_pagination::{OrderKey, PageRequest, Paginator};
//!
//! let paginator = Paginator::default();
//! let plan = paginator
//!    .compile(PageRequest::new().order_by(vec![OrderKey::desc("score")]))
//!    .unwrap();
//!
//! // No count was given, so the default page size of 50 applies
//! assert_eq!(plan.limit(), 51);
//! ```

mod config;
mod paginator;

pub use config::{ConfigError, PaginationConfig};
pub use paginator::Paginator;

pub use keyset_core::{
   Base64JsonCodec, Cursor, CursorCodec, Error, ErrorKind, FetchWindow, KeysetColumn, NullsOrder,
   OrderKey, OrderSpec, Page, PageRequest, Plan, Predicate, Result, SortDirection, compile,
   compile_with, finish,
};

#[cfg(feature = "sqlite")]
pub use keyset_sqlite::{FetchPageBuilder, KeysetPage, PageInfo, fetch_page};

/// The SQLite executor and its error type.
#[cfg(feature = "sqlite")]
pub mod sqlite {
   pub use keyset_sqlite::{Error, FetchPageBuilder, KeysetPage, PageInfo, Result, fetch_page};
}
