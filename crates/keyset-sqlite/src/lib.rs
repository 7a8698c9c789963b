//! # keyset-sqlite
//!
//! Executes [`keyset_core`] pagination plans against SQLite through sqlx.
//!
//! [`fetch_page`] compiles a [`PageRequest`], renders the plan around a
//! caller-supplied base query, runs it on a [`SqlitePool`] and returns a
//! [`KeysetPage`] of JSON rows with opaque start/end cursors.
//!
//! ## Example
//!
//! ```no_run
//! use keyset_sqlite::{OrderKey, PageRequest, fetch_page};
//! use sqlx::SqlitePool;
//!
//! # async fn example(pool: SqlitePool) -> Result<(), keyset_sqlite::Error> {
//! let request = PageRequest::new()
//!    .first(20)
//!    .order_by(vec![OrderKey::desc("score"), OrderKey::asc("id")]);
//!
//! let page = fetch_page(&pool, "SELECT id, title, score FROM posts", vec![], request).await?;
//!
//! if page.page_info.has_next_page {
//!    // Hand page.page_info.end_cursor back to the client
//! }
//! # Ok(())
//! # }
//! ```

mod builders;
mod decode;
mod error;
mod render;

pub use builders::{FetchPageBuilder, KeysetPage, PageInfo};
pub use error::{Error, Result};

// Re-export the request vocabulary so callers need a single import
pub use keyset_core::{
   Base64JsonCodec, Cursor, CursorCodec, NullsOrder, OrderKey, PageRequest, SortDirection,
};

use serde_json::Value as JsonValue;
use sqlx::SqlitePool;

/// Fetch one page of `query`'s rows.
///
/// `query` must not end in its own top-level ORDER BY or LIMIT. `values` are
/// bound to the query's own `$1..$N` placeholders; cursor values are bound
/// after them.
pub fn fetch_page(
   pool: &SqlitePool,
   query: impl Into<String>,
   values: Vec<JsonValue>,
   request: PageRequest,
) -> FetchPageBuilder {
   FetchPageBuilder::new(pool.clone(), query.into(), values, request)
}
