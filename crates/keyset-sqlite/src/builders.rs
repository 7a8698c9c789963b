//! Keyset page query builder

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use indexmap::IndexMap;
use keyset_core::{Base64JsonCodec, Cursor, CursorCodec, DEFAULT_IDENTIFIER, PageRequest, compile_with};
use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::SqlitePool;
use tracing::debug;

use crate::Error;
use crate::decode::{bind_value, decode_rows};
use crate::render::render_plan;

/// Continuation metadata for a [`KeysetPage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
   /// Whether rows exist after `end_cursor`
   pub has_next_page: bool,
   /// Whether rows exist before `start_cursor`
   pub has_previous_page: bool,
   /// Token for the first row; pass to `before` to page backward
   pub start_cursor: Option<String>,
   /// Token for the last row; pass to `after` to page forward
   pub end_cursor: Option<String>,
}

/// A page of results from keyset pagination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeysetPage {
   /// The rows in this page, in the requested order
   pub rows: Vec<IndexMap<String, JsonValue>>,
   /// Continuation flags and cursors
   pub page_info: PageInfo,
}

/// Builder for paginated SELECT queries using keyset (cursor-based) pagination
pub struct FetchPageBuilder {
   pool: SqlitePool,
   query: String,
   values: Vec<JsonValue>,
   request: PageRequest,
   identifier: String,
   codec: Arc<dyn CursorCodec>,
}

impl FetchPageBuilder {
   pub(crate) fn new(
      pool: SqlitePool,
      query: String,
      values: Vec<JsonValue>,
      request: PageRequest,
   ) -> Self {
      Self {
         pool,
         query,
         values,
         request,
         identifier: DEFAULT_IDENTIFIER.to_string(),
         codec: Arc::new(Base64JsonCodec),
      }
   }

   /// Column to order by when the request names no ordering keys.
   pub fn identifier(mut self, column: impl Into<String>) -> Self {
      self.identifier = column.into();
      self
   }

   /// Codec used to produce `start_cursor`/`end_cursor` tokens.
   pub fn codec(mut self, codec: impl CursorCodec + 'static) -> Self {
      self.codec = Arc::new(codec);
      self
   }

   /// Execute the paginated query and return a page of results
   pub async fn execute(self) -> Result<KeysetPage, Error> {
      let plan = compile_with(&self.request, &self.identifier)?;

      // Cursor placeholders are numbered after the caller's own parameters
      let (sql, cursor_bind_values) = render_plan(&self.query, &plan, self.values.len())?;
      debug!(sql = %sql, cursor_binds = cursor_bind_values.len(), "Fetching keyset page");

      let mut q = sqlx::query(&sql);
      for value in self.values.into_iter().chain(cursor_bind_values) {
         q = bind_value(q, value);
      }
      let rows = q.fetch_all(&self.pool).await?;

      let page = plan.finish(decode_rows(rows)?);

      // Cursors always carry every keyset column, in logical order
      let encode = |row: &IndexMap<String, JsonValue>| -> Result<String, Error> {
         let cursor = Cursor::from_row(plan.order(), |name| row.get(name))?;
         Ok(self.codec.encode(&cursor))
      };

      let page_info = PageInfo {
         has_next_page: page.has_next_page,
         has_previous_page: page.has_previous_page,
         start_cursor: page.first().map(&encode).transpose()?,
         end_cursor: page.last().map(&encode).transpose()?,
      };

      Ok(KeysetPage {
         rows: page.rows,
         page_info,
      })
   }
}

impl IntoFuture for FetchPageBuilder {
   type Output = Result<KeysetPage, Error>;
   type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

   fn into_future(self) -> Self::IntoFuture {
      Box::pin(self.execute())
   }
}
