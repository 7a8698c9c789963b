//! Page-size policy in front of the plan compiler

use keyset_core::{PageRequest, Plan, compile_with};
use tracing::debug;

use crate::config::{ConfigError, PaginationConfig};

/// Applies a [`PaginationConfig`] to incoming requests before compiling them.
///
/// The compiler treats a request with neither `first` nor `last` as
/// unbounded; the paginator turns that into `first = default_page_size` and
/// caps oversized counts at `max_page_size`.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
   config: PaginationConfig,
}

impl Paginator {
   /// Create a paginator, rejecting configurations no request could satisfy.
   pub fn new(config: PaginationConfig) -> Result<Self, ConfigError> {
      config.validate()?;
      Ok(Self { config })
   }

   /// The active configuration.
   pub fn config(&self) -> &PaginationConfig {
      &self.config
   }

   /// Apply the page-size policy to a request.
   ///
   /// Zero counts are left alone so the compiler still reports them.
   pub fn apply(&self, mut request: PageRequest) -> PageRequest {
      let max = self.config.max_page_size;

      if request.first.is_none() && request.last.is_none() {
         request.first = Some(self.config.default_page_size);
      }

      for count in [&mut request.first, &mut request.last].into_iter().flatten() {
         if *count > max {
            debug!(requested = *count, max, "Clamping page size");
            *count = max;
         }
      }

      request
   }

   /// Compile a request under this paginator's policy.
   pub fn compile(&self, request: PageRequest) -> keyset_core::Result<Plan> {
      compile_with(&self.apply(request), &self.config.identifier)
   }

   /// Fetch a page from SQLite under this paginator's policy.
   ///
   /// The returned builder can still be customized (e.g. with a different
   /// cursor codec) before it is awaited.
   #[cfg(feature = "sqlite")]
   pub fn fetch_page(
      &self,
      pool: &sqlx::SqlitePool,
      query: impl Into<String>,
      values: Vec<serde_json::Value>,
      request: PageRequest,
   ) -> keyset_sqlite::FetchPageBuilder {
      keyset_sqlite::fetch_page(pool, query, values, self.apply(request))
         .identifier(self.config.identifier.clone())
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use keyset_core::{Cursor, KeysetColumn, OrderKey};

   fn paginator(default_page_size: usize, max_page_size: usize) -> Paginator {
      Paginator::new(PaginationConfig {
         default_page_size,
         max_page_size,
         ..Default::default()
      })
      .unwrap()
   }

   #[test]
   fn missing_count_uses_default_page_size() {
      let plan = paginator(20, 100).compile(PageRequest::new()).unwrap();

      assert_eq!(plan.window().requested_limit, 20);
      assert_eq!(plan.limit(), 21);
   }

   #[test]
   fn oversized_first_is_clamped() {
      let plan = paginator(20, 100)
         .compile(PageRequest::new().first(5000))
         .unwrap();

      assert_eq!(plan.limit(), 101);
   }

   #[test]
   fn oversized_last_is_clamped_and_still_flipped() {
      let plan = paginator(20, 100)
         .compile(PageRequest::new().last(500).before(Cursor::new(9)))
         .unwrap();

      assert_eq!(plan.window().requested_limit, 100);
      assert!(plan.window().flipped);
   }

   #[test]
   fn zero_count_still_fails() {
      let err = paginator(20, 100)
         .compile(PageRequest::new().first(0))
         .unwrap_err();

      assert_eq!(err.error_code(), "INVALID_PAGE_SIZE");
   }

   #[test]
   fn conflicting_counts_still_fail() {
      let err = Paginator::default()
         .compile(PageRequest::new().first(1).last(1))
         .unwrap_err();

      assert_eq!(err.error_code(), "CONFLICTING_PAGE_SIZES");
   }

   #[test]
   fn configured_identifier_orders_empty_request() {
      let paginator = Paginator::new(PaginationConfig {
         identifier: "uuid".into(),
         ..Default::default()
      })
      .unwrap();

      let plan = paginator.compile(PageRequest::new()).unwrap();

      assert_eq!(plan.order().columns(), &[KeysetColumn::asc("uuid")]);
   }

   #[test]
   fn explicit_order_is_kept() {
      let plan = Paginator::default()
         .compile(PageRequest::new().order_by(vec![OrderKey::desc("score")]))
         .unwrap();

      assert_eq!(plan.order().columns(), &[KeysetColumn::desc("score")]);
   }

   #[test]
   fn invalid_config_is_rejected() {
      let result = Paginator::new(PaginationConfig {
         max_page_size: 0,
         ..Default::default()
      });

      assert!(result.is_err());
   }
}
