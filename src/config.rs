//! Page-size policy configuration

use serde::Deserialize;

/// Configuration for a [`Paginator`](crate::Paginator)
///
/// Deserializable so hosts can embed it in their own config files; missing
/// fields fall back to the defaults below.
///
/// # Examples
///
/// ```
/// use keyset_pagination::PaginationConfig;
///
/// // Use defaults
/// let config = PaginationConfig::default();
/// assert_eq!(config.default_page_size, 50);
///
/// // Override just one field
/// let config = PaginationConfig {
///    max_page_size: 200,
///    ..Default::default()
/// };
///
/// // Load from JSON
/// let config: PaginationConfig =
///    serde_json::from_str(r#"{ "identifier": "uuid", "defaultPageSize": 20 }"#).unwrap();
/// assert_eq!(config.identifier, "uuid");
/// assert_eq!(config.max_page_size, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationConfig {
   /// Column ordered by when a request names no ordering keys
   ///
   /// Default: `"id"`
   pub identifier: String,

   /// Page size used when a request sets neither `first` nor `last`
   ///
   /// Default: 50
   pub default_page_size: usize,

   /// Upper bound applied to `first`/`last`
   ///
   /// Default: 1000
   pub max_page_size: usize,
}

impl Default for PaginationConfig {
   fn default() -> Self {
      Self {
         identifier: keyset_core::DEFAULT_IDENTIFIER.to_string(),
         default_page_size: 50,
         max_page_size: 1000,
      }
   }
}

/// Invalid [`PaginationConfig`] values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
   /// The identifier column is empty.
   #[error("identifier column must not be empty")]
   EmptyIdentifier,

   /// A page size limit is zero.
   #[error("{field} must be greater than zero")]
   ZeroPageSize { field: &'static str },

   /// The default page size exceeds the maximum.
   #[error("default page size {default} exceeds max page size {max}")]
   DefaultExceedsMax { default: usize, max: usize },
}

impl ConfigError {
   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         ConfigError::EmptyIdentifier => "EMPTY_IDENTIFIER".to_string(),
         ConfigError::ZeroPageSize { .. } => "ZERO_PAGE_SIZE".to_string(),
         ConfigError::DefaultExceedsMax { .. } => "DEFAULT_EXCEEDS_MAX".to_string(),
      }
   }
}

impl PaginationConfig {
   /// Check the configuration for values no request could satisfy.
   pub fn validate(&self) -> Result<(), ConfigError> {
      if self.identifier.is_empty() {
         return Err(ConfigError::EmptyIdentifier);
      }
      if self.default_page_size == 0 {
         return Err(ConfigError::ZeroPageSize {
            field: "defaultPageSize",
         });
      }
      if self.max_page_size == 0 {
         return Err(ConfigError::ZeroPageSize {
            field: "maxPageSize",
         });
      }
      if self.default_page_size > self.max_page_size {
         return Err(ConfigError::DefaultExceedsMax {
            default: self.default_page_size,
            max: self.max_page_size,
         });
      }
      Ok(())
   }
}
