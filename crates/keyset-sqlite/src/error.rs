/// Result type alias for SQLite pagination operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for executing keyset pagination plans against SQLite.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from SQLx operations.
   #[error(transparent)]
   Sqlx(#[from] sqlx::Error),

   /// The pagination request could not be compiled, or a fetched row lacks
   /// an ordering column.
   #[error(transparent)]
   Keyset(#[from] keyset_core::Error),

   /// SQLite type that cannot be mapped to JSON.
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),

   /// Pagination base query must not contain top-level ORDER BY or LIMIT clauses.
   #[error(
      "pagination base query must not contain top-level ORDER BY or LIMIT clauses (these are added automatically; subquery usage is fine)"
   )]
   InvalidPaginationQuery,

   /// Keyset column name contains invalid characters.
   ///
   /// Column names must match `[a-zA-Z_][a-zA-Z0-9_]*` because they refer to
   /// columns of the base query's result set.
   #[error("invalid keyset column name '{name}': must match [a-zA-Z_][a-zA-Z0-9_]*")]
   InvalidColumnName { name: String },
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// Compiler errors keep the code of the underlying [`keyset_core::Error`].
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlx(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
         Error::Keyset(e) => e.error_code(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
         Error::InvalidPaginationQuery => "INVALID_PAGINATION_QUERY".to_string(),
         Error::InvalidColumnName { .. } => "INVALID_COLUMN_NAME".to_string(),
      }
   }
}
