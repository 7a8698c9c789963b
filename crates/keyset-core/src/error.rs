/// Result type alias for pagination compiler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of compiler errors.
///
/// Every [`Error`] variant belongs to exactly one kind, which is what callers
/// usually branch on (e.g. to map onto an API-level "bad request").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
   /// The requested ordering is malformed.
   InvalidOrder,
   /// The page sizes or boundary cursors of the request are inconsistent.
   InvalidPageRequest,
   /// An opaque cursor token could not be turned back into boundary values.
   CursorDecode,
}

/// Error types for pagination compilation.
///
/// All errors are detected synchronously while compiling a request; none of
/// them are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// An ordering key has an empty field name.
   #[error("order key at position {position} has an empty field name")]
   EmptyOrderField { position: usize },

   /// The same field appears more than once in the ordering.
   #[error("order field '{field}' appears more than once")]
   DuplicateOrderField { field: String },

   /// The default identifier column is empty, so no fallback ordering exists.
   #[error("default identifier column must not be empty")]
   EmptyIdentifier,

   /// Both `first` and `last` were supplied.
   #[error("cannot provide both 'first' and 'last'")]
   ConflictingPageSizes,

   /// Page size must be greater than zero (and leave room for the lookahead row).
   #[error("page size must be greater than zero")]
   InvalidPageSize,

   /// Cursor length matches neither the primary key nor the full keyset.
   #[error("cursor has {cursor_len} values but keyset has {keyset_len} columns")]
   CursorLengthMismatch {
      cursor_len: usize,
      keyset_len: usize,
   },

   /// A cursor carries a NULL value for a key with no declared NULL placement.
   #[error("cursor value for '{field}' is null but the key has no NULL placement")]
   NullCursorValue { field: String },

   /// A row lacks a column of the ordering, so no cursor can be taken from it.
   #[error("ordering column '{column}' not found in row")]
   CursorColumnNotFound { column: String },

   /// The opaque cursor token could not be decoded.
   #[error("invalid cursor: {0}")]
   CursorDecode(String),
}

impl Error {
   /// The broad kind this error belongs to.
   pub fn kind(&self) -> ErrorKind {
      match self {
         Error::EmptyOrderField { .. }
         | Error::DuplicateOrderField { .. }
         | Error::EmptyIdentifier
         | Error::CursorColumnNotFound { .. } => ErrorKind::InvalidOrder,
         Error::ConflictingPageSizes
         | Error::InvalidPageSize
         | Error::CursorLengthMismatch { .. }
         | Error::NullCursorValue { .. } => ErrorKind::InvalidPageRequest,
         Error::CursorDecode(_) => ErrorKind::CursorDecode,
      }
   }

   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::EmptyOrderField { .. } => "EMPTY_ORDER_FIELD".to_string(),
         Error::DuplicateOrderField { .. } => "DUPLICATE_ORDER_FIELD".to_string(),
         Error::EmptyIdentifier => "EMPTY_IDENTIFIER".to_string(),
         Error::ConflictingPageSizes => "CONFLICTING_PAGE_SIZES".to_string(),
         Error::InvalidPageSize => "INVALID_PAGE_SIZE".to_string(),
         Error::CursorLengthMismatch { .. } => "CURSOR_LENGTH_MISMATCH".to_string(),
         Error::NullCursorValue { .. } => "NULL_CURSOR_VALUE".to_string(),
         Error::CursorColumnNotFound { .. } => "CURSOR_COLUMN_NOT_FOUND".to_string(),
         Error::CursorDecode(_) => "CURSOR_DECODE".to_string(),
      }
   }
}
