//! The `error` module creates a library-specific Error type `AddressError`, and an alias for Result using the
//! `AddressError`, called `AddressResult`.
use thiserror::Error;

/// The `AddressError` enum represents the library-specific Error type.  Lookup misses and
/// unmatched rule qualifiers are never represented here — they are not errors, only a failure
/// to find a more specific zipcode (see the `directory` module).
#[derive(Error, Debug)]
pub enum AddressError {
    /// A malformed row in a directory source: fewer than three fields.
    #[error("malformed directory row at line {line}: expected at least 3 fields, found {fields}")]
    MalformedRow {
        /// 1-based line number within the source, not counting the discarded header.
        line: usize,
        /// Number of fields actually present in the row.
        fields: usize,
    },
    /// Error conversion type for [`csv::Error`].
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// Error conversion type for [`std::io::Error`].
    #[error("Input/output error from std.")]
    Io(#[from] std::io::Error),
    /// A failure reported by the backing [`crate::directory::Store`] implementation.
    #[error("store error: {0}")]
    Store(String),
    /// Error conversion type for [`rusqlite::Error`], present only with the `sqlite` feature.
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Alias for the Result type using the local Error type.
pub type AddressResult<T> = Result<T, AddressError>;
