use thiserror::Error;

/// tally error types
///
/// Parse failures are deliberately not represented here: text-to-value
/// parsing returns `Option<f64>` so callers decide the user-facing message.
#[derive(Error, Debug)]
pub enum TallyError {
    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Store operation failed (serialization, locking, lookup)
    #[error("store error: {0}")]
    Store(String),

    /// CSV export failed
    #[error("export error: {0}")]
    Export(String),

    /// No quantity type with the given name
    #[error("unknown quantity type: {0}")]
    UnknownQuantityType(String),
}

/// Result type alias for tally
pub type Result<T> = std::result::Result<T, TallyError>;
