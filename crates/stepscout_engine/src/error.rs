use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    /// Configuration error: relative step patterns need a workspace root.
    /// A dedicated variant so hosts can render a status message for it.
    #[error("no workspace root configured for relative pattern {pattern:?}")]
    NoRoot { pattern: String },

    #[error("invalid step path pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to expand step path pattern")]
    Glob(#[from] glob::GlobError),

    #[error("failed to read step file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
