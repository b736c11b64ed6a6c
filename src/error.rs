//! Errors raised while loading combat tuning.
//!
//! The per-frame combat path is infallible; only configuration can fail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read combat config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse combat config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid combat config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
