//! Error types for snapshot parsing and configuration loading.
//!
//! None of these cross the [`crate::decide`] boundary: the dispatcher turns
//! every snapshot failure into [`crate::Action::Idle`]. They exist so the
//! fallible building blocks stay testable and so the driver binary can report
//! configuration problems with context.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON for the expected shape")]
    Parse(#[from] serde_json::Error),

    #[error("snapshot field `{field}` is invalid: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
