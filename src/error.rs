//! Error types shared across the renderer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while rendering or driving the page.
///
/// Missing containers, missing collections and unresolvable click targets
/// are not errors; they are skipped where they occur. Only the modal
/// elements are required once modal interaction is attempted.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Required element not found: #{0}")]
    MissingElement(&'static str),

    #[error("Failed to persist preference '{key}': {source}")]
    Preference {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised while loading `labsite.toml` or the experiments data file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid data file {path}: {source}")]
    Data {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
