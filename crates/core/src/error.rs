//! Error types for the transcript core.
//!
//! Row-level ambiguity never produces an error: unrecognized rows fall through
//! to continuation or are ignored. Only document-level problems (bad token
//! dumps, unreadable or invalid configuration) surface as [`CoreError`].

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Configuration failed validation.
    #[error("config error: {message}")]
    Config { message: String },

    /// Configuration file is not valid TOML for [`crate::ParserConfig`].
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config render error: {0}")]
    TomlRender(#[from] toml::ser::Error),

    /// Token dump is not valid JSON for [`crate::Document`].
    #[error("token dump parse error: {0}")]
    Tokens(#[from] serde_json::Error),

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
