use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("Failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("OAuth authorization failed: {0}")]
    Auth(String),

    #[error("An HTTP error {status} occurred:\n{body}")]
    Transport { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl EditorError {
    pub fn config(message: impl Into<String>) -> Self {
        EditorError::Config(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        EditorError::Validation(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        EditorError::Json {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised by the remote API or the network, as opposed to local setup.
    pub fn is_transport(&self) -> bool {
        matches!(self, EditorError::Transport { .. } | EditorError::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
