//! Error types for the ink engine.

use crate::types::AuthorId;
use crate::validation::{ColorParseError, ValidationError};

/// Errors raised by rendering and stroke-state operations.
#[derive(Debug, thiserror::Error)]
pub enum InkError {
    #[error("Ink texture not initialized - call InkTexture::init() before drawing")]
    NotInitialized,

    #[error("Ink texture already initialized")]
    AlreadyInitialized,

    #[error("No stroke in progress for author {author}")]
    NoActiveStroke { author: AuthorId },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Color(#[from] ColorParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors raised while reading or writing persisted canvas data.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Data format error: {0}")]
    DataFormat(String),
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        Self::DataFormat(err.to_string())
    }
}

impl From<ValidationError> for SnapshotError {
    fn from(err: ValidationError) -> Self {
        Self::DataFormat(err.to_string())
    }
}
