// Error types shared by the pool, the cursor model and the config layer

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("could not grow the shm pool from {capacity} bytes to fit {requested} more")]
    AllocationFailure {
        requested: usize,
        capacity: usize,
        #[source]
        source: io::Error,
    },
    #[error("could not create the shared memory backing")]
    ResourceCreationFailure(#[source] io::Error),
    #[error("theme has no cursor named `{0}`")]
    NotFound(String),
    #[error("cursor `{name}` is malformed: {reason}")]
    MalformedCursor { name: String, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CursorError {
    pub(crate) fn malformed(name: &str, reason: impl Into<String>) -> Self {
        Self::MalformedCursor {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CursorError>;
