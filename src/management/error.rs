use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("cannot parse {}: {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    #[error("missing required key {0}")]
    MissingKey(&'static str),
}
