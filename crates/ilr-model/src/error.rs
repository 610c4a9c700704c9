use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid learn ref number: {0:?}")]
    InvalidLearnRefNumber(String),
    #[error("invalid rule id: {0:?}")]
    InvalidRuleId(String),
    #[error("failed to read batch {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse batch JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
