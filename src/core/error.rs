//! Error types for terramarch

use thiserror::Error;

/// Main error type for the crate
///
/// The meshing core never fails; these cover the configuration, export and
/// worker pool boundaries around it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}
