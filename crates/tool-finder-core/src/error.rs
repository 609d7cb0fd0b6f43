/// Error types for the catalog library.
///
/// Only catalog loading and Redis plumbing can fail. Filtering, sorting and
/// comparison-set edits are total functions and report user-facing
/// rejections as values (see `compare::Notice`), not as errors.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("catalog parse error: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("failed to read catalog {path}: {source}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}
