use tool_finder_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("config error: {0}")]
    Config(String),
}
