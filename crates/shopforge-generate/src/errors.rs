use thiserror::Error;

/// Errors emitted by the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("config validation failed: {0}")]
    Config(#[from] shopforge_core::ConfigError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
