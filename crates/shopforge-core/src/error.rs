use thiserror::Error;

/// Errors raised while validating a simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A probability parameter falls outside `[0, 1]`.
    #[error("invalid probability: {0}")]
    InvalidProbability(String),
    /// A sampling weight is non-positive or non-finite.
    #[error("invalid weight: {0}")]
    InvalidWeight(String),
    /// A range parameter is unusable even after min/max normalization.
    #[error("invalid range: {0}")]
    InvalidRange(String),
    /// A collection that must carry at least one entry is empty.
    #[error("empty configuration section: {0}")]
    Empty(String),
    /// The same key is configured twice.
    #[error("duplicate configuration entry: {0}")]
    Duplicate(String),
}

/// Convenience alias for results returned by Shopforge crates.
pub type Result<T> = std::result::Result<T, ConfigError>;
