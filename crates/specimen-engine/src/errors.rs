use thiserror::Error;

/// Errors emitted while loading options or wiring up logging.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid options: {0}")]
    Invalid(String),
    #[error("logging error: {0}")]
    Logging(String),
}
