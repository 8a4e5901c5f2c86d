use thiserror::Error;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("IO/Terminal error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}
