use std::path::PathBuf;

use thiserror::Error;

/// Host-native text could not be represented as internal text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("native text is not valid UTF-8 (invalid sequence at byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("native wide text is not valid UTF-16 (unpaired surrogate)")]
    InvalidUtf16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("config file {} does not exist", .path.display())]
    Missing { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Extract(Box::new(err))
    }
}
