use std::num::ParseIntError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {name} is not set")]
    MissingEnv { name: &'static str },

    #[error("environment variable {name}={value:?} is not an integer: {source}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("BMARK_KIMG must not be negative, got {value}")]
    NegativeKimg { value: String },

    #[error("invalid config field {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("snapshot grid needs {needed} images, got {got}")]
    GridUnderfilled { needed: usize, got: usize },

    #[error("image has {got} values, expected {expected}")]
    ImageSize { expected: usize, got: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load config: {0}")]
    Load(#[from] burn::config::ConfigError),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
