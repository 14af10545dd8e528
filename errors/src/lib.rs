//! # IAM Manager Configuration Errors
//!
//! Error taxonomy for loading controller properties.
//!
//! - Uses `thiserror` for structured error definitions
//! - Every variant is terminal: a load either publishes a full snapshot or
//!   returns one of these
//! - The `MissingConfigSource` message is a stable, user-visible string

use serde::Serialize;
use thiserror::Error;

/// Errors returned by the properties load pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Non-local environment and no usable external key/value map.
    #[error("config map cannot be nil")]
    MissingConfigSource,

    #[error("Required configuration key missing: {key}")]
    RequiredKeyMissing { key: String },

    #[error("Invalid value for {key}: {value:?} is not a valid {expected}")]
    TypeCoercion {
        key: String,
        value: String,
        expected: &'static str
    }
}

/// Coarse classification of a [`ConfigError`], suitable for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigErrorKind {
    MissingConfigSource,
    RequiredKeyMissing,
    TypeCoercion
}

impl ConfigError {
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::MissingConfigSource => ConfigErrorKind::MissingConfigSource,
            Self::RequiredKeyMissing { .. } => ConfigErrorKind::RequiredKeyMissing,
            Self::TypeCoercion { .. } => ConfigErrorKind::TypeCoercion
        }
    }

    /// The configuration key the error refers to, when there is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::RequiredKeyMissing { key } | Self::TypeCoercion { key, .. } => Some(key),
            Self::MissingConfigSource => None
        }
    }
}
