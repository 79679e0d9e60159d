//! Error types for asg-sync
//!
//! Core errors (`DecodeError`, `ValidationError`) describe what is wrong with a
//! document. `AppError` adds the phase and source path for the loader and CLI.

use thiserror::Error;

/// The document could not be deserialized into a `Config`
///
/// Carries the YAML error, which names the offending key path and the expected
/// type (e.g. `upstreams[0].port: invalid type: string "abc", expected u16`).
#[derive(Error, Debug)]
#[error("{source}")]
pub struct DecodeError {
    #[from]
    source: serde_yaml::Error,
}

/// The first violation found while validating a decoded `Config`
///
/// Variants are listed in the order the validator checks them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The mandatory field region is either empty or missing in the config file")]
    MissingRegion,

    #[error(
        "The mandatory field upstream_conf_endpoint is either empty or missing in the config file"
    )]
    MissingUpstreamConfEndpoint,

    #[error("The mandatory field status_endpoint is either empty or missing in the config file")]
    MissingStatusEndpoint,

    #[error(
        "The mandatory field sync_interval_in_seconds is either 0 or missing in the config file"
    )]
    MissingOrZeroSyncInterval,

    #[error("There are no upstreams found in the config file")]
    NoUpstreams,

    #[error(
        "The mandatory field name is either empty or missing for an upstream in the config file"
    )]
    MissingUpstreamName,

    #[error(
        "The mandatory field autoscaling_group is either empty or missing for the upstream {0} in the config file"
    )]
    MissingUpstreamAutoscalingGroup(String),

    #[error(
        "The mandatory field port is either zero or missing for the upstream {0} in the config file"
    )]
    MissingOrZeroUpstreamPort(String),

    #[error(
        "The mandatory field kind is either not equal to http or stream or missing for the upstream {0} in the config file"
    )]
    InvalidUpstreamKind(String),
}

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: DecodeError,
    },

    #[error("Invalid config {path}: {source}")]
    ConfigValidationFailed {
        path: String,
        #[source]
        source: ValidationError,
    },

    #[error("Failed to write {path}: {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render config: {0}")]
    Serialize(String),
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
