//! Configuration management for asg-sync
//!
//! Decodes the YAML sync configuration into typed values and validates that
//! every mandatory field is present before the sync driver is allowed to run.

use crate::error::{AppError, AppResult, DecodeError, ValidationError};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Root configuration structure
///
/// Absent keys decode to their zero value and unknown keys are ignored.
/// Whether the zero values are acceptable is decided by `Config::validate()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub region: String,
    pub upstream_conf_endpoint: String,
    pub status_endpoint: String,
    /// Interval between sync cycles, written as whole seconds
    #[serde(rename = "sync_interval_in_seconds", with = "duration_secs")]
    pub sync_interval: Duration,
    pub upstreams: Vec<Upstream>,
}

/// Upstream group kept in sync with the members of an autoscaling group
///
/// Fields are private and read through getters, like the rest of the
/// per-upstream API. Records are produced by decoding or by `Upstream::new()`
/// and the `with_*` builder methods. The top-level `Config` fields stay public.
///
/// The optional tuning fields use zero (or the empty string) for "not set";
/// an explicit `max_conns: 0` and an omitted `max_conns` are the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Upstream {
    name: String,
    autoscaling_group: String,
    #[serde(deserialize_with = "null_as_default")]
    port: u16,
    /// `None` when the key is missing or not exactly "http" or "stream"
    #[serde(
        deserialize_with = "deserialize_kind",
        skip_serializing_if = "Option::is_none"
    )]
    kind: Option<UpstreamKind>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    max_conns: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    slow_start: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    max_fails: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    fail_timeout: String,
}

impl Upstream {
    /// Create an upstream with its mandatory fields and no tuning parameters
    pub fn new(
        name: impl Into<String>,
        autoscaling_group: impl Into<String>,
        port: u16,
        kind: UpstreamKind,
    ) -> Self {
        Self {
            name: name.into(),
            autoscaling_group: autoscaling_group.into(),
            port,
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Set the per-server connection limit (0 leaves it unset)
    pub fn with_max_conns(mut self, max_conns: u32) -> Self {
        self.max_conns = max_conns;
        self
    }

    /// Set the slow start period, e.g. "30s" (empty leaves it unset)
    pub fn with_slow_start(mut self, slow_start: impl Into<String>) -> Self {
        self.slow_start = slow_start.into();
        self
    }

    /// Set the failure count threshold (0 leaves it unset)
    pub fn with_max_fails(mut self, max_fails: u32) -> Self {
        self.max_fails = max_fails;
        self
    }

    /// Set the failure window, e.g. "10s" (empty leaves it unset)
    pub fn with_fail_timeout(mut self, fail_timeout: impl Into<String>) -> Self {
        self.fail_timeout = fail_timeout.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn autoscaling_group(&self) -> &str {
        &self.autoscaling_group
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the upstream kind, `None` if it was missing or unrecognized
    pub fn kind(&self) -> Option<UpstreamKind> {
        self.kind
    }

    pub fn max_conns(&self) -> u32 {
        self.max_conns
    }

    pub fn slow_start(&self) -> &str {
        &self.slow_start
    }

    pub fn max_fails(&self) -> u32 {
        self.max_fails
    }

    pub fn fail_timeout(&self) -> &str {
        &self.fail_timeout
    }

    /// Query-string fragment with the tuning parameters that are set
    ///
    /// See [`crate::params::encode_extra_params`].
    pub fn extra_params(&self) -> String {
        crate::params::encode_extra_params(self)
    }

    /// Check the mandatory upstream fields in order: name, autoscaling_group,
    /// port, kind
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingUpstreamName);
        }
        if self.autoscaling_group.is_empty() {
            return Err(ValidationError::MissingUpstreamAutoscalingGroup(
                self.name.clone(),
            ));
        }
        if self.port == 0 {
            return Err(ValidationError::MissingOrZeroUpstreamPort(self.name.clone()));
        }
        if self.kind.is_none() {
            return Err(ValidationError::InvalidUpstreamKind(self.name.clone()));
        }
        Ok(())
    }
}

/// Proxy context an upstream is declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamKind {
    /// HTTP load balancing
    Http,
    /// Raw TCP load balancing
    Stream,
}

impl UpstreamKind {
    /// Match the exact wire literal; case variants are not accepted
    pub fn from_literal(value: &str) -> Option<Self> {
        match value {
            "http" => Some(Self::Http),
            "stream" => Some(Self::Stream),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Stream => "stream",
        }
    }
}

impl fmt::Display for UpstreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized kinds decode to `None` instead of failing, so they are
/// reported by the validator with the upstream name and in check order.
fn deserialize_kind<'de, D>(deserializer: D) -> Result<Option<UpstreamKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(UpstreamKind::from_literal))
}

/// A key written without a value (`port:` or `max_fails: ~`) decodes to zero,
/// the same as an omitted key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Whole-second `Duration` encoding for `sync_interval_in_seconds`
mod duration_secs {
    use serde::{Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: u64 = super::null_as_default(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Decode a YAML document into a `Config` without any semantic checks
///
/// A blank document decodes to `Config::default()`.
pub fn decode(bytes: &[u8]) -> Result<Config, DecodeError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_slice(bytes)?)
}

/// Validate a decoded `Config`, see [`Config::validate`]
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    config.validate()
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content =
            std::fs::read(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        let config = Self::parse(&content, path_display)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            region = %config.region,
            upstreams = config.upstreams.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Decode and validate configuration from raw bytes
    pub fn from_slice(bytes: &[u8]) -> AppResult<Self> {
        Self::parse(bytes, "<bytes>".to_string())
    }

    fn parse(bytes: &[u8], path: String) -> AppResult<Self> {
        let config = decode(bytes).map_err(|source| AppError::ConfigParseFailed {
            path: path.clone(),
            source,
        })?;

        config
            .validate()
            .map_err(|source| AppError::ConfigValidationFailed { path, source })?;

        Ok(config)
    }

    /// Find an upstream by name
    pub fn upstream(&self, name: &str) -> Option<&Upstream> {
        self.upstreams.iter().find(|u| u.name == name)
    }

    /// Validate configuration after decoding
    ///
    /// Checks run in a fixed order and stop at the first violation:
    /// region, upstream_conf_endpoint, status_endpoint, sync interval,
    /// upstream list, then each upstream in sequence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.region.is_empty() {
            return Err(ValidationError::MissingRegion);
        }
        if self.upstream_conf_endpoint.is_empty() {
            return Err(ValidationError::MissingUpstreamConfEndpoint);
        }
        if self.status_endpoint.is_empty() {
            return Err(ValidationError::MissingStatusEndpoint);
        }
        if self.sync_interval.is_zero() {
            return Err(ValidationError::MissingOrZeroSyncInterval);
        }
        if self.upstreams.is_empty() {
            return Err(ValidationError::NoUpstreams);
        }

        for upstream in &self.upstreams {
            upstream.validate()?;
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(yaml: &str) -> Result<Self, Self::Err> {
        Self::parse(yaml.as_bytes(), "<string>".to_string())
    }
}
