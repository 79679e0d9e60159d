//! Command-line interface for asg-sync
//!
//! Provides argument parsing and subcommand handling for the asg-sync binary.

use crate::config::Config;
use crate::error::{AppError, AppResult};
use clap::{Parser, Subcommand, ValueEnum};

/// Default location of the sync configuration
pub const DEFAULT_CONFIG_PATH: &str = "/etc/asg-sync/config.yaml";

/// Validate and inspect autoscaling-group sync configuration
#[derive(Parser)]
#[command(name = "asg-sync")]
#[command(version)]
#[command(about = "Validate and inspect autoscaling-group sync configuration")]
#[command(
    long_about = "asg-sync keeps proxy upstreams in line with the members of cloud autoscaling \
    groups. This binary loads the sync configuration, checks every mandatory field and shows \
    the per-upstream parameters the sync driver will send."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: String,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Load and validate the configuration (default)
    Check,
    /// Print the extra query parameters of every upstream
    Params,
    /// Print the validated configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Yaml,
    Json,
}

/// One line per upstream: name, a tab, then its parameter fragment
pub fn render_params(config: &Config) -> String {
    config
        .upstreams
        .iter()
        .map(|upstream| format!("{}\t{}\n", upstream.name(), upstream.extra_params()))
        .collect()
}

/// Render a configuration in the requested format
pub fn render_config(config: &Config, format: Format) -> AppResult<String> {
    match format {
        Format::Yaml => {
            serde_yaml::to_string(config).map_err(|e| AppError::Serialize(e.to_string()))
        }
        Format::Json => serde_json::to_string_pretty(config)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| AppError::Serialize(e.to_string())),
    }
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# asg-sync Configuration
# =======================
#
# Describes where the proxy's upstream API lives and which autoscaling
# groups feed which upstreams.

# ─────────────────────────────────────────────────────────────────────────────
# SYNC SETTINGS
# ─────────────────────────────────────────────────────────────────────────────

# Cloud region the autoscaling groups live in
region: us-west-2

# Upstream configuration API of the proxy
upstream_conf_endpoint: http://127.0.0.1:8080/upstream_conf

# Status API of the proxy
status_endpoint: http://127.0.0.1:8080/status

# Seconds between two sync cycles (must be greater than 0)
sync_interval_in_seconds: 5

# ─────────────────────────────────────────────────────────────────────────────
# UPSTREAMS
# ─────────────────────────────────────────────────────────────────────────────
#
# Upstream fields:
#   - name: Upstream name as declared in the proxy configuration
#   - autoscaling_group: Autoscaling group whose instances become servers
#   - port: Port the instances listen on
#   - kind: "http" for HTTP upstreams, "stream" for TCP upstreams
#
# Optional tuning fields (omit or set to 0 / "" to leave unset):
#   - max_conns: Connection limit per server
#   - slow_start: Ramp-up period for new servers, e.g. "30s"
#   - max_fails: Failed attempts before a server is marked down
#   - fail_timeout: Window for max_fails and time a server stays down, e.g. "10s"

upstreams:
  - name: backend1
    autoscaling_group: backend-group
    port: 80
    kind: http
    max_conns: 0
    slow_start: 30s
    max_fails: 1
    fail_timeout: 10s

  - name: tcp-backend
    autoscaling_group: tcp-backend-group
    port: 5432
    kind: stream
"#
}
