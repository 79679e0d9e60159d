//! asg-sync - Autoscaling group to proxy upstream synchronization
//!
//! This library loads and validates the sync agent configuration and builds
//! the per-upstream parameters the sync driver sends to the proxy.

pub mod cli;
pub mod config;
pub mod error;
pub mod params;
pub mod telemetry;
